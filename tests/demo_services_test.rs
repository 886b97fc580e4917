//! 订单演示服务的集成测试

use iocdemo::app::{
    build_container, register_core_with_email, register_core_with_sms, register_sms_sender,
    MainViewModel,
};
use iocdemo::config::ConfigLoader;
use iocdemo::domain::services::{DynamicOrderService, OrderService};
use iocdemo::domain::{MessageSender, MessageSenderFactory, OrderRepository, SenderKind};
use iocdemo::infrastructure::{ContainerError, ServiceCollection};
use iocdemo::logging::init_test_logging;
use std::collections::HashMap;
use std::sync::Arc;

fn email_container() -> iocdemo::ServiceContainer {
    init_test_logging();
    let mut services = ServiceCollection::new();
    register_core_with_email(&mut services).unwrap();
    services.build()
}

#[test]
fn test_order_service_with_resolved_dependencies() {
    let container = email_container();
    let scope = container.create_scope();
    let service = scope.resolve::<OrderService>().unwrap();

    let result = service.place_order("INTEGRATION-TEST-001");
    assert!(result.contains("💾 Order INTEGRATION-TEST-001 saved to repository"));
    assert!(result.contains("✉️ Email sent: Order INTEGRATION-TEST-001 processed"));
}

#[test]
fn test_order_state_kept_per_scope() {
    let container = email_container();
    let scope = container.create_scope();

    let first = scope.resolve::<OrderService>().unwrap();
    let second = scope.resolve::<OrderService>().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));

    first.place_order("ORDER-001");
    second.place_order("ORDER-002");
    assert_eq!(first.order_summary(), "Currently 2 orders: [ORDER-001, ORDER-002]");

    let other_scope = container.create_scope();
    let other = other_scope.resolve::<OrderService>().unwrap();
    assert_eq!(other.order_summary(), "Currently 0 orders: []");
}

#[test]
fn test_sms_configuration_uses_sms() {
    init_test_logging();
    let mut services = ServiceCollection::new();
    register_core_with_sms(&mut services).unwrap();
    let container = services.build();

    let sender = container.resolve::<dyn MessageSender>().unwrap();
    assert_eq!(sender.sender_type(), "SMS");

    let scope = container.create_scope();
    let service = scope.resolve::<OrderService>().unwrap();
    assert!(service
        .place_order("SMS-TEST-001")
        .contains("📱 SMS sent: Order SMS-TEST-001 processed"));
    assert_eq!(service.message_sender_type(), "SMS");
}

#[test]
fn test_sender_factory_is_shared_singleton() {
    let container = email_container();
    let scope_one = container.create_scope();
    let scope_two = container.create_scope();

    let dynamic_one = scope_one.resolve::<DynamicOrderService>().unwrap();
    let dynamic_two = scope_two.resolve::<DynamicOrderService>().unwrap();

    dynamic_one.switch_default_sender(SenderKind::Sms);
    assert_eq!(dynamic_two.default_sender_kind(), SenderKind::Sms);
    assert_eq!(
        container
            .resolve::<dyn MessageSenderFactory>()
            .unwrap()
            .default_kind(),
        SenderKind::Sms
    );
}

#[test]
fn test_repository_released_when_scope_ends() {
    let container = email_container();
    let repository = {
        let scope = container.create_scope();
        let repository = scope.resolve::<dyn OrderRepository>().unwrap();
        repository.save("KEEP-1").unwrap();
        repository
    };

    // 作用域结束后仓储已被释放
    assert_eq!(repository.order_count(), 0);
    assert!(repository.save("KEEP-2").is_err());
}

#[test]
fn test_replacing_sender_after_core_registration() {
    init_test_logging();
    let mut services = ServiceCollection::new();
    register_core_with_email(&mut services).unwrap();
    let email = services.clone().build();

    register_sms_sender(&mut services).unwrap();
    let sms = services.build();

    assert_eq!(email.resolve::<dyn MessageSender>().unwrap().sender_type(), "Email");
    assert_eq!(sms.resolve::<dyn MessageSender>().unwrap().sender_type(), "SMS");
}

#[test]
fn test_view_model_flow_from_config_file() {
    init_test_logging();
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config_path = temp_dir.path().join("iocdemo.toml");
    std::fs::write(
        &config_path,
        r#"
[container]
strict_registration = true

[messaging]
default_sender = "sms"

[orders]
initial_order_id = "ORDER-009"
"#,
    )
    .unwrap();

    let config = ConfigLoader::with_config_file(&config_path)
        .load_config_with_env(&HashMap::new())
        .unwrap();
    let container = build_container(&config).unwrap();

    let mut vm = MainViewModel::new(&container).unwrap();
    assert_eq!(vm.order_id_input(), "ORDER-009");
    assert_eq!(vm.message_sender_type(), "SMS");

    vm.place_order();
    assert_eq!(vm.order_id_input(), "ORDER-010");
    assert!(vm.output().contains("📱 SMS sent: Order ORDER-009 processed"));
}

#[test]
fn test_resolving_scoped_repository_from_root_fails() {
    let container = email_container();
    assert!(matches!(
        container.resolve::<dyn OrderRepository>(),
        Err(ContainerError::NoActiveScope { .. })
    ));
}
