//! 依赖注入容器的集成测试

#![allow(clippy::uninlined_format_args)]

use futures_util::future;
use iocdemo::infrastructure::{
    ContainerError, Dispose, ServiceCollection, ServiceContainer, ServiceLifetime,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

/// 测试用的发送器契约
trait Sender: Send + Sync {
    fn kind(&self) -> &'static str;
}

struct Email;
struct Sms;

impl Sender for Email {
    fn kind(&self) -> &'static str {
        "Email"
    }
}

impl Sender for Sms {
    fn kind(&self) -> &'static str {
        "SMS"
    }
}

/// 测试用的仓储
struct Repo {
    id: usize,
}

fn email(_: &iocdemo::infrastructure::Resolver<'_>) -> Result<Arc<dyn Sender>, ContainerError> {
    let sender: Arc<dyn Sender> = Arc::new(Email);
    Ok(sender)
}

fn sms(_: &iocdemo::infrastructure::Resolver<'_>) -> Result<Arc<dyn Sender>, ContainerError> {
    let sender: Arc<dyn Sender> = Arc::new(Sms);
    Ok(sender)
}

fn counting_repo(services: &mut ServiceCollection, lifetime: ServiceLifetime) -> Arc<AtomicUsize> {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = created.clone();
    services
        .register::<Repo, _>(lifetime, move |_| {
            let id = counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Repo { id }))
        })
        .unwrap();
    created
}

#[test]
fn test_sender_replacement_scenario() {
    let mut services = ServiceCollection::new();
    services.register_singleton::<dyn Sender, _>(email).unwrap();

    let container = services.clone().build();
    let first = container.resolve::<dyn Sender>().unwrap();
    let second = container.resolve::<dyn Sender>().unwrap();
    assert_eq!(first.kind(), "Email");
    assert!(Arc::ptr_eq(&first, &second));

    // 替换注册后重新构建，新容器解析到短信实现
    services.register_singleton::<dyn Sender, _>(sms).unwrap();
    let replaced = services.build();
    assert_eq!(replaced.resolve::<dyn Sender>().unwrap().kind(), "SMS");

    // 旧容器不受影响
    assert_eq!(container.resolve::<dyn Sender>().unwrap().kind(), "Email");
}

#[test]
fn test_scoped_repository_scenario() {
    let mut services = ServiceCollection::new();
    let created = counting_repo(&mut services, ServiceLifetime::Scoped);
    let container = services.build();

    let scope_one = container.create_scope();
    let scope_two = container.create_scope();

    let a = scope_one.resolve::<Repo>().unwrap();
    let b = scope_one.resolve::<Repo>().unwrap();
    let c = scope_two.resolve::<Repo>().unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_ne!(a.id, c.id);
    assert_eq!(created.load(Ordering::SeqCst), 2);
    assert_ne!(scope_one.id(), scope_two.id());
}

#[test]
fn test_transient_distinct_per_resolution() {
    let mut services = ServiceCollection::new();
    let created = counting_repo(&mut services, ServiceLifetime::Transient);
    let container = services.build();
    let scope = container.create_scope();

    let a = container.resolve::<Repo>().unwrap();
    let b = scope.resolve::<Repo>().unwrap();
    let c = scope.resolve::<Repo>().unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&b, &c));
    assert_eq!(created.load(Ordering::SeqCst), 3);
    assert_eq!(scope.instance_count(), 0);
}

#[test]
fn test_singleton_shared_between_root_and_scopes() {
    let mut services = ServiceCollection::new();
    let created = counting_repo(&mut services, ServiceLifetime::Singleton);
    let container = services.build();

    let root = container.resolve::<Repo>().unwrap();
    let scoped = container.create_scope().resolve::<Repo>().unwrap();
    assert!(Arc::ptr_eq(&root, &scoped));
    assert_eq!(created.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unregistered_service_lists_available() {
    let mut services = ServiceCollection::new();
    services.register_singleton::<dyn Sender, _>(email).unwrap();
    let container = services.build();

    match container.resolve::<Repo>() {
        Err(ContainerError::ServiceNotRegistered {
            type_name,
            available_services,
        }) => {
            assert!(type_name.ends_with("Repo"));
            assert_eq!(available_services.len(), 1);
            assert!(available_services[0].contains("Sender"));
        }
        other => panic!("expected ServiceNotRegistered, got {:?}", other.map(|_| ())),
    }
}

struct CycleA {
    _b: Arc<CycleB>,
}

struct CycleB {
    _a: Arc<CycleA>,
}

#[test]
fn test_circular_dependency_reported_with_path() {
    let mut services = ServiceCollection::new();
    services
        .register_transient::<CycleA, _>(|resolver| {
            Ok(Arc::new(CycleA {
                _b: resolver.resolve::<CycleB>()?,
            }))
        })
        .unwrap()
        .register_transient::<CycleB, _>(|resolver| {
            Ok(Arc::new(CycleB {
                _a: resolver.resolve::<CycleA>()?,
            }))
        })
        .unwrap();
    let container = services.build();

    let err = container.resolve::<CycleA>().err().unwrap();
    assert!(err.is_cycle());
    match err {
        ContainerError::CircularDependency { cycle } => {
            assert_eq!(cycle.len(), 3);
            assert!(cycle[0].ends_with("CycleA"));
            assert!(cycle[1].ends_with("CycleB"));
            assert!(cycle[2].ends_with("CycleA"));
        }
        other => panic!("expected CircularDependency, got {}", other),
    }
    assert_eq!(container.stats().circular_dependencies, 1);

    // 失败的解析不会留下状态，再次解析得到同样的错误
    assert!(container.resolve::<CycleB>().err().unwrap().is_cycle());
}

#[test]
fn test_self_dependency_is_a_cycle() {
    struct Loop;
    let mut services = ServiceCollection::new();
    services
        .register_singleton::<Loop, _>(|resolver| {
            resolver.resolve::<Loop>()?;
            Ok(Arc::new(Loop))
        })
        .unwrap();
    let container = services.build();

    match container.resolve::<Loop>() {
        Err(ContainerError::CircularDependency { cycle }) => assert_eq!(cycle.len(), 2),
        _ => panic!("expected CircularDependency"),
    }
    // 单例槽位没有被失败的构造占用
    assert_eq!(container.stats().active_singletons, 0);
}

struct Session;

struct Cache {
    _session: Arc<Session>,
}

#[test]
fn test_singleton_cannot_capture_scoped_dependency() {
    let mut services = ServiceCollection::new();
    services
        .register_scoped_simple(|| Ok(Session))
        .unwrap()
        .register_singleton::<Cache, _>(|resolver| {
            Ok(Arc::new(Cache {
                _session: resolver.resolve::<Session>()?,
            }))
        })
        .unwrap();
    let container = services.build();
    let scope = container.create_scope();

    assert!(matches!(
        scope.resolve::<Cache>(),
        Err(ContainerError::NoActiveScope { .. })
    ));
    assert!(scope.resolve::<Session>().is_ok());
}

struct Tracked {
    name: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl Dispose for Tracked {
    fn dispose(&self) {
        self.log.lock().push(self.name);
    }
}

struct First(Arc<Tracked>);
struct Second(Arc<Tracked>);

impl Dispose for First {
    fn dispose(&self) {
        self.0.dispose();
    }
}

impl Dispose for Second {
    fn dispose(&self) {
        self.0.dispose();
    }
}

fn tracked_services(lifetime: ServiceLifetime, log: &Arc<Mutex<Vec<&'static str>>>) -> ServiceContainer {
    let mut services = ServiceCollection::new();
    let first_log = log.clone();
    let second_log = log.clone();
    services
        .register_disposable::<First, _>(lifetime, move |_| {
            Ok(Arc::new(First(Arc::new(Tracked {
                name: "first",
                log: first_log.clone(),
            }))))
        })
        .unwrap()
        .register_disposable::<Second, _>(lifetime, move |resolver| {
            // 依赖 First，保证 First 先创建
            resolver.resolve::<First>()?;
            Ok(Arc::new(Second(Arc::new(Tracked {
                name: "second",
                log: second_log.clone(),
            }))))
        })
        .unwrap();
    services.build()
}

#[test]
fn test_container_dispose_runs_once_in_reverse_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = tracked_services(ServiceLifetime::Singleton, &log);

    container.resolve::<Second>().unwrap();
    container.dispose();
    container.dispose();

    assert_eq!(*log.lock(), vec!["second", "first"]);
    assert!(matches!(
        container.resolve::<First>(),
        Err(ContainerError::ContainerDisposed)
    ));
    assert!(matches!(
        container.create_scope().resolve::<First>(),
        Err(ContainerError::ContainerDisposed)
    ));
}

#[test]
fn test_dropping_last_handle_disposes_container() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = tracked_services(ServiceLifetime::Singleton, &log);
    container.resolve::<Second>().unwrap();

    let clone = container.clone();
    drop(container);
    assert!(log.lock().is_empty());

    drop(clone);
    assert_eq!(*log.lock(), vec!["second", "first"]);
}

#[test]
fn test_scope_dispose_releases_scoped_instances() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let container = tracked_services(ServiceLifetime::Scoped, &log);

    {
        let scope = container.create_scope_named("request");
        scope.resolve::<Second>().unwrap();
        assert_eq!(scope.instance_count(), 2);

        scope.dispose();
        assert!(scope.is_disposed());
        match scope.resolve::<First>() {
            Err(ContainerError::ScopeDisposed { scope_name, .. }) => {
                assert_eq!(scope_name, "request")
            }
            _ => panic!("expected ScopeDisposed"),
        }
    }
    assert_eq!(*log.lock(), vec!["second", "first"]);

    // 作用域被丢弃时也会释放
    {
        let scope = container.create_scope();
        scope.resolve::<First>().unwrap();
    }
    assert_eq!(*log.lock(), vec!["second", "first", "first"]);

    // 容器本身没有单例需要释放
    container.dispose();
    assert_eq!(log.lock().len(), 3);
}

/// 工厂在构造中途阻塞，直到测试放行
struct Gate {
    started: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

struct Counted(Arc<AtomicUsize>);

impl Dispose for Counted {
    fn dispose(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

type Gated = (
    ServiceContainer,
    Arc<AtomicUsize>,
    mpsc::Receiver<()>,
    mpsc::Sender<()>,
);

fn gated_services(lifetime: ServiceLifetime) -> Gated {
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let gate = Gate {
        started: Mutex::new(started_tx),
        release: Mutex::new(release_rx),
    };
    let disposals = Arc::new(AtomicUsize::new(0));
    let counter = disposals.clone();

    let mut services = ServiceCollection::new();
    services
        .register_disposable::<Counted, _>(lifetime, move |_| {
            gate.started.lock().send(()).ok();
            gate.release.lock().recv().ok();
            Ok(Arc::new(Counted(counter.clone())))
        })
        .unwrap();
    (services.build(), disposals, started_rx, release_tx)
}

#[test]
fn test_singleton_finished_after_container_dispose_is_released() {
    let (container, disposals, started, release) = gated_services(ServiceLifetime::Singleton);

    let resolving = container.clone();
    let handle = std::thread::spawn(move || resolving.resolve::<Counted>().map(|_| ()));

    started.recv().unwrap();
    container.dispose();
    release.send(()).unwrap();

    assert!(matches!(
        handle.join().unwrap(),
        Err(ContainerError::ContainerDisposed)
    ));
    assert_eq!(disposals.load(Ordering::SeqCst), 1);

    drop(container);
    assert_eq!(disposals.load(Ordering::SeqCst), 1);
}

#[test]
fn test_scoped_finished_after_scope_dispose_is_released() {
    let (container, disposals, started, release) = gated_services(ServiceLifetime::Scoped);
    let scope = container.create_scope_named("request");

    let result = std::thread::scope(|threads| {
        let handle = threads.spawn(|| scope.resolve::<Counted>().map(|_| ()));
        started.recv().unwrap();
        scope.dispose();
        release.send(()).unwrap();
        handle.join().unwrap()
    });

    assert!(matches!(result, Err(ContainerError::ScopeDisposed { .. })));
    assert_eq!(scope.instance_count(), 0);
    assert_eq!(disposals.load(Ordering::SeqCst), 1);

    drop(scope);
    container.dispose();
    assert_eq!(disposals.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_construction_is_not_cached() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let mut services = ServiceCollection::new();
    services
        .register_singleton::<Repo, _>(move |_| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            if attempt == 0 {
                return Err(ContainerError::creation_failed::<Repo>("database offline"));
            }
            Ok(Arc::new(Repo { id: attempt }))
        })
        .unwrap();
    let container = services.build();

    match container.resolve::<Repo>() {
        Err(ContainerError::ServiceCreationFailed { reason, .. }) => {
            assert_eq!(reason, "database offline")
        }
        _ => panic!("expected ServiceCreationFailed"),
    }
    assert_eq!(container.resolve::<Repo>().unwrap().id, 1);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_provider_registration() {
    struct RepoProvider {
        base: usize,
    }

    impl iocdemo::infrastructure::ServiceProvider for RepoProvider {
        type Service = Repo;

        fn create(
            &self,
            _resolver: &iocdemo::infrastructure::Resolver<'_>,
        ) -> Result<Arc<Repo>, ContainerError> {
            Ok(Arc::new(Repo { id: self.base }))
        }
    }

    let mut services = ServiceCollection::new();
    services
        .register_provider(ServiceLifetime::Transient, RepoProvider { base: 7 })
        .unwrap();
    let container = services.build();
    assert_eq!(container.resolve::<Repo>().unwrap().id, 7);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_resolution_constructs_once() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = created.clone();
    let mut services = ServiceCollection::new();
    services
        .register_singleton::<Repo, _>(move |_| {
            // 放大竞争窗口
            std::thread::sleep(Duration::from_millis(20));
            let id = counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Repo { id }))
        })
        .unwrap();
    let container = services.build();

    let mut handles = vec![];
    for _ in 0..32 {
        let container = container.clone();
        handles.push(tokio::task::spawn_blocking(move || container.resolve::<Repo>()));
    }

    let results = future::join_all(handles).await;
    let instances: Vec<Arc<Repo>> = results
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(instances.iter().all(|repo| Arc::ptr_eq(repo, &instances[0])));

    let stats = container.stats();
    assert_eq!(stats.total_resolutions, 32);
    assert_eq!(stats.singleton_cache_misses, 1);
    assert_eq!(stats.singleton_cache_hits, 31);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_scopes_are_isolated() {
    let mut services = ServiceCollection::new();
    let created = counting_repo(&mut services, ServiceLifetime::Scoped);
    let container = services.build();

    let mut handles = vec![];
    for _ in 0..16 {
        let container = container.clone();
        handles.push(tokio::spawn(async move {
            let scope = container.create_scope();
            let a = scope.resolve::<Repo>().unwrap();
            let b = scope.resolve::<Repo>().unwrap();
            (Arc::ptr_eq(&a, &b), a.id)
        }));
    }

    let mut ids: Vec<usize> = future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| {
            let (shared, id) = joined.unwrap();
            assert!(shared);
            id
        })
        .collect();
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 16);
    assert_eq!(created.load(Ordering::SeqCst), 16);
}
