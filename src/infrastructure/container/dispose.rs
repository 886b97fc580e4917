//! 资源释放

use std::sync::Arc;

use parking_lot::Mutex;

use super::key::{AnyInstance, ServiceKey};

/// 需要显式释放资源的服务
///
/// 通过 `ServiceCollection::register_disposable` 注册的服务，在其所属的容器
/// （单例）或作用域（作用域服务）释放时按创建的逆序调用 `dispose`。
/// 瞬态实例由调用者持有，容器不会跟踪。
pub trait Dispose: Send + Sync {
    fn dispose(&self);
}

/// 类型擦除的释放钩子
pub(crate) type Disposer = Arc<dyn Fn(&AnyInstance) + Send + Sync>;

pub(crate) fn disposer_for<T>() -> Disposer
where
    T: ?Sized + Dispose + 'static,
{
    Arc::new(|instance: &AnyInstance| {
        if let Some(service) = instance.downcast_ref::<Arc<T>>() {
            service.dispose();
        }
    })
}

#[derive(Default)]
struct BagState {
    entries: Vec<(ServiceKey, AnyInstance, Disposer)>,
    closed: bool,
}

/// 按创建顺序记录需要释放的实例
///
/// `dispose_all` 之后释放列表关闭，不再接受新实例。
#[derive(Default)]
pub(crate) struct DisposeBag {
    state: Mutex<BagState>,
}

impl DisposeBag {
    /// 记录实例；释放列表已关闭时不记录并返回 `false`，由调用者立即释放
    #[must_use]
    pub(crate) fn push(&self, key: ServiceKey, instance: AnyInstance, disposer: Disposer) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            return false;
        }
        state.entries.push((key, instance, disposer));
        true
    }

    pub(crate) fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// 关闭释放列表，逆序执行所有释放钩子，返回执行的数量
    pub(crate) fn dispose_all(&self, owner: &str) -> usize {
        let entries = {
            let mut state = self.state.lock();
            state.closed = true;
            std::mem::take(&mut state.entries)
        };
        let count = entries.len();
        for (key, instance, disposer) in entries.into_iter().rev() {
            tracing::debug!(owner, service = key.name(), "Disposing service instance");
            disposer(&instance);
        }
        count
    }
}
