//! 容器统计信息

use std::sync::atomic::{AtomicU64, Ordering};

/// 内部容器统计信息（原子计数器）
#[derive(Default)]
pub(crate) struct InnerStats {
    pub(crate) total_resolutions: AtomicU64,
    pub(crate) singleton_cache_hits: AtomicU64,
    pub(crate) singleton_cache_misses: AtomicU64,
    pub(crate) scoped_cache_hits: AtomicU64,
    pub(crate) scoped_cache_misses: AtomicU64,
    pub(crate) transient_creations: AtomicU64,
    pub(crate) circular_dependencies: AtomicU64,
    pub(crate) active_singletons: AtomicU64,
}

impl InnerStats {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, registered_services: usize) -> ContainerStats {
        ContainerStats {
            total_resolutions: self.total_resolutions.load(Ordering::Relaxed),
            singleton_cache_hits: self.singleton_cache_hits.load(Ordering::Relaxed),
            singleton_cache_misses: self.singleton_cache_misses.load(Ordering::Relaxed),
            scoped_cache_hits: self.scoped_cache_hits.load(Ordering::Relaxed),
            scoped_cache_misses: self.scoped_cache_misses.load(Ordering::Relaxed),
            transient_creations: self.transient_creations.load(Ordering::Relaxed),
            circular_dependencies: self.circular_dependencies.load(Ordering::Relaxed),
            registered_services,
            active_singletons: self.active_singletons.load(Ordering::Relaxed) as usize,
        }
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerStats {
    /// 总解析次数（包括依赖的递归解析）
    pub total_resolutions: u64,
    /// 单例缓存命中次数
    pub singleton_cache_hits: u64,
    /// 单例缓存未命中次数（即单例创建次数）
    pub singleton_cache_misses: u64,
    /// 作用域缓存命中次数
    pub scoped_cache_hits: u64,
    /// 作用域缓存未命中次数
    pub scoped_cache_misses: u64,
    /// 瞬态服务创建次数
    pub transient_creations: u64,
    /// 检测到的循环依赖次数
    pub circular_dependencies: u64,
    /// 服务注册数量
    pub registered_services: usize,
    /// 活跃单例数量
    pub active_singletons: usize,
}

impl ContainerStats {
    /// 缓存命中率（小数形式，单例与作用域合计）
    pub fn hit_rate(&self) -> f64 {
        let hits = self.singleton_cache_hits + self.scoped_cache_hits;
        let total = hits + self.singleton_cache_misses + self.scoped_cache_misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// 获取服务创建分布 (singleton, scoped, transient)
    pub fn creation_distribution(&self) -> (u64, u64, u64) {
        (
            self.singleton_cache_misses,
            self.scoped_cache_misses,
            self.transient_creations,
        )
    }

    /// 获取性能指标摘要
    pub fn performance_summary(&self) -> String {
        format!(
            "Container Performance: {} total resolutions, {:.1}% cache hit rate, {} registered services, {} active singletons",
            self.total_resolutions,
            self.hit_rate() * 100.0,
            self.registered_services,
            self.active_singletons
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_and_summary() {
        let stats = ContainerStats {
            total_resolutions: 4,
            singleton_cache_hits: 1,
            singleton_cache_misses: 1,
            scoped_cache_hits: 1,
            scoped_cache_misses: 1,
            registered_services: 2,
            active_singletons: 1,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 0.5);
        assert_eq!(stats.creation_distribution(), (1, 1, 0));

        let summary = stats.performance_summary();
        assert!(summary.contains("4 total resolutions"));
        assert!(summary.contains("50.0% cache hit rate"));
        assert!(summary.contains("2 registered services"));
    }

    #[test]
    fn test_empty_stats_hit_rate_is_zero() {
        assert_eq!(ContainerStats::default().hit_rate(), 0.0);
    }
}
