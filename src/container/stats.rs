use std::sync::atomic::{AtomicU64, Ordering};

/// 内部统计信息（原子计数器）
#[derive(Debug, Default)]
pub(crate) struct InnerStats {
    pub(crate) total_resolutions: AtomicU64,
    pub(crate) singleton_cache_hits: AtomicU64,
    pub(crate) singleton_cache_misses: AtomicU64,
    pub(crate) transient_creations: AtomicU64,
    pub(crate) cycle_breaks: AtomicU64,
    pub(crate) construction_failures: AtomicU64,
    pub(crate) unmatched_requests: AtomicU64,
}

impl InnerStats {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, registered_services: usize, active_singletons: usize) -> ResolverStats {
        ResolverStats {
            total_resolutions: self.total_resolutions.load(Ordering::Relaxed),
            singleton_cache_hits: self.singleton_cache_hits.load(Ordering::Relaxed),
            singleton_cache_misses: self.singleton_cache_misses.load(Ordering::Relaxed),
            transient_creations: self.transient_creations.load(Ordering::Relaxed),
            cycle_breaks: self.cycle_breaks.load(Ordering::Relaxed),
            construction_failures: self.construction_failures.load(Ordering::Relaxed),
            unmatched_requests: self.unmatched_requests.load(Ordering::Relaxed),
            registered_services,
            active_singletons,
        }
    }
}

/// 解析器统计信息快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// 解析次数（包含递归解析）
    pub total_resolutions: u64,
    pub singleton_cache_hits: u64,
    pub singleton_cache_misses: u64,
    /// 瞬态服务创建次数
    pub transient_creations: u64,
    /// 因循环依赖被截断的分支数
    pub cycle_breaks: u64,
    /// 所有构造函数都失败的次数
    pub construction_failures: u64,
    /// 没有匹配注册的请求数
    pub unmatched_requests: u64,
    pub registered_services: usize,
    pub active_singletons: usize,
}

impl ResolverStats {
    /// 单例缓存命中率（小数形式）
    pub fn hit_rate(&self) -> f64 {
        let total = self.singleton_cache_hits + self.singleton_cache_misses;
        if total == 0 {
            0.0
        } else {
            self.singleton_cache_hits as f64 / total as f64
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Resolver: {} resolutions, {:.1}% singleton hit rate, {} registered services, {} active singletons, {} cycle breaks, {} construction failures",
            self.total_resolutions,
            self.hit_rate() * 100.0,
            self.registered_services,
            self.active_singletons,
            self.cycle_breaks,
            self.construction_failures
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_and_hit_rate() {
        let inner = InnerStats::default();
        assert_eq!(inner.snapshot(0, 0).hit_rate(), 0.0);

        InnerStats::bump(&inner.singleton_cache_hits);
        InnerStats::bump(&inner.singleton_cache_hits);
        InnerStats::bump(&inner.singleton_cache_hits);
        InnerStats::bump(&inner.singleton_cache_misses);

        let stats = inner.snapshot(4, 1);
        assert_eq!(stats.singleton_cache_hits, 3);
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
        assert!(stats.summary().contains("75.0% singleton hit rate"));
        assert_eq!(stats.registered_services, 4);
    }
}
