//! Fixed-size worker pool backing one parallel execution.

use lazyseq_core::config::ParallelConfig;
use lazyseq_core::error::{Result, SeqError};

/// A named rayon pool sized to the configured degree of parallelism.
pub struct WorkerPool {
    inner: rayon::ThreadPool,
    degree: usize,
}

impl WorkerPool {
    pub fn new(config: &ParallelConfig) -> Result<Self> {
        let degree = config.effective_degree();
        let prefix = config.thread_name_prefix.clone();
        let inner = rayon::ThreadPoolBuilder::new()
            .num_threads(degree)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()
            .map_err(|e| SeqError::Worker(format!("failed to build worker pool: {e}")))?;
        Ok(Self { inner, degree })
    }

    pub fn degree(&self) -> usize {
        self.inner.current_num_threads().min(self.degree)
    }

    /// Run `op` on the calling thread with a scope whose spawned tasks go to
    /// the pool. Returns once every spawned task has finished.
    pub fn scope<'scope, OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce(&rayon::Scope<'scope>) -> R,
    {
        self.inner.in_place_scope(op)
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("degree", &self.degree)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_threads_carry_prefix() {
        let mut cfg = ParallelConfig::default().with_degree(2);
        cfg.thread_name_prefix = "lazyseq-pool-test".to_string();
        let pool = WorkerPool::new(&cfg).unwrap();
        assert_eq!(pool.degree(), 2);

        let name = std::sync::Mutex::new(None);
        pool.scope(|s| {
            s.spawn(|_| {
                *name.lock().unwrap() = std::thread::current().name().map(str::to_string);
            });
        });
        let name = name.into_inner().unwrap().unwrap();
        assert!(name.starts_with("lazyseq-pool-test-"), "unexpected thread name {name}");
    }
}
