use crate::error::PoolError;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

/// Fixed-size pool the dispatcher fans evaluator tasks out on.
///
/// Built once by the process and shared by every engine through an `Arc`. Dropping
/// the last handle lets queued tasks finish and then stops the workers.
pub struct WorkerPool {
    inner: ThreadPool,
    threads: usize,
}

impl WorkerPool {
    pub fn new(threads: usize) -> Result<Self, PoolError> {
        if threads == 0 {
            return Err(PoolError::NoThreads);
        }
        let inner = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("policy-engine-{i}"))
            .build()?;
        debug!(threads, "evaluator pool started");
        Ok(Self { inner, threads })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Queue a detached task. The caller observes completion through its own channel.
    pub fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.spawn(job);
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("threads", &self.threads)
            .finish()
    }
}
