use crate::notify::NotifyScope;
use std::time::Duration;

pub const DEFAULT_WORKER_THREADS: usize = 5;
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Lowest policy violation state that fails the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Fail,
    Warn,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub profile: String,
    pub fail_on: FailOn,
    /// Size of the shared evaluator pool.
    pub worker_threads: usize,
    /// Fan-in bound per (policy, component) pair.
    pub dispatch_timeout: Duration,
    pub notify_scope: NotifyScope,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            profile: "default".to_string(),
            fail_on: FailOn::Fail,
            worker_threads: DEFAULT_WORKER_THREADS,
            dispatch_timeout: DEFAULT_DISPATCH_TIMEOUT,
            notify_scope: NotifyScope::All,
        }
    }
}
