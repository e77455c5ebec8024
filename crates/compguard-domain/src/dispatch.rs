use crate::error::EvaluatorError;
use crate::evaluators::{ConditionViolation, EvaluatorTable};
use crate::pool::WorkerPool;
use crate::store::PolicyStore;
use compguard_types::{Component, Policy, PolicyId, Subject};
use std::any::Any;
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// An evaluator that failed or panicked. Its subject contributed nothing to the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluatorFailure {
    pub policy: PolicyId,
    pub subject: Subject,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct DispatchOutcome {
    /// Merged in completion order.
    pub violations: Vec<ConditionViolation>,
    pub failures: Vec<EvaluatorFailure>,
    /// Subjects whose evaluator had not reported back when the deadline passed.
    pub pending: BTreeSet<Subject>,
}

impl DispatchOutcome {
    pub fn timed_out(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Fans every registered evaluator out on the pool and fans the results back in,
/// waiting at most `timeout` per (policy, component) pair.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    pool: Arc<WorkerPool>,
    table: Arc<EvaluatorTable>,
    timeout: Duration,
}

type TaskResult = (Subject, Result<Vec<ConditionViolation>, EvaluatorError>);

impl Dispatcher {
    pub fn new(pool: Arc<WorkerPool>, table: EvaluatorTable, timeout: Duration) -> Self {
        Self {
            pool,
            table: Arc::new(table),
            timeout,
        }
    }

    pub fn pool(&self) -> Arc<WorkerPool> {
        Arc::clone(&self.pool)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn dispatch(
        &self,
        policy: Arc<Policy>,
        component: Arc<Component>,
        store: Arc<dyn PolicyStore>,
    ) -> DispatchOutcome {
        let (tx, rx) = mpsc::channel::<TaskResult>();
        let mut pending = BTreeSet::new();

        for (subject, evaluator) in self.table.iter() {
            pending.insert(subject);
            let tx = tx.clone();
            let policy = Arc::clone(&policy);
            let component = Arc::clone(&component);
            let store = Arc::clone(&store);
            self.pool.spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    evaluator(&policy, &component, store.as_ref())
                }))
                .unwrap_or_else(|payload| {
                    Err(EvaluatorError::Panicked {
                        subject,
                        message: panic_message(payload.as_ref()),
                    })
                });
                // The receiver is gone once the dispatcher stopped waiting.
                let _ = tx.send((subject, result));
            });
        }
        drop(tx);

        // A timeout too large for the clock means no deadline at all.
        let deadline = Instant::now().checked_add(self.timeout);
        let mut outcome = DispatchOutcome::default();

        while !pending.is_empty() {
            let received = match deadline {
                Some(deadline) => {
                    rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
                }
                None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok((subject, result)) => {
                    pending.remove(&subject);
                    match result {
                        Ok(found) => {
                            debug!(
                                policy = %policy.name,
                                subject = %subject,
                                found = found.len(),
                                "evaluator finished"
                            );
                            outcome.violations.extend(found);
                        }
                        Err(err) => {
                            error!(
                                component = %component.id,
                                policy = %policy.name,
                                subject = %subject,
                                error = %error_chain(&err),
                                "evaluator failed; treating as no violations"
                            );
                            outcome.failures.push(EvaluatorFailure {
                                policy: policy.id.clone(),
                                subject,
                                message: error_chain(&err),
                            });
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        component = %component.id,
                        policy = %policy.name,
                        pending = pending.len(),
                        timeout_secs = self.timeout.as_secs_f64(),
                        "policy evaluation timed out; continuing with partial results"
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    warn!(
                        policy = %policy.name,
                        pending = pending.len(),
                        "evaluator tasks dropped without reporting"
                    );
                    break;
                }
            }
        }

        outcome.pending = pending;
        outcome
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn error_chain(err: &EvaluatorError) -> String {
    let mut out = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::test_support::{TestStore, component, condition, policy};
    use compguard_types::{ConditionOperator, PolicyOperator};
    use std::thread;

    fn dispatcher(table: EvaluatorTable, timeout: Duration) -> Dispatcher {
        let pool = Arc::new(WorkerPool::new(4).expect("pool"));
        Dispatcher::new(pool, table, timeout)
    }

    fn cpe_policy() -> Policy {
        policy(
            "cpe",
            PolicyOperator::Any,
            vec![condition(
                "c1",
                Subject::Cpe,
                ConditionOperator::Matches,
                "cpe:2.3:a:acme",
            )],
        )
    }

    fn acme_component() -> Component {
        let mut c = component("comp-1", "proj-1");
        c.cpe = Some("cpe:2.3:a:acme:widget:1.0".to_string());
        c
    }

    fn always_panics(
        _: &Policy,
        _: &Component,
        _: &dyn PolicyStore,
    ) -> Result<Vec<ConditionViolation>, EvaluatorError> {
        panic!("evaluator exploded");
    }

    fn always_fails(
        _: &Policy,
        _: &Component,
        _: &dyn PolicyStore,
    ) -> Result<Vec<ConditionViolation>, EvaluatorError> {
        Err(StoreError::Unavailable("down".to_string()).into())
    }

    fn sleeps(
        _: &Policy,
        _: &Component,
        _: &dyn PolicyStore,
    ) -> Result<Vec<ConditionViolation>, EvaluatorError> {
        thread::sleep(Duration::from_millis(1500));
        Ok(Vec::new())
    }

    #[test]
    fn collects_from_every_evaluator() {
        let d = dispatcher(EvaluatorTable::standard(), Duration::from_secs(10));
        let store: Arc<dyn PolicyStore> = Arc::new(TestStore::default());
        let outcome = d.dispatch(Arc::new(cpe_policy()), Arc::new(acme_component()), store);

        assert_eq!(outcome.violations.len(), 1);
        assert!(outcome.failures.is_empty());
        assert!(!outcome.timed_out());
    }

    #[test]
    fn panicking_evaluator_is_isolated() {
        let mut table = EvaluatorTable::standard();
        table.replace(Subject::Severity, always_panics);
        table.replace(Subject::License, always_fails);
        let d = dispatcher(table, Duration::from_secs(10));
        let store: Arc<dyn PolicyStore> = Arc::new(TestStore::default());

        let outcome = d.dispatch(Arc::new(cpe_policy()), Arc::new(acme_component()), store);

        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.failures.len(), 2);
        let panicked = outcome
            .failures
            .iter()
            .find(|f| f.subject == Subject::Severity)
            .expect("severity failure");
        assert!(panicked.message.contains("evaluator exploded"));
        let failed = outcome
            .failures
            .iter()
            .find(|f| f.subject == Subject::License)
            .expect("license failure");
        assert!(failed.message.contains("down"));
        assert!(!outcome.timed_out());
    }

    #[test]
    fn unbounded_timeout_waits_for_every_evaluator() {
        let d = dispatcher(EvaluatorTable::standard(), Duration::from_secs(u64::MAX));
        let store: Arc<dyn PolicyStore> = Arc::new(TestStore::default());
        let outcome = d.dispatch(Arc::new(cpe_policy()), Arc::new(acme_component()), store);

        assert_eq!(outcome.violations.len(), 1);
        assert!(!outcome.timed_out());
    }

    #[test]
    fn slow_evaluator_yields_partial_results() {
        let mut table = EvaluatorTable::standard();
        table.replace(Subject::Version, sleeps);
        let d = dispatcher(table, Duration::from_millis(200));
        let store: Arc<dyn PolicyStore> = Arc::new(TestStore::default());

        let started = Instant::now();
        let outcome = d.dispatch(Arc::new(cpe_policy()), Arc::new(acme_component()), store);

        assert!(started.elapsed() < Duration::from_millis(1400));
        assert!(outcome.timed_out());
        assert_eq!(outcome.pending.iter().copied().collect::<Vec<_>>(), vec![Subject::Version]);
        assert_eq!(outcome.violations.len(), 1);
    }
}
