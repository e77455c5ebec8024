//! Policy evaluation engine (no file IO).
//!
//! Input: a component plus a [`store::PolicyStore`] holding policies and reference data.
//! Output: the reconciled set of policy violations for that component.
//!
//! Evaluation fans out one task per condition subject on a shared [`pool::WorkerPool`],
//! waits with a deadline, aggregates per policy, and reconciles against what the store
//! already records.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod evaluators;
pub mod fingerprint;
pub mod notify;
pub mod pool;
pub mod reconcile;
pub mod report;
pub mod selector;
pub mod store;

mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use config::{EffectiveConfig, FailOn};
pub use engine::{ComponentEvaluation, PolicyEngine, PolicyOutcome};
pub use error::{EngineError, EvaluatorError, PoolError, StoreError};
pub use notify::{NotificationOutbox, NotificationRequest, NotificationSink, NotifyScope};
pub use pool::WorkerPool;
pub use store::PolicyStore;
