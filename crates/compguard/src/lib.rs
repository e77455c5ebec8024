//! Public facade over the compguard policy engine.
//!
//! Embedders implement [`PolicyStore`] (and optionally [`NotificationSink`]), build a
//! [`WorkerPool`], and call [`PolicyEngine::evaluate`] per component.

#![forbid(unsafe_code)]

pub use compguard_domain::{
    ComponentEvaluation, EffectiveConfig, EngineError, EvaluatorError, FailOn,
    NotificationOutbox, NotificationRequest, NotificationSink, NotifyScope, PolicyEngine,
    PolicyOutcome, PolicyStore, PoolError, StoreError, WorkerPool,
};
pub use compguard_types as types;
