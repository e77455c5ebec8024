use compguard_types::{ComponentId, Subject};
use thiserror::Error;

/// Failure reported by the persistence collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Failure inside a single condition evaluator. Never escapes the dispatcher.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("reference data lookup failed")]
    ReferenceData(#[from] StoreError),

    #[error("{subject} evaluator panicked: {message}")]
    Panicked { subject: Subject, message: String },
}

/// Failure of a whole component evaluation.
///
/// Only persistence failures surface here; evaluator failures and dispatch timeouts
/// are absorbed and reported on the evaluation itself.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to list policies")]
    ListPolicies(#[source] StoreError),

    #[error("failed to read recorded violations for component {component}")]
    ReadViolations {
        component: ComponentId,
        #[source]
        source: StoreError,
    },

    #[error("failed to write violations for component {component}")]
    WriteViolations {
        component: ComponentId,
        #[source]
        source: StoreError,
    },
}

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("evaluator pool needs at least one worker thread")]
    NoThreads,

    #[error("failed to start evaluator pool")]
    Build(#[from] rayon::ThreadPoolBuildError),
}
