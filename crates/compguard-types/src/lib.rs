//! Stable DTOs and IDs used across the compguard workspace.
//!
//! This crate is intentionally boring:
//! - policy, component and violation data types
//! - the emitted evaluation report
//! - stable string IDs
//! - explain registry for condition subjects

#![forbid(unsafe_code)]

pub mod component;
pub mod explain;
pub mod id;
pub mod ids;
pub mod policy;
pub mod receipt;
pub mod violation;

pub use component::{Component, LicenseGroup, Project, Severity, Vulnerability};
pub use explain::{ExampleCondition, Explanation, all_subjects, lookup_explanation};
pub use id::{ComponentId, ConditionId, LicenseGroupId, PolicyId, ProjectId};
pub use policy::{
    ConditionOperator, Policy, PolicyCondition, PolicyOperator, Subject, ViolationState,
};
pub use receipt::{
    CompguardReport, EvaluationData, ReportEnvelope, ReportedViolation, SCHEMA_REPORT_V1,
    ToolMeta, Verdict,
};
pub use violation::{PolicyViolation, ViolationKey, ViolationType};
