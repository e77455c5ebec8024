use crate::{
    ComponentId, ConditionOperator, PolicyId, Subject, ViolationState, ViolationType,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for compguard reports.
pub const SCHEMA_REPORT_V1: &str = "compguard.report.v1";

/// Verdict is intentionally small: it maps cleanly to CI signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// One standing violation, denormalized for humans and CI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportedViolation {
    pub policy: String,
    pub policy_id: PolicyId,
    pub state: ViolationState,
    pub component: ComponentId,
    pub component_name: String,
    pub subject: Subject,
    pub operator: ConditionOperator,
    pub value: String,
    #[serde(rename = "type")]
    pub violation_type: ViolationType,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub fingerprint: String,
}

/// Compguard-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct EvaluationData {
    pub components_evaluated: u32,
    pub policies_defined: u32,

    pub violations_total: u32,
    pub violations_added: u32,
    pub violations_removed: u32,

    /// Policy x component pairs whose fan-in gave up waiting.
    pub dispatch_timeouts: u32,
    pub evaluator_failures: u32,
}

/// A generic receipt/envelope.
///
/// Keeping this generic allows tool-specific data while the outer shape stays stable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = EvaluationData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub violations: Vec<ReportedViolation>,
    pub data: TData,
}

pub type CompguardReport = ReportEnvelope<EvaluationData>;
