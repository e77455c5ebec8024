use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `compguard.toml` schema v1.
///
/// Every key is optional; an empty file resolves to the `default` profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CompguardConfigV1 {
    /// Optional schema string for tooling (`compguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `default` or `strict`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Lowest policy violation state that fails the run: `fail` or `warn`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    #[serde(default)]
    pub engine: EngineSection,

    #[serde(default)]
    pub notifications: NotificationsSection,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Size of the shared evaluator pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_threads: Option<u32>,

    /// Seconds to wait for all evaluators of one policy before using partial results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispatch_timeout_secs: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NotificationsSection {
    /// `all` re-requests every standing violation, `new` only those added by the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}
