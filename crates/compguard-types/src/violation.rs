use crate::{ComponentId, ConditionId, PolicyId, ids};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ViolationType {
    Security,
    Operational,
    License,
}

impl ViolationType {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationType::Security => ids::TYPE_SECURITY,
            ViolationType::Operational => ids::TYPE_OPERATIONAL,
            ViolationType::License => ids::TYPE_LICENSE,
        }
    }
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a persisted violation: at most one exists per key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViolationKey {
    pub component: ComponentId,
    pub condition: ConditionId,
}

/// A persisted record that a component breaches one policy condition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyViolation {
    pub component: ComponentId,
    pub policy: PolicyId,
    pub condition: ConditionId,
    #[serde(rename = "type")]
    pub violation_type: ViolationType,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,

    /// Stable hash of the violation key, for dedup across runs and tools.
    pub fingerprint: String,
}

impl PolicyViolation {
    pub fn key(&self) -> ViolationKey {
        ViolationKey {
            component: self.component.clone(),
            condition: self.condition.clone(),
        }
    }
}
