use compguard_types::{Component, LicenseGroup, Policy, PolicyViolation, Project, Vulnerability};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_INVENTORY_V1: &str = "compguard.inventory.v1";
pub const SCHEMA_STATE_V1: &str = "compguard.state.v1";

/// Everything the engine reads: policies plus the reference data conditions inspect.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Inventory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default)]
    pub policies: Vec<Policy>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(default)]
    pub license_groups: Vec<LicenseGroup>,
}

/// Persisted violations, carried between runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StateFile {
    pub schema: String,
    #[serde(default)]
    pub violations: Vec<PolicyViolation>,
}

impl StateFile {
    pub fn new(violations: Vec<PolicyViolation>) -> Self {
        Self {
            schema: SCHEMA_STATE_V1.to_string(),
            violations,
        }
    }
}
