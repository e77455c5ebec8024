use crate::{ConditionId, PolicyId, ProjectId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How the conditions of a policy combine into a policy violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PolicyOperator {
    Any,
    All,
}

/// Outcome a policy asks for when it is violated.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ViolationState {
    #[default]
    Info,
    Warn,
    Fail,
}

/// The component attribute a condition inspects.
///
/// The set is closed: every subject has exactly one evaluator.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Subject {
    Coordinates,
    Cpe,
    License,
    LicenseGroup,
    PackageUrl,
    Severity,
    #[serde(rename = "SWID_TAGID")]
    SwidTagId,
    Version,
    ComponentHash,
    Cwe,
    VulnerabilityId,
}

impl Subject {
    pub const ALL: [Subject; 11] = [
        Subject::Coordinates,
        Subject::Cpe,
        Subject::License,
        Subject::LicenseGroup,
        Subject::PackageUrl,
        Subject::Severity,
        Subject::SwidTagId,
        Subject::Version,
        Subject::ComponentHash,
        Subject::Cwe,
        Subject::VulnerabilityId,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Coordinates => "COORDINATES",
            Subject::Cpe => "CPE",
            Subject::License => "LICENSE",
            Subject::LicenseGroup => "LICENSE_GROUP",
            Subject::PackageUrl => "PACKAGE_URL",
            Subject::Severity => "SEVERITY",
            Subject::SwidTagId => "SWID_TAGID",
            Subject::Version => "VERSION",
            Subject::ComponentHash => "COMPONENT_HASH",
            Subject::Cwe => "CWE",
            Subject::VulnerabilityId => "VULNERABILITY_ID",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses subject names case-insensitively; `-` is accepted in place of `_`.
impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        if wanted == "SWID_TAG_ID" {
            wanted = "SWID_TAGID".to_string();
        }
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == wanted)
            .ok_or_else(|| format!("unknown subject: {s}"))
    }
}

/// Comparison a condition applies between the subject attribute and its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionOperator {
    Is,
    IsNot,
    Matches,
    NoMatch,
    NumericGreaterThan,
    NumericLessThan,
    NumericEqual,
    NumericNotEqual,
    NumericGreaterThanOrEqual,
    NumericLesserThanOrEqual,
}

impl ConditionOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionOperator::Is => "IS",
            ConditionOperator::IsNot => "IS_NOT",
            ConditionOperator::Matches => "MATCHES",
            ConditionOperator::NoMatch => "NO_MATCH",
            ConditionOperator::NumericGreaterThan => "NUMERIC_GREATER_THAN",
            ConditionOperator::NumericLessThan => "NUMERIC_LESS_THAN",
            ConditionOperator::NumericEqual => "NUMERIC_EQUAL",
            ConditionOperator::NumericNotEqual => "NUMERIC_NOT_EQUAL",
            ConditionOperator::NumericGreaterThanOrEqual => "NUMERIC_GREATER_THAN_OR_EQUAL",
            ConditionOperator::NumericLesserThanOrEqual => "NUMERIC_LESSER_THAN_OR_EQUAL",
        }
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (subject, operator, value) comparison owned by one policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyCondition {
    pub id: ConditionId,
    pub subject: Subject,
    pub operator: ConditionOperator,
    /// Subject-specific payload: a CPE fragment, a SemVer string, a JSON object, ...
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Policy {
    pub id: PolicyId,
    pub name: String,
    pub operator: PolicyOperator,
    #[serde(default)]
    pub violation_state: ViolationState,

    /// Global policies apply to every component; assignments are ignored.
    #[serde(default)]
    pub global: bool,

    /// Also apply to descendants of the assigned projects.
    #[serde(default)]
    pub include_children: bool,

    #[serde(default)]
    pub conditions: Vec<PolicyCondition>,
    #[serde(default)]
    pub projects: BTreeSet<ProjectId>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Policy {
    /// Conditions of this policy that inspect `subject`.
    pub fn conditions_for(&self, subject: Subject) -> impl Iterator<Item = &PolicyCondition> {
        self.conditions.iter().filter(move |c| c.subject == subject)
    }
}
