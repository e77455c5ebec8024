//! One evaluator per condition subject.
//!
//! Each evaluator looks only at the policy's conditions for its own subject and
//! returns one [`ConditionViolation`] per matching (condition, fact) pair.

use crate::error::EvaluatorError;
use crate::store::PolicyStore;
use compguard_types::{Component, ComponentId, Policy, PolicyCondition, PolicyId, Subject};
use std::collections::BTreeMap;

mod component_hash;
mod coordinates;
mod cpe;
mod cwe;
mod license;
mod license_group;
mod package_url;
mod severity;
mod swid_tag_id;
mod utils;
mod version;
mod vulnerability_id;


pub use utils::parse_version_lenient;

/// A condition the component satisfied during one evaluation pass. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionViolation {
    pub policy: PolicyId,
    pub condition: PolicyCondition,
    pub component: ComponentId,
}

pub type EvaluatorFn =
    fn(&Policy, &Component, &dyn PolicyStore) -> Result<Vec<ConditionViolation>, EvaluatorError>;

/// The built-in evaluator for `subject`. The match is exhaustive over the closed subject set.
pub fn evaluator_for(subject: Subject) -> EvaluatorFn {
    match subject {
        Subject::Coordinates => coordinates::evaluate,
        Subject::Cpe => cpe::evaluate,
        Subject::License => license::evaluate,
        Subject::LicenseGroup => license_group::evaluate,
        Subject::PackageUrl => package_url::evaluate,
        Subject::Severity => severity::evaluate,
        Subject::SwidTagId => swid_tag_id::evaluate,
        Subject::Version => version::evaluate,
        Subject::ComponentHash => component_hash::evaluate,
        Subject::Cwe => cwe::evaluate,
        Subject::VulnerabilityId => vulnerability_id::evaluate,
    }
}

/// Subject-keyed dispatch table, resolved once when the engine is built.
#[derive(Clone, Debug)]
pub struct EvaluatorTable {
    entries: BTreeMap<Subject, EvaluatorFn>,
}

impl EvaluatorTable {
    pub fn standard() -> Self {
        let entries = Subject::ALL
            .into_iter()
            .map(|subject| (subject, evaluator_for(subject)))
            .collect();
        Self { entries }
    }

    /// Swap the evaluator for one subject, e.g. to inject a failing one in tests.
    pub fn replace(&mut self, subject: Subject, evaluator: EvaluatorFn) {
        self.entries.insert(subject, evaluator);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subject, EvaluatorFn)> + '_ {
        self.entries.iter().map(|(subject, f)| (*subject, *f))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EvaluatorTable {
    fn default() -> Self {
        Self::standard()
    }
}
