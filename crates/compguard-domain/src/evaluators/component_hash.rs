use super::ConditionViolation;
use super::utils::{trace_condition, violation};
use crate::error::EvaluatorError;
use crate::store::PolicyStore;
use compguard_types::{Component, ConditionOperator, Policy, Subject};
use serde::Deserialize;
use tracing::warn;

#[derive(Deserialize)]
struct HashValue {
    algorithm: String,
    value: String,
}

pub fn evaluate(
    policy: &Policy,
    component: &Component,
    _store: &dyn PolicyStore,
) -> Result<Vec<ConditionViolation>, EvaluatorError> {
    let mut out = Vec::new();

    for condition in policy.conditions_for(Subject::ComponentHash) {
        trace_condition(component, condition);
        let wanted: HashValue = match serde_json::from_str(&condition.value) {
            Ok(v) => v,
            Err(err) => {
                warn!(
                    condition = %condition.id,
                    error = %err,
                    "component hash condition value is not a JSON hash; skipping"
                );
                continue;
            }
        };

        let algorithm = normalize_algorithm(&wanted.algorithm);
        let Some(actual) = component
            .hashes
            .iter()
            .find(|(name, _)| normalize_algorithm(name) == algorithm)
            .map(|(_, digest)| digest)
        else {
            continue;
        };

        let equal = actual.trim().eq_ignore_ascii_case(wanted.value.trim());
        let raises = match condition.operator {
            ConditionOperator::Is => equal,
            ConditionOperator::IsNot => !equal,
            _ => false,
        };
        if raises {
            out.push(violation(policy, condition, component));
        }
    }
    Ok(out)
}

/// `sha-256`, `SHA_256` and `SHA256` name the same algorithm.
fn normalize_algorithm(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
