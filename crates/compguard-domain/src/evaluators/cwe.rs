use super::ConditionViolation;
use super::utils::{equality_holds, trace_condition, violation};
use crate::error::EvaluatorError;
use crate::store::PolicyStore;
use compguard_types::{Component, Policy, PolicyCondition, Subject};
use tracing::warn;

pub fn evaluate(
    policy: &Policy,
    component: &Component,
    store: &dyn PolicyStore,
) -> Result<Vec<ConditionViolation>, EvaluatorError> {
    let conditions: Vec<(&PolicyCondition, Vec<u32>)> = policy
        .conditions_for(Subject::Cwe)
        .filter_map(|condition| match parse_cwe_list(&condition.value) {
            Some(cwes) => Some((condition, cwes)),
            None => {
                warn!(
                    condition = %condition.id,
                    value = %condition.value,
                    "CWE condition value has no CWE ids; skipping"
                );
                None
            }
        })
        .collect();
    if conditions.is_empty() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for vulnerability in store.list_vulnerabilities_for(&component.id)? {
        for (condition, wanted) in &conditions {
            trace_condition(component, condition);
            let shared = vulnerability.cwes.iter().any(|cwe| wanted.contains(cwe));
            if equality_holds(condition.operator, shared) {
                out.push(violation(policy, condition, component));
            }
        }
    }
    Ok(out)
}

/// `CWE-79, 89` -> `[79, 89]`. Entries that are not CWE ids are dropped.
fn parse_cwe_list(value: &str) -> Option<Vec<u32>> {
    let cwes: Vec<u32> = value
        .split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            let digits = entry
                .get(..4)
                .filter(|prefix| prefix.eq_ignore_ascii_case("CWE-"))
                .map_or(entry, |_| &entry[4..]);
            digits.parse().ok()
        })
        .collect();
    (!cwes.is_empty()).then_some(cwes)
}
