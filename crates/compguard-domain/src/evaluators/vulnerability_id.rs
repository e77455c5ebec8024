use super::ConditionViolation;
use super::utils::{equality_holds, trace_condition, violation};
use crate::error::EvaluatorError;
use crate::store::PolicyStore;
use compguard_types::{Component, Policy, PolicyCondition, Subject};

pub fn evaluate(
    policy: &Policy,
    component: &Component,
    store: &dyn PolicyStore,
) -> Result<Vec<ConditionViolation>, EvaluatorError> {
    let conditions: Vec<&PolicyCondition> =
        policy.conditions_for(Subject::VulnerabilityId).collect();
    if conditions.is_empty() {
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for vulnerability in store.list_vulnerabilities_for(&component.id)? {
        for condition in &conditions {
            trace_condition(component, condition);
            let equal = vulnerability
                .id
                .eq_ignore_ascii_case(condition.value.trim());
            if equality_holds(condition.operator, equal) {
                out.push(violation(policy, condition, component));
            }
        }
    }
    Ok(out)
}
