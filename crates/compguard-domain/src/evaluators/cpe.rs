use super::ConditionViolation;
use super::utils::{substring_match, trace_condition, violation};
use crate::error::EvaluatorError;
use crate::store::PolicyStore;
use compguard_types::{Component, Policy, Subject};

pub fn evaluate(
    policy: &Policy,
    component: &Component,
    _store: &dyn PolicyStore,
) -> Result<Vec<ConditionViolation>, EvaluatorError> {
    let mut out = Vec::new();
    let Some(cpe) = component.cpe.as_deref() else {
        return Ok(out);
    };

    for condition in policy.conditions_for(Subject::Cpe) {
        trace_condition(component, condition);
        if substring_match(condition.operator, Some(cpe), &condition.value) {
            out.push(violation(policy, condition, component));
        }
    }
    Ok(out)
}
