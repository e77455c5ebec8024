use super::ConditionViolation;
use super::utils::{equality_holds, trace_condition, violation};
use crate::error::EvaluatorError;
use crate::store::PolicyStore;
use compguard_types::{Component, Policy, Subject, ids};

pub fn evaluate(
    policy: &Policy,
    component: &Component,
    _store: &dyn PolicyStore,
) -> Result<Vec<ConditionViolation>, EvaluatorError> {
    let mut out = Vec::new();
    let license = component.resolved_license.as_deref();

    for condition in policy.conditions_for(Subject::License) {
        trace_condition(component, condition);
        let wanted = condition.value.trim();
        let equal = match license {
            Some(id) => id == wanted,
            None => wanted == ids::LICENSE_UNRESOLVED,
        };
        if equality_holds(condition.operator, equal) {
            out.push(violation(policy, condition, component));
        }
    }
    Ok(out)
}
