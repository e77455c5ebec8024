use super::ConditionViolation;
use super::utils::{numeric_holds, parse_version_lenient, trace_condition, violation};
use crate::error::EvaluatorError;
use crate::store::PolicyStore;
use compguard_types::{Component, Policy, Subject};
use tracing::warn;

pub fn evaluate(
    policy: &Policy,
    component: &Component,
    _store: &dyn PolicyStore,
) -> Result<Vec<ConditionViolation>, EvaluatorError> {
    let mut out = Vec::new();
    let Some(actual) = component.version.as_deref().and_then(parse_version_lenient) else {
        return Ok(out);
    };

    for condition in policy.conditions_for(Subject::Version) {
        trace_condition(component, condition);
        let Some(wanted) = parse_version_lenient(&condition.value) else {
            warn!(
                condition = %condition.id,
                value = %condition.value,
                "version condition value is not a version; skipping"
            );
            continue;
        };
        if numeric_holds(condition.operator, actual.cmp(&wanted)) {
            out.push(violation(policy, condition, component));
        }
    }
    Ok(out)
}
