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
    let swid = component.swid_tag_id.as_deref();
    Ok(policy
        .conditions_for(Subject::SwidTagId)
        .inspect(|condition| trace_condition(component, condition))
        .filter(|condition| substring_match(condition.operator, swid, &condition.value))
        .map(|condition| violation(policy, condition, component))
        .collect())
}
