use super::ConditionViolation;
use super::utils::{trace_condition, violation};
use crate::error::EvaluatorError;
use crate::store::PolicyStore;
use compguard_types::{Component, ConditionOperator, LicenseGroupId, Policy, Subject};

pub fn evaluate(
    policy: &Policy,
    component: &Component,
    store: &dyn PolicyStore,
) -> Result<Vec<ConditionViolation>, EvaluatorError> {
    let mut out = Vec::new();
    let license = component.resolved_license.as_deref();

    for condition in policy.conditions_for(Subject::LicenseGroup) {
        trace_condition(component, condition);
        let raises = match (license, condition.operator) {
            // Without a license nothing can be shown to be inside the group.
            (None, op) => op == ConditionOperator::IsNot,
            (Some(license), ConditionOperator::Is) => {
                let group = LicenseGroupId::new(condition.value.trim());
                store.is_license_in_group(&group, license)?
            }
            (Some(license), ConditionOperator::IsNot) => {
                let group = LicenseGroupId::new(condition.value.trim());
                !store.is_license_in_group(&group, license)?
            }
            _ => false,
        };
        if raises {
            out.push(violation(policy, condition, component));
        }
    }
    Ok(out)
}
