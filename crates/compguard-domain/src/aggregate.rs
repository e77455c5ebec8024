use crate::evaluators::ConditionViolation;
use crate::fingerprint::fingerprint_for_violation;
use compguard_types::{Policy, PolicyOperator, PolicyViolation, Subject, ViolationType};
use time::OffsetDateTime;

/// Whether the condition violations produced for `policy` raise it.
///
/// ALL compares counts, not coverage: one condition matching twice satisfies a
/// two-condition policy.
pub fn should_raise(policy: &Policy, found: &[ConditionViolation]) -> bool {
    match policy.operator {
        PolicyOperator::Any => !found.is_empty(),
        PolicyOperator::All => !found.is_empty() && found.len() == policy.conditions.len(),
    }
}

pub fn violation_type(subject: Subject) -> ViolationType {
    match subject {
        Subject::Cwe | Subject::Severity | Subject::VulnerabilityId => ViolationType::Security,
        Subject::Coordinates
        | Subject::PackageUrl
        | Subject::Cpe
        | Subject::SwidTagId
        | Subject::ComponentHash
        | Subject::Version => ViolationType::Operational,
        Subject::License | Subject::LicenseGroup => ViolationType::License,
    }
}

/// Turn condition violations into policy violations stamped with `timestamp`.
pub fn to_policy_violations(
    found: &[ConditionViolation],
    timestamp: OffsetDateTime,
) -> Vec<PolicyViolation> {
    found
        .iter()
        .map(|cv| PolicyViolation {
            component: cv.component.clone(),
            policy: cv.policy.clone(),
            condition: cv.condition.id.clone(),
            violation_type: violation_type(cv.condition.subject),
            timestamp,
            fingerprint: fingerprint_for_violation(&cv.component, &cv.condition.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{condition, policy};
    use compguard_types::{ComponentId, ConditionOperator};
    use time::macros::datetime;

    fn found(policy: &Policy, condition_index: usize) -> ConditionViolation {
        ConditionViolation {
            policy: policy.id.clone(),
            condition: policy.conditions[condition_index].clone(),
            component: ComponentId::new("c1"),
        }
    }

    fn two_conditions(operator: PolicyOperator) -> Policy {
        policy(
            "two",
            operator,
            vec![
                condition("k1", Subject::Cpe, ConditionOperator::Matches, "acme"),
                condition("k2", Subject::License, ConditionOperator::Is, "MIT"),
            ],
        )
    }

    #[test]
    fn any_raises_on_first_match() {
        let p = two_conditions(PolicyOperator::Any);
        assert!(!should_raise(&p, &[]));
        assert!(should_raise(&p, &[found(&p, 0)]));
    }

    #[test]
    fn all_compares_counts() {
        let p = two_conditions(PolicyOperator::All);
        assert!(!should_raise(&p, &[found(&p, 0)]));
        assert!(should_raise(&p, &[found(&p, 0), found(&p, 1)]));
        // Same condition twice still satisfies the count.
        assert!(should_raise(&p, &[found(&p, 0), found(&p, 0)]));
        assert!(!should_raise(&p, &[found(&p, 0), found(&p, 1), found(&p, 1)]));
    }

    #[test]
    fn all_without_conditions_never_raises() {
        let p = policy("empty", PolicyOperator::All, Vec::new());
        assert!(!should_raise(&p, &[]));
    }

    #[test]
    fn type_table_covers_every_subject() {
        use ViolationType::*;
        let expected = [
            (Subject::Cwe, Security),
            (Subject::Severity, Security),
            (Subject::VulnerabilityId, Security),
            (Subject::Coordinates, Operational),
            (Subject::PackageUrl, Operational),
            (Subject::Cpe, Operational),
            (Subject::SwidTagId, Operational),
            (Subject::ComponentHash, Operational),
            (Subject::Version, Operational),
            (Subject::License, License),
            (Subject::LicenseGroup, License),
        ];
        assert_eq!(expected.len(), Subject::ALL.len());
        for (subject, ty) in expected {
            assert_eq!(violation_type(subject), ty, "{subject}");
        }
    }

    #[test]
    fn policy_violations_carry_key_and_fingerprint() {
        let p = two_conditions(PolicyOperator::Any);
        let ts = datetime!(2024-01-01 00:00:00 UTC);
        let out = to_policy_violations(&[found(&p, 1)], ts);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].condition.as_str(), "k2");
        assert_eq!(out[0].violation_type, ViolationType::License);
        assert_eq!(out[0].timestamp, ts);
        assert_eq!(
            out[0].fingerprint,
            fingerprint_for_violation(&ComponentId::new("c1"), &out[0].condition)
        );
    }
}
