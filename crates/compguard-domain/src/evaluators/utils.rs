use super::ConditionViolation;
use compguard_types::{Component, ConditionOperator, Policy, PolicyCondition};
use semver::Version;
use std::cmp::Ordering;
use tracing::debug;

pub fn violation(
    policy: &Policy,
    condition: &PolicyCondition,
    component: &Component,
) -> ConditionViolation {
    ConditionViolation {
        policy: policy.id.clone(),
        condition: condition.clone(),
        component: component.id.clone(),
    }
}

pub fn trace_condition(component: &Component, condition: &PolicyCondition) {
    debug!(
        component = %component.id,
        condition = %condition.id,
        subject = %condition.subject,
        operator = %condition.operator,
        "evaluating condition"
    );
}

/// MATCHES / NO_MATCH by substring of the trimmed value. An absent attribute never
/// matches either way.
pub fn substring_match(operator: ConditionOperator, attribute: Option<&str>, value: &str) -> bool {
    let Some(attribute) = attribute else {
        return false;
    };
    let value = value.trim();
    match operator {
        ConditionOperator::Matches => attribute.contains(value),
        ConditionOperator::NoMatch => !attribute.contains(value),
        _ => false,
    }
}

/// IS / IS_NOT on an equality test. Other operators never hold.
pub fn equality_holds(operator: ConditionOperator, equal: bool) -> bool {
    match operator {
        ConditionOperator::Is => equal,
        ConditionOperator::IsNot => !equal,
        _ => false,
    }
}

/// Whether `ordering` (attribute compared to condition value) satisfies a numeric operator.
pub fn numeric_holds(operator: ConditionOperator, ordering: Ordering) -> bool {
    match operator {
        ConditionOperator::NumericGreaterThan => ordering == Ordering::Greater,
        ConditionOperator::NumericLessThan => ordering == Ordering::Less,
        ConditionOperator::NumericEqual => ordering == Ordering::Equal,
        ConditionOperator::NumericNotEqual => ordering != Ordering::Equal,
        ConditionOperator::NumericGreaterThanOrEqual => ordering != Ordering::Less,
        ConditionOperator::NumericLesserThanOrEqual => ordering != Ordering::Greater,
        _ => false,
    }
}

/// Parse a version the way people write them: `v1.2`, `2`, `1.0-beta.1`.
///
/// A leading `v` is dropped and missing minor/patch parts are padded with `0`.
/// Returns `None` for anything that still is not SemVer afterwards.
pub fn parse_version_lenient(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(version) = Version::parse(trimmed) {
        return Some(version);
    }

    let split = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split);
    let parts: Vec<&str> = core.split('.').collect();
    let numeric = |p: &&str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if parts.len() > 3 || !parts.iter().all(numeric) {
        return None;
    }

    let mut padded = parts.join(".");
    for _ in parts.len()..3 {
        padded.push_str(".0");
    }
    padded.push_str(suffix);
    Version::parse(&padded).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parse_pads_and_strips() {
        assert_eq!(parse_version_lenient("1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_version_lenient("v1.2"), Some(Version::new(1, 2, 0)));
        assert_eq!(parse_version_lenient(" 2 "), Some(Version::new(2, 0, 0)));
        let pre = parse_version_lenient("1.0-beta.1").expect("pre-release");
        assert_eq!(pre.pre.as_str(), "beta.1");
        assert_eq!((pre.major, pre.minor, pre.patch), (1, 0, 0));
    }

    #[test]
    fn lenient_parse_rejects_garbage() {
        assert_eq!(parse_version_lenient(""), None);
        assert_eq!(parse_version_lenient("v"), None);
        assert_eq!(parse_version_lenient("1.2.3.4"), None);
        assert_eq!(parse_version_lenient("latest"), None);
        assert_eq!(parse_version_lenient("1..2"), None);
    }

    #[test]
    fn numeric_operators_follow_ordering() {
        use ConditionOperator::*;
        assert!(numeric_holds(NumericLessThan, Ordering::Less));
        assert!(!numeric_holds(NumericLessThan, Ordering::Equal));
        assert!(numeric_holds(NumericGreaterThanOrEqual, Ordering::Equal));
        assert!(numeric_holds(NumericLesserThanOrEqual, Ordering::Less));
        assert!(numeric_holds(NumericNotEqual, Ordering::Greater));
        assert!(!numeric_holds(Is, Ordering::Equal));
    }

    #[test]
    fn substring_match_ignores_absent_attribute() {
        assert!(!substring_match(ConditionOperator::NoMatch, None, "x"));
        assert!(substring_match(ConditionOperator::NoMatch, Some("abc"), "x"));
        assert!(!substring_match(ConditionOperator::Is, Some("abc"), "a"));
    }
}
