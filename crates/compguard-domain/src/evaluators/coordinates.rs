use super::ConditionViolation;
use super::utils::{numeric_holds, parse_version_lenient, trace_condition, violation};
use crate::error::EvaluatorError;
use crate::store::PolicyStore;
use compguard_types::{Component, ConditionOperator, ConditionOperator as Op, Policy, Subject};
use globset::{Glob, GlobMatcher};
use semver::Version;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Default, Deserialize)]
struct CoordinatesValue {
    group: Option<String>,
    name: Option<String>,
    version: Option<String>,
}

enum VersionPattern {
    Compare(ConditionOperator, Version),
    Glob(GlobMatcher),
}

struct Pattern {
    group: Option<GlobMatcher>,
    name: Option<GlobMatcher>,
    version: Option<VersionPattern>,
}

pub fn evaluate(
    policy: &Policy,
    component: &Component,
    _store: &dyn PolicyStore,
) -> Result<Vec<ConditionViolation>, EvaluatorError> {
    let mut out = Vec::new();

    for condition in policy.conditions_for(Subject::Coordinates) {
        trace_condition(component, condition);
        let pattern = match parse_pattern(&condition.value) {
            Ok(p) => p,
            Err(reason) => {
                warn!(
                    condition = %condition.id,
                    value = %condition.value,
                    reason = %reason,
                    "coordinates condition value is unusable; skipping"
                );
                continue;
            }
        };
        let Some(matched) = pattern.matches(component) else {
            continue;
        };
        let raises = match condition.operator {
            Op::Matches => matched,
            Op::NoMatch => !matched,
            _ => false,
        };
        if raises {
            out.push(violation(policy, condition, component));
        }
    }
    Ok(out)
}

impl Pattern {
    /// `None` when the component version cannot be compared.
    fn matches(&self, component: &Component) -> Option<bool> {
        let group = component.group.as_deref().unwrap_or("");
        if let Some(glob) = &self.group
            && !glob.is_match(group)
        {
            return Some(false);
        }
        if let Some(glob) = &self.name
            && !glob.is_match(&component.name)
        {
            return Some(false);
        }
        match &self.version {
            None => Some(true),
            Some(VersionPattern::Glob(glob)) => {
                Some(glob.is_match(component.version.as_deref().unwrap_or("")))
            }
            Some(VersionPattern::Compare(op, wanted)) => {
                let actual = component.version.as_deref().and_then(parse_version_lenient)?;
                Some(numeric_holds(*op, actual.cmp(wanted)))
            }
        }
    }
}

fn parse_pattern(value: &str) -> Result<Pattern, String> {
    let raw: CoordinatesValue = serde_json::from_str(value).map_err(|e| e.to_string())?;
    let present = |part: Option<String>| part.filter(|p| !p.trim().is_empty());
    let (group, name, version) = (present(raw.group), present(raw.name), present(raw.version));
    if group.is_none() && name.is_none() && version.is_none() {
        return Err("no group, name or version given".to_string());
    }

    Ok(Pattern {
        group: group.as_deref().map(glob).transpose()?,
        name: name.as_deref().map(glob).transpose()?,
        version: version.as_deref().map(version_pattern).transpose()?,
    })
}

fn glob(pattern: &str) -> Result<GlobMatcher, String> {
    Glob::new(pattern.trim())
        .map(|g| g.compile_matcher())
        .map_err(|e| e.to_string())
}

fn version_pattern(raw: &str) -> Result<VersionPattern, String> {
    const COMPARATORS: [(&str, ConditionOperator); 6] = [
        (">=", Op::NumericGreaterThanOrEqual),
        ("<=", Op::NumericLesserThanOrEqual),
        ("==", Op::NumericEqual),
        ("!=", Op::NumericNotEqual),
        (">", Op::NumericGreaterThan),
        ("<", Op::NumericLessThan),
    ];

    let raw = raw.trim();
    for (prefix, op) in COMPARATORS {
        if let Some(rest) = raw.strip_prefix(prefix) {
            let version = parse_version_lenient(rest)
                .ok_or_else(|| format!("`{rest}` is not a version"))?;
            return Ok(VersionPattern::Compare(op, version));
        }
    }
    glob(raw).map(VersionPattern::Glob)
}
