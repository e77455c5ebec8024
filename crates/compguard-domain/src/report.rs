use crate::config::FailOn;
use crate::engine::ComponentEvaluation;
use compguard_types::{
    EvaluationData, PolicyViolation, ReportedViolation, Verdict, ViolationState,
};
use tracing::warn;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub info: u32,
    pub warn: u32,
    pub fail: u32,
}

impl StateCounts {
    pub fn from_violations(violations: &[ReportedViolation]) -> Self {
        let mut counts = StateCounts::default();
        for v in violations {
            match v.state {
                ViolationState::Info => counts.info += 1,
                ViolationState::Warn => counts.warn += 1,
                ViolationState::Fail => counts.fail += 1,
            }
        }
        counts
    }
}

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub violations: Vec<ReportedViolation>,
    pub data: EvaluationData,
    pub counts: StateCounts,
}

/// Summarize a batch of component evaluations.
pub fn summarize(
    evaluations: &[ComponentEvaluation],
    policies_defined: usize,
    fail_on: FailOn,
) -> DomainReport {
    let mut violations: Vec<ReportedViolation> = evaluations
        .iter()
        .flat_map(|eval| eval.violations.iter().filter_map(|v| describe(eval, v)))
        .collect();

    // Deterministic ordering for stable reports.
    violations.sort_by(compare_reported);

    let verdict = compute_verdict(&violations, fail_on);
    let counts = StateCounts::from_violations(&violations);

    let data = EvaluationData {
        components_evaluated: count(evaluations.len()),
        policies_defined: count(policies_defined),
        violations_total: count(violations.len()),
        violations_added: count(evaluations.iter().map(|e| e.added.len()).sum()),
        violations_removed: count(evaluations.iter().map(|e| e.removed.len()).sum()),
        dispatch_timeouts: count(evaluations.iter().map(|e| e.timed_out().count()).sum()),
        evaluator_failures: count(evaluations.iter().map(|e| e.failures.len()).sum()),
    };

    DomainReport {
        verdict,
        violations,
        data,
        counts,
    }
}

/// Report counts saturate instead of wrapping.
fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn describe(eval: &ComponentEvaluation, violation: &PolicyViolation) -> Option<ReportedViolation> {
    let outcome = eval
        .policies
        .iter()
        .find(|o| o.policy.id == violation.policy)?;
    let Some(condition) = outcome
        .policy
        .conditions
        .iter()
        .find(|c| c.id == violation.condition)
    else {
        warn!(
            policy = %outcome.policy.name,
            condition = %violation.condition,
            "recorded violation names a condition the policy no longer has"
        );
        return None;
    };

    Some(ReportedViolation {
        policy: outcome.policy.name.clone(),
        policy_id: outcome.policy.id.clone(),
        state: outcome.policy.violation_state,
        component: eval.component.id.clone(),
        component_name: eval.component.display_name(),
        subject: condition.subject,
        operator: condition.operator,
        value: condition.value.clone(),
        violation_type: violation.violation_type,
        timestamp: violation.timestamp,
        fingerprint: violation.fingerprint.clone(),
    })
}

pub fn compute_verdict(violations: &[ReportedViolation], fail_on: FailOn) -> Verdict {
    if violations.iter().any(|v| v.state == ViolationState::Fail) {
        return Verdict::Fail;
    }

    if violations.iter().any(|v| v.state == ViolationState::Warn) {
        return match fail_on {
            FailOn::Warn => Verdict::Fail,
            FailOn::Fail => Verdict::Warn,
        };
    }

    Verdict::Pass
}

fn compare_reported(a: &ReportedViolation, b: &ReportedViolation) -> std::cmp::Ordering {
    // Ordering priority:
    // 1) state (fail -> warn -> info)
    // 2) component id
    // 3) policy name
    // 4) fingerprint
    b.state
        .cmp(&a.state)
        .then(a.component.cmp(&b.component))
        .then(a.policy.cmp(&b.policy))
        .then(a.fingerprint.cmp(&b.fingerprint))
}
