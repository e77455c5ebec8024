use anyhow::Context;
use compguard_render::{
    RenderableData, RenderableReport, RenderableState, RenderableVerdict, RenderableViolation,
};
use compguard_types::{CompguardReport, ReportedViolation, SCHEMA_REPORT_V1, Verdict, ViolationState};

pub fn parse_report_json(text: &str) -> anyhow::Result<CompguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse compguard v1 report")
}

pub fn serialize_report(report: &CompguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &CompguardReport) -> RenderableReport {
    let d = &report.data;
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdict::Pass,
            Verdict::Warn => RenderableVerdict::Warn,
            Verdict::Fail => RenderableVerdict::Fail,
        },
        violations: report.violations.iter().map(renderable_violation).collect(),
        data: RenderableData {
            components_evaluated: d.components_evaluated,
            policies_defined: d.policies_defined,
            violations_total: d.violations_total,
            violations_added: d.violations_added,
            violations_removed: d.violations_removed,
            dispatch_timeouts: d.dispatch_timeouts,
            evaluator_failures: d.evaluator_failures,
        },
    }
}

fn renderable_violation(v: &ReportedViolation) -> RenderableViolation {
    RenderableViolation {
        state: match v.state {
            ViolationState::Info => RenderableState::Info,
            ViolationState::Warn => RenderableState::Warn,
            ViolationState::Fail => RenderableState::Fail,
        },
        policy: v.policy.clone(),
        component: v.component_name.clone(),
        subject: v.subject.to_string(),
        operator: v.operator.to_string(),
        value: v.value.clone(),
        violation_type: v.violation_type.to_string(),
    }
}
