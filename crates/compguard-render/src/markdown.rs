use crate::{RenderableReport, RenderableState, RenderableVerdict};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Compguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdict::Pass => "PASS",
        RenderableVerdict::Warn => "WARN",
        RenderableVerdict::Fail => "FAIL",
    };
    let data = &report.data;
    out.push_str(&format!(
        "- Verdict: **{}**\n- Components: {} evaluated against {} policies\n- Violations: {} standing ({} new, {} resolved)\n\n",
        verdict,
        data.components_evaluated,
        data.policies_defined,
        data.violations_total,
        data.violations_added,
        data.violations_removed
    ));

    if data.dispatch_timeouts > 0 {
        out.push_str(&format!(
            "> Note: {} policy evaluation(s) timed out; results may be incomplete.\n\n",
            data.dispatch_timeouts
        ));
    }
    if data.evaluator_failures > 0 {
        out.push_str(&format!(
            "> Note: {} evaluator failure(s) were treated as no violations.\n\n",
            data.evaluator_failures
        ));
    }

    if report.violations.is_empty() {
        out.push_str("No policy violations.\n");
        return out;
    }

    out.push_str("## Violations\n\n");
    out.push_str("| State | Policy | Component | Condition | Type |\n");
    out.push_str("|---|---|---|---|---|\n");

    for v in &report.violations {
        let state = match v.state {
            RenderableState::Info => "INFO",
            RenderableState::Warn => "WARN",
            RenderableState::Fail => "FAIL",
        };
        out.push_str(&format!(
            "| {} | `{}` | `{}` | {} {} `{}` | {} |\n",
            state,
            cell(&v.policy),
            cell(&v.component),
            v.subject,
            v.operator,
            cell(&v.value),
            v.violation_type
        ));
    }

    out
}

fn cell(raw: &str) -> String {
    raw.replace('|', "\\|").replace('\n', " ")
}
