//! Render use cases: markdown from in-memory reports.

use compguard_render::RenderableReport;

pub fn render_markdown(report: &RenderableReport) -> String {
    compguard_render::render_markdown(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use compguard_render::{
        RenderableData, RenderableState, RenderableVerdict, RenderableViolation,
    };

    #[test]
    fn render_markdown_smoke() {
        let report = RenderableReport {
            verdict: RenderableVerdict::Warn,
            violations: vec![RenderableViolation {
                state: RenderableState::Warn,
                policy: "no-copyleft".to_string(),
                component: "readline@8.1".to_string(),
                subject: "LICENSE_GROUP".to_string(),
                operator: "IS".to_string(),
                value: "copyleft".to_string(),
                violation_type: "LICENSE".to_string(),
            }],
            data: RenderableData::default(),
        };
        let markdown = render_markdown(&report);
        assert!(markdown.contains("readline@8.1"));
    }
}
