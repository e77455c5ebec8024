//! The `evaluate` use case: load inventory and state, run the engine, produce a report.

use anyhow::Context;
use camino::Utf8Path;
use compguard_domain::report::DomainReport;
use compguard_domain::{
    NotificationOutbox, NotificationRequest, PolicyEngine, PolicyStore, WorkerPool,
};
use compguard_settings::{Overrides, ResolvedConfig};
use compguard_types::{
    CompguardReport, ComponentId, PolicyViolation, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta,
    Verdict, ids,
};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::info;

/// Input for the evaluate use case.
#[derive(Clone, Debug)]
pub struct EvaluateInput<'a> {
    pub inventory: &'a Utf8Path,
    /// Prior violation state; a missing file starts empty.
    pub state: Option<&'a Utf8Path>,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
    /// Components to evaluate; every inventory component when empty.
    pub components: Vec<ComponentId>,
}

#[derive(Clone, Debug)]
pub struct EvaluateOutput {
    pub report: CompguardReport,
    pub resolved_config: ResolvedConfig,
    /// Every violation on record after the run, for persisting back to the state file.
    pub violations: Vec<PolicyViolation>,
    /// Requests drained from the notification outbox, in emission order.
    pub notifications: Vec<NotificationRequest>,
}

pub fn run_evaluate(input: EvaluateInput<'_>) -> anyhow::Result<EvaluateOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        compguard_settings::CompguardConfigV1::default()
    } else {
        compguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved = compguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;
    let effective = &resolved.effective;

    let store = Arc::new(compguard_store::open(input.inventory, input.state)?);
    let selected = match input.components.as_slice() {
        [] => store.components().cloned().collect::<Vec<_>>(),
        wanted => wanted
            .iter()
            .map(|id| {
                store
                    .component(id)
                    .cloned()
                    .with_context(|| format!("unknown component: {id}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?,
    };

    let pool = Arc::new(WorkerPool::new(effective.worker_threads).context("start worker pool")?);
    let (outbox, requests) = NotificationOutbox::channel();
    let engine = PolicyEngine::new(
        Arc::clone(&store) as Arc<dyn PolicyStore>,
        pool,
        effective,
    )
    .with_notifier(Arc::new(outbox));

    let mut evaluations = Vec::with_capacity(selected.len());
    for component in &selected {
        let evaluation = engine
            .evaluate_detailed(component)
            .with_context(|| format!("evaluate component {}", component.id))?;
        evaluations.push(evaluation);
    }

    let DomainReport {
        verdict,
        violations: reported,
        data,
        counts,
    } = compguard_domain::report::summarize(
        &evaluations,
        store.policies().len(),
        effective.fail_on,
    );

    info!(
        verdict = ?verdict,
        fail = counts.fail,
        warn = counts.warn,
        info = counts.info,
        "evaluation finished"
    );

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: ids::TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        violations: reported,
        data,
    };

    Ok(EvaluateOutput {
        report,
        resolved_config: resolved,
        violations: store.violations(),
        notifications: requests.try_iter().collect(),
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
