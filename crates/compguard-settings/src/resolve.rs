use crate::{model::CompguardConfigV1, presets};
use anyhow::Context;
use compguard_domain::{EffectiveConfig, FailOn, NotifyScope};
use std::time::Duration;

/// Values from the command line; they win over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub worker_threads: Option<u32>,
    pub dispatch_timeout_secs: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: CompguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "default".to_string());

    let mut effective = presets::preset(&profile)?;

    if let Some(fail_on_s) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on_s)?;
    }

    if let Some(threads) = overrides.worker_threads.or(cfg.engine.worker_threads) {
        anyhow::ensure!(threads > 0, "engine.worker_threads must be at least 1");
        effective.worker_threads =
            usize::try_from(threads).context("engine.worker_threads is too large")?;
    }

    if let Some(secs) = overrides
        .dispatch_timeout_secs
        .or(cfg.engine.dispatch_timeout_secs)
    {
        anyhow::ensure!(secs > 0, "engine.dispatch_timeout_secs must be at least 1");
        effective.dispatch_timeout = Duration::from_secs(secs);
    }

    if let Some(scope) = cfg.notifications.scope.as_deref() {
        effective.notify_scope =
            parse_notify_scope(scope).context("invalid notifications.scope")?;
    }

    Ok(ResolvedConfig { effective })
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "fail" => Ok(FailOn::Fail),
        "warn" | "warning" => Ok(FailOn::Warn),
        other => anyhow::bail!("unknown fail_on: {other} (expected fail|warn)"),
    }
}

fn parse_notify_scope(v: &str) -> anyhow::Result<NotifyScope> {
    match v {
        "all" => Ok(NotifyScope::All),
        "new" => Ok(NotifyScope::New),
        other => anyhow::bail!("unknown notification scope: {other} (expected all|new)"),
    }
}
