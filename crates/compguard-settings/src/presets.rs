use compguard_domain::config::{DEFAULT_DISPATCH_TIMEOUT, DEFAULT_WORKER_THREADS};
use compguard_domain::{EffectiveConfig, FailOn, NotifyScope};

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> anyhow::Result<EffectiveConfig> {
    match profile {
        "default" => Ok(default_profile()),
        "strict" => Ok(strict_profile()),
        other => anyhow::bail!("unknown profile: {other} (expected 'default' or 'strict')"),
    }
}

fn default_profile() -> EffectiveConfig {
    EffectiveConfig {
        profile: "default".to_string(),
        fail_on: FailOn::Fail,
        worker_threads: DEFAULT_WORKER_THREADS,
        dispatch_timeout: DEFAULT_DISPATCH_TIMEOUT,
        notify_scope: NotifyScope::All,
    }
}

fn strict_profile() -> EffectiveConfig {
    // Warnings are release blockers here.
    EffectiveConfig {
        profile: "strict".to_string(),
        fail_on: FailOn::Warn,
        ..default_profile()
    }
}
