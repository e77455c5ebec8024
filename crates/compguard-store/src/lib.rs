//! Persistence adapter: an in-memory [`compguard_domain::PolicyStore`] plus JSON loading.
//!
//! This crate is allowed to do filesystem IO. The engine only ever sees the store trait.

#![forbid(unsafe_code)]

mod memory;
mod model;

use anyhow::Context;
use camino::Utf8Path;
use compguard_types::PolicyViolation;
use tracing::{debug, info, warn};

pub use memory::MemoryStore;
pub use model::{Inventory, SCHEMA_INVENTORY_V1, SCHEMA_STATE_V1, StateFile};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
pub mod fuzz {
    /// Parse arbitrary text as an inventory and index it.
    ///
    /// Returns `Err(...)` for anything that is not a valid inventory. **Never panics.**
    pub fn parse_and_index(text: &str) -> anyhow::Result<()> {
        let inventory = super::parse_inventory(text)?;
        let _ = super::MemoryStore::from_inventory(inventory)?;
        Ok(())
    }
}

pub fn parse_inventory(text: &str) -> anyhow::Result<Inventory> {
    let inventory: Inventory = serde_json::from_str(text).context("parse inventory JSON")?;
    if let Some(schema) = inventory.schema.as_deref()
        && schema != SCHEMA_INVENTORY_V1
    {
        anyhow::bail!("unsupported inventory schema: {schema} (expected {SCHEMA_INVENTORY_V1})");
    }
    Ok(inventory)
}

pub fn load_inventory(path: &Utf8Path) -> anyhow::Result<Inventory> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read inventory {path}"))?;
    let inventory = parse_inventory(&text).with_context(|| format!("load inventory {path}"))?;
    debug!(path = %path, policies = inventory.policies.len(), "loaded inventory");
    Ok(inventory)
}

pub fn parse_state(text: &str) -> anyhow::Result<Vec<PolicyViolation>> {
    let state: StateFile = serde_json::from_str(text).context("parse state JSON")?;
    if state.schema != SCHEMA_STATE_V1 {
        anyhow::bail!(
            "unsupported state schema: {} (expected {SCHEMA_STATE_V1})",
            state.schema
        );
    }
    Ok(state.violations)
}

/// Load persisted violations. A missing file is an empty state (first run).
pub fn load_state(path: &Utf8Path) -> anyhow::Result<Vec<PolicyViolation>> {
    if !path.exists() {
        info!(path = %path, "no violation state yet; starting empty");
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path).with_context(|| format!("read state {path}"))?;
    let violations = parse_state(&text).with_context(|| format!("load state {path}"))?;
    debug!(path = %path, violations = violations.len(), "loaded violation state");
    Ok(violations)
}

pub fn save_state(path: &Utf8Path, violations: Vec<PolicyViolation>) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create dir {parent}"))?;
    }
    let count = violations.len();
    let json =
        serde_json::to_vec_pretty(&StateFile::new(violations)).context("serialize state")?;
    std::fs::write(path, json).with_context(|| format!("write state {path}"))?;
    debug!(path = %path, violations = count, "saved violation state");
    Ok(())
}

/// Build a store from an inventory file and an optional state file.
pub fn open(inventory: &Utf8Path, state: Option<&Utf8Path>) -> anyhow::Result<MemoryStore> {
    let inv = load_inventory(inventory)?;
    let store = MemoryStore::from_inventory(inv).with_context(|| format!("index {inventory}"))?;
    let Some(state) = state else {
        return Ok(store);
    };
    let violations = load_state(state)?;
    let stale = violations
        .iter()
        .filter(|v| store.component(&v.component).is_none())
        .count();
    if stale > 0 {
        warn!(
            stale,
            "state holds violations for components missing from the inventory"
        );
    }
    Ok(store.with_violations(violations))
}
