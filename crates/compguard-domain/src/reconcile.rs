use crate::error::{EngineError, StoreError};
use crate::store::PolicyStore;
use compguard_types::{ComponentId, PolicyViolation, ViolationKey};
use std::collections::BTreeMap;
use tracing::debug;

/// Result of aligning the recorded violations of one component with a fresh computation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Everything on record afterwards, ordered by key.
    pub standing: Vec<PolicyViolation>,
    pub added: Vec<PolicyViolation>,
    pub removed: Vec<PolicyViolation>,
}

/// Insert computed violations that are not on record, delete recorded ones that no
/// longer reproduce.
///
/// Violations already on record keep their original timestamp. Running twice over the
/// same input writes nothing the second time.
pub fn reconcile(
    store: &dyn PolicyStore,
    component: &ComponentId,
    computed: Vec<PolicyViolation>,
) -> Result<Reconciliation, EngineError> {
    let existing: BTreeMap<ViolationKey, PolicyViolation> = store
        .list_existing_violations_for(component)
        .map_err(|source| EngineError::ReadViolations {
            component: component.clone(),
            source,
        })?
        .into_iter()
        .map(|v| (v.key(), v))
        .collect();

    let mut wanted: BTreeMap<ViolationKey, PolicyViolation> = BTreeMap::new();
    for violation in computed {
        wanted.entry(violation.key()).or_insert(violation);
    }

    let mut out = Reconciliation::default();

    for (key, violation) in wanted {
        if let Some(recorded) = existing.get(&key) {
            out.standing.push(recorded.clone());
            continue;
        }
        if store
            .insert_violation_if_absent(&violation)
            .map_err(|source| write_error(component, source))?
        {
            debug!(component = %component, condition = %key.condition, "violation recorded");
            out.added.push(violation.clone());
        }
        out.standing.push(violation);
    }

    let standing_keys: Vec<ViolationKey> = out.standing.iter().map(|v| v.key()).collect();
    for (key, recorded) in existing {
        if standing_keys.binary_search(&key).is_ok() {
            continue;
        }
        store
            .delete_violation(&recorded)
            .map_err(|source| write_error(component, source))?;
        debug!(component = %component, condition = %key.condition, "violation cleared");
        out.removed.push(recorded);
    }

    Ok(out)
}

fn write_error(component: &ComponentId, source: StoreError) -> EngineError {
    EngineError::WriteViolations {
        component: component.clone(),
        source,
    }
}
