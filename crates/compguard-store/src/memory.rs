use crate::model::Inventory;
use anyhow::bail;
use compguard_domain::{PolicyStore, StoreError};
use compguard_types::{
    Component, ComponentId, LicenseGroup, LicenseGroupId, Policy, PolicyViolation, Project,
    ProjectId, ViolationKey, Vulnerability,
};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Thread-safe [`PolicyStore`] over an inventory snapshot.
///
/// Reference data is read-only after construction; only the violation set mutates.
#[derive(Debug, Default)]
pub struct MemoryStore {
    policies: Vec<Policy>,
    components: BTreeMap<ComponentId, Component>,
    projects: BTreeMap<ProjectId, Project>,
    vulnerabilities: Vec<Vulnerability>,
    license_groups: BTreeMap<LicenseGroupId, LicenseGroup>,
    violations: RwLock<BTreeMap<ViolationKey, PolicyViolation>>,
}

impl MemoryStore {
    /// Index an inventory. Duplicate identities are rejected.
    pub fn from_inventory(inventory: Inventory) -> anyhow::Result<Self> {
        let mut names = BTreeSet::new();
        let mut policy_ids = BTreeSet::new();
        // Violations are keyed by (component, condition), so condition ids span policies.
        let mut condition_ids = BTreeSet::new();
        for p in &inventory.policies {
            if !names.insert(p.name.as_str()) {
                bail!("duplicate policy name: {}", p.name);
            }
            if !policy_ids.insert(&p.id) {
                bail!("duplicate policy id: {}", p.id);
            }
            for c in &p.conditions {
                if !condition_ids.insert(&c.id) {
                    bail!("duplicate condition id: {} (policy {})", c.id, p.name);
                }
            }
        }

        let projects = index_unique(inventory.projects, |p| p.id.clone(), "project")?;
        let components = index_unique(inventory.components, |c| c.id.clone(), "component")?;
        let license_groups =
            index_unique(inventory.license_groups, |g| g.id.clone(), "license group")?;

        for component in components.values() {
            if !projects.contains_key(&component.project) {
                warn!(
                    component = %component.id,
                    project = %component.project,
                    "component references a project missing from the inventory"
                );
            }
        }

        debug!(
            policies = inventory.policies.len(),
            projects = projects.len(),
            components = components.len(),
            vulnerabilities = inventory.vulnerabilities.len(),
            license_groups = license_groups.len(),
            "indexed inventory"
        );

        Ok(Self {
            policies: inventory.policies,
            components,
            projects,
            vulnerabilities: inventory.vulnerabilities,
            license_groups,
            violations: RwLock::new(BTreeMap::new()),
        })
    }

    /// Seed previously persisted violations. Later duplicates of a key are dropped.
    pub fn with_violations(self, violations: Vec<PolicyViolation>) -> Self {
        {
            let mut map = self.violations.write();
            for v in violations {
                map.entry(v.key()).or_insert(v);
            }
        }
        self
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Components in id order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn component(&self, id: &ComponentId) -> Option<&Component> {
        self.components.get(id)
    }

    /// Snapshot of every persisted violation, ordered by (component, condition).
    pub fn violations(&self) -> Vec<PolicyViolation> {
        self.violations.read().values().cloned().collect()
    }
}

fn index_unique<K: Ord + std::fmt::Display, V>(
    items: Vec<V>,
    key: impl Fn(&V) -> K,
    what: &str,
) -> anyhow::Result<BTreeMap<K, V>> {
    let mut out = BTreeMap::new();
    for item in items {
        let k = key(&item);
        if out.contains_key(&k) {
            bail!("duplicate {what} id: {k}");
        }
        out.insert(k, item);
    }
    Ok(out)
}

impl PolicyStore for MemoryStore {
    fn list_all_policies(&self) -> Result<Vec<Policy>, StoreError> {
        Ok(self.policies.clone())
    }

    fn fetch_component_by_id(&self, id: &ComponentId) -> Result<Option<Component>, StoreError> {
        Ok(self.components.get(id).cloned())
    }

    fn fetch_policy_by_name(&self, name: &str) -> Result<Option<Policy>, StoreError> {
        Ok(self.policies.iter().find(|p| p.name == name).cloned())
    }

    fn fetch_project(&self, id: &ProjectId) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.get(id).cloned())
    }

    fn list_vulnerabilities_for(
        &self,
        component: &ComponentId,
    ) -> Result<Vec<Vulnerability>, StoreError> {
        Ok(self
            .vulnerabilities
            .iter()
            .filter(|v| v.affects.contains(component))
            .cloned()
            .collect())
    }

    fn is_license_in_group(
        &self,
        group: &LicenseGroupId,
        license: &str,
    ) -> Result<bool, StoreError> {
        Ok(self
            .license_groups
            .get(group)
            .is_some_and(|g| g.contains(license)))
    }

    fn list_existing_violations_for(
        &self,
        component: &ComponentId,
    ) -> Result<Vec<PolicyViolation>, StoreError> {
        Ok(self
            .violations
            .read()
            .values()
            .filter(|v| &v.component == component)
            .cloned()
            .collect())
    }

    fn insert_violation_if_absent(&self, violation: &PolicyViolation) -> Result<bool, StoreError> {
        let mut map = self.violations.write();
        let key = violation.key();
        if map.contains_key(&key) {
            return Ok(false);
        }
        map.insert(key, violation.clone());
        Ok(true)
    }

    fn delete_violation(&self, violation: &PolicyViolation) -> Result<bool, StoreError> {
        Ok(self.violations.write().remove(&violation.key()).is_some())
    }
}
