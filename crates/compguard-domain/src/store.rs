use crate::error::StoreError;
use compguard_types::{
    Component, ComponentId, LicenseGroupId, Policy, PolicyViolation, Project, ProjectId,
    Vulnerability,
};

/// Everything the engine reads from and writes to persistence.
///
/// Implementations are shared across worker threads and concurrent evaluations, so
/// every method takes `&self`.
pub trait PolicyStore: Send + Sync {
    fn list_all_policies(&self) -> Result<Vec<Policy>, StoreError>;

    fn fetch_component_by_id(&self, id: &ComponentId) -> Result<Option<Component>, StoreError>;

    fn fetch_policy_by_name(&self, name: &str) -> Result<Option<Policy>, StoreError>;

    fn fetch_project(&self, id: &ProjectId) -> Result<Option<Project>, StoreError>;

    fn list_vulnerabilities_for(
        &self,
        component: &ComponentId,
    ) -> Result<Vec<Vulnerability>, StoreError>;

    /// `false` for unknown groups.
    fn is_license_in_group(&self, group: &LicenseGroupId, license: &str)
    -> Result<bool, StoreError>;

    fn list_existing_violations_for(
        &self,
        component: &ComponentId,
    ) -> Result<Vec<PolicyViolation>, StoreError>;

    /// Inserts unless a violation with the same (component, condition) exists.
    /// Returns whether a record was written.
    fn insert_violation_if_absent(&self, violation: &PolicyViolation) -> Result<bool, StoreError>;

    /// Returns whether a record was removed.
    fn delete_violation(&self, violation: &PolicyViolation) -> Result<bool, StoreError>;
}
