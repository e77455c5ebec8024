use crate::error::StoreError;
use crate::store::PolicyStore;
use compguard_types::{
    Component, ComponentId, ConditionId, ConditionOperator, LicenseGroup, LicenseGroupId, Policy,
    PolicyCondition, PolicyId, PolicyOperator, PolicyViolation, Project, ProjectId, Severity,
    Subject, ViolationState, Vulnerability,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn condition(
    id: &str,
    subject: Subject,
    operator: ConditionOperator,
    value: &str,
) -> PolicyCondition {
    PolicyCondition {
        id: ConditionId::new(id),
        subject,
        operator,
        value: value.to_string(),
    }
}

pub fn policy(name: &str, operator: PolicyOperator, conditions: Vec<PolicyCondition>) -> Policy {
    Policy {
        id: PolicyId::new(format!("pol-{name}")),
        name: name.to_string(),
        operator,
        violation_state: ViolationState::Fail,
        global: true,
        include_children: false,
        conditions,
        projects: BTreeSet::new(),
        tags: BTreeSet::new(),
    }
}

pub fn component(id: &str, project: &str) -> Component {
    Component {
        id: ComponentId::new(id),
        project: ProjectId::new(project),
        name: id.to_string(),
        ..Component::default()
    }
}

pub fn project(id: &str, parent: Option<&str>, tags: &[&str]) -> Project {
    Project {
        id: ProjectId::new(id),
        name: id.to_string(),
        parent: parent.map(ProjectId::new),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn vulnerability(
    id: &str,
    severity: Severity,
    cwes: &[u32],
    affects: &[&str],
) -> Vulnerability {
    Vulnerability {
        id: id.to_string(),
        source: None,
        severity,
        cwes: cwes.to_vec(),
        affects: affects.iter().map(|c| ComponentId::new(*c)).collect(),
    }
}

/// Mutex-backed store for domain tests.
#[derive(Default)]
pub struct TestStore {
    pub policies: Mutex<Vec<Policy>>,
    pub components: Mutex<BTreeMap<ComponentId, Component>>,
    pub projects: Mutex<BTreeMap<ProjectId, Project>>,
    pub vulnerabilities: Mutex<Vec<Vulnerability>>,
    pub groups: Mutex<BTreeMap<LicenseGroupId, LicenseGroup>>,
    pub violations: Mutex<Vec<PolicyViolation>>,
    pub fail_writes: AtomicBool,
    pub fail_policies: AtomicBool,
}

impl TestStore {
    pub fn with_policies(policies: Vec<Policy>) -> Self {
        let store = Self::default();
        *store.policies.lock().expect("lock") = policies;
        store
    }

    pub fn add_component(&self, component: Component) {
        self.components
            .lock()
            .expect("lock")
            .insert(component.id.clone(), component);
    }

    pub fn add_project(&self, project: Project) {
        self.projects
            .lock()
            .expect("lock")
            .insert(project.id.clone(), project);
    }

    pub fn add_vulnerability(&self, vulnerability: Vulnerability) {
        self.vulnerabilities.lock().expect("lock").push(vulnerability);
    }

    pub fn add_group(&self, id: &str, licenses: &[&str]) {
        let group = LicenseGroup {
            id: LicenseGroupId::new(id),
            name: id.to_string(),
            licenses: licenses.iter().map(|l| l.to_string()).collect(),
        };
        self.groups.lock().expect("lock").insert(group.id.clone(), group);
    }

    pub fn recorded(&self) -> Vec<PolicyViolation> {
        let mut out = self.violations.lock().expect("lock").clone();
        out.sort_by(|a, b| a.key().cmp(&b.key()));
        out
    }
}

impl PolicyStore for TestStore {
    fn list_all_policies(&self) -> Result<Vec<Policy>, StoreError> {
        if self.fail_policies.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("policies offline".to_string()));
        }
        Ok(self.policies.lock().expect("lock").clone())
    }

    fn fetch_component_by_id(&self, id: &ComponentId) -> Result<Option<Component>, StoreError> {
        Ok(self.components.lock().expect("lock").get(id).cloned())
    }

    fn fetch_policy_by_name(&self, name: &str) -> Result<Option<Policy>, StoreError> {
        Ok(self
            .policies
            .lock()
            .expect("lock")
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    fn fetch_project(&self, id: &ProjectId) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.lock().expect("lock").get(id).cloned())
    }

    fn list_vulnerabilities_for(
        &self,
        component: &ComponentId,
    ) -> Result<Vec<Vulnerability>, StoreError> {
        Ok(self
            .vulnerabilities
            .lock()
            .expect("lock")
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
            .groups
            .lock()
            .expect("lock")
            .get(group)
            .is_some_and(|g| g.contains(license)))
    }

    fn list_existing_violations_for(
        &self,
        component: &ComponentId,
    ) -> Result<Vec<PolicyViolation>, StoreError> {
        Ok(self
            .violations
            .lock()
            .expect("lock")
            .iter()
            .filter(|v| &v.component == component)
            .cloned()
            .collect())
    }

    fn insert_violation_if_absent(&self, violation: &PolicyViolation) -> Result<bool, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("read-only".to_string()));
        }
        let mut all = self.violations.lock().expect("lock");
        if all.iter().any(|v| v.key() == violation.key()) {
            return Ok(false);
        }
        all.push(violation.clone());
        Ok(true)
    }

    fn delete_violation(&self, violation: &PolicyViolation) -> Result<bool, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("read-only".to_string()));
        }
        let mut all = self.violations.lock().expect("lock");
        let before = all.len();
        all.retain(|v| v.key() != violation.key());
        Ok(all.len() != before)
    }
}
