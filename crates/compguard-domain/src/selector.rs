use crate::error::StoreError;
use crate::store::PolicyStore;
use compguard_types::{Policy, Project, ProjectId};
use std::collections::BTreeSet;
use tracing::warn;

/// What policy assignment can see of a component's project.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProjectScope {
    pub project: ProjectId,
    pub tags: BTreeSet<String>,
    /// Strict ancestors, nearest first.
    pub ancestors: Vec<ProjectId>,
}

impl ProjectScope {
    /// Walk the parent chain through the store.
    ///
    /// A project missing from the store ends the walk. So does a cycle, which is logged.
    pub fn resolve(project: &Project, store: &dyn PolicyStore) -> Result<Self, StoreError> {
        let mut visited = BTreeSet::from([project.id.clone()]);
        let mut ancestors = Vec::new();
        let mut next = project.parent.clone();

        while let Some(parent) = next {
            if !visited.insert(parent.clone()) {
                warn!(
                    project = %project.id,
                    repeated = %parent,
                    "project ancestry contains a cycle; stopping walk"
                );
                break;
            }
            next = store.fetch_project(&parent)?.and_then(|p| p.parent);
            ancestors.push(parent);
        }

        Ok(Self {
            project: project.id.clone(),
            tags: project.tags.clone(),
            ancestors,
        })
    }
}

/// Whether `policy` applies to the project in `scope`.
pub fn applies(policy: &Policy, scope: &ProjectScope) -> bool {
    if policy.global {
        return true;
    }
    if policy.projects.contains(&scope.project) {
        return true;
    }
    if policy.include_children && scope.ancestors.iter().any(|a| policy.projects.contains(a)) {
        return true;
    }
    !policy.tags.is_disjoint(&scope.tags)
}

/// Policies that apply to the project, in their original order.
pub fn select_applicable<'a>(policies: &'a [Policy], scope: &ProjectScope) -> Vec<&'a Policy> {
    policies.iter().filter(|p| applies(p, scope)).collect()
}
