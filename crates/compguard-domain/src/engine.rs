use crate::aggregate::{should_raise, to_policy_violations};
use crate::config::EffectiveConfig;
use crate::dispatch::{Dispatcher, EvaluatorFailure};
use crate::error::EngineError;
use crate::evaluators::EvaluatorTable;
use crate::notify::{DiscardNotifications, NotificationRequest, NotificationSink, NotifyScope};
use crate::pool::WorkerPool;
use crate::reconcile::{Reconciliation, reconcile};
use crate::selector::{ProjectScope, select_applicable};
use crate::store::PolicyStore;
use compguard_types::{Component, Policy, PolicyId, PolicyViolation, Project};
use std::collections::BTreeSet;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// How one applicable policy fared against the component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyOutcome {
    pub policy: Policy,
    pub condition_violations: usize,
    pub raised: bool,
    pub timed_out: bool,
}

/// Everything one evaluation pass learned about a component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentEvaluation {
    /// The component as evaluated (re-fetched when the store had it).
    pub component: Component,
    /// Violations on record after reconciliation, ordered by key.
    pub violations: Vec<PolicyViolation>,
    pub added: Vec<PolicyViolation>,
    pub removed: Vec<PolicyViolation>,
    /// Applicable policies in store order.
    pub policies: Vec<PolicyOutcome>,
    pub failures: Vec<EvaluatorFailure>,
}

impl ComponentEvaluation {
    pub fn timed_out(&self) -> impl Iterator<Item = &PolicyId> {
        self.policies
            .iter()
            .filter(|o| o.timed_out)
            .map(|o| &o.policy.id)
    }
}

/// Orchestrates selection, dispatch, aggregation, reconciliation and notification for
/// one component at a time.
///
/// Cheap to share: evaluations of different components may run concurrently on
/// separate threads against the same engine.
pub struct PolicyEngine {
    store: Arc<dyn PolicyStore>,
    dispatcher: Dispatcher,
    notifier: Arc<dyn NotificationSink>,
    notify_scope: NotifyScope,
}

impl PolicyEngine {
    pub fn new(store: Arc<dyn PolicyStore>, pool: Arc<WorkerPool>, cfg: &EffectiveConfig) -> Self {
        Self {
            store,
            dispatcher: Dispatcher::new(pool, EvaluatorTable::standard(), cfg.dispatch_timeout),
            notifier: Arc::new(DiscardNotifications),
            notify_scope: cfg.notify_scope,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_evaluators(mut self, table: EvaluatorTable) -> Self {
        self.dispatcher = Dispatcher::new(self.dispatcher.pool(), table, self.dispatcher.timeout());
        self
    }

    /// Evaluate `component` against every defined policy and return the violations on
    /// record afterwards.
    pub fn evaluate(&self, component: &Component) -> Result<Vec<PolicyViolation>, EngineError> {
        Ok(self.evaluate_detailed(component)?.violations)
    }

    pub fn evaluate_detailed(
        &self,
        component: &Component,
    ) -> Result<ComponentEvaluation, EngineError> {
        info!(component = %component.display_name(), "evaluating against applicable policies");

        let policies = self
            .store
            .list_all_policies()
            .map_err(EngineError::ListPolicies)?;

        let component = Arc::new(self.refetch_component(component));
        let project = self.project_of(&component);
        let scope = ProjectScope::resolve(&project, self.store.as_ref()).unwrap_or_else(|err| {
            warn!(
                project = %project.id,
                error = %err,
                "project ancestry unavailable; using direct assignment only"
            );
            ProjectScope {
                project: project.id.clone(),
                tags: project.tags.clone(),
                ancestors: Vec::new(),
            }
        });

        let timestamp = OffsetDateTime::now_utc();
        let mut computed = Vec::new();
        let mut outcomes = Vec::new();
        let mut failures = Vec::new();

        for listed in select_applicable(&policies, &scope) {
            let policy = Arc::new(self.refetch_policy(listed));
            debug!(component = %component.id, policy = %policy.name, "evaluating policy");

            let outcome = self.dispatcher.dispatch(
                Arc::clone(&policy),
                Arc::clone(&component),
                Arc::clone(&self.store),
            );
            let raised = should_raise(&policy, &outcome.violations);
            if raised {
                computed.extend(to_policy_violations(&outcome.violations, timestamp));
            }
            outcomes.push(PolicyOutcome {
                policy: policy.as_ref().clone(),
                condition_violations: outcome.violations.len(),
                raised,
                timed_out: outcome.timed_out(),
            });
            failures.extend(outcome.failures);
        }

        let reconciled = reconcile(self.store.as_ref(), &component.id, computed)?;
        for request in notification_requests(&reconciled, self.notify_scope) {
            self.notifier.request_notification_evaluation(request);
        }

        info!(
            component = %component.display_name(),
            standing = reconciled.standing.len(),
            added = reconciled.added.len(),
            removed = reconciled.removed.len(),
            "policy analysis complete"
        );

        Ok(ComponentEvaluation {
            component: component.as_ref().clone(),
            violations: reconciled.standing,
            added: reconciled.added,
            removed: reconciled.removed,
            policies: outcomes,
            failures,
        })
    }

    fn refetch_component(&self, component: &Component) -> Component {
        match self.store.fetch_component_by_id(&component.id) {
            Ok(Some(fresh)) => fresh,
            Ok(None) => component.clone(),
            Err(err) => {
                warn!(component = %component.id, error = %err, "component re-fetch failed");
                component.clone()
            }
        }
    }

    fn refetch_policy(&self, policy: &Policy) -> Policy {
        match self.store.fetch_policy_by_name(&policy.name) {
            Ok(Some(fresh)) => fresh,
            Ok(None) => policy.clone(),
            Err(err) => {
                warn!(policy = %policy.name, error = %err, "policy re-fetch failed");
                policy.clone()
            }
        }
    }

    fn project_of(&self, component: &Component) -> Project {
        match self.store.fetch_project(&component.project) {
            Ok(Some(project)) => project,
            other => {
                if let Err(err) = other {
                    warn!(project = %component.project, error = %err, "project lookup failed");
                }
                Project {
                    id: component.project.clone(),
                    name: component.project.to_string(),
                    parent: None,
                    tags: BTreeSet::new(),
                }
            }
        }
    }
}

fn notification_requests(
    reconciled: &Reconciliation,
    scope: NotifyScope,
) -> Vec<NotificationRequest> {
    let added: BTreeSet<_> = reconciled.added.iter().map(|v| v.key()).collect();
    reconciled
        .standing
        .iter()
        .map(|v| NotificationRequest {
            is_new: added.contains(&v.key()),
            violation: v.clone(),
        })
        .filter(|r| scope == NotifyScope::All || r.is_new)
        .collect()
}
