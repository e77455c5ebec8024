//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - the ALL/ANY counting rule
//! - lenient version ordering
//! - policy selection determinism
//! - reconciliation idempotence

use crate::aggregate::{should_raise, to_policy_violations};
use crate::evaluators::{ConditionViolation, parse_version_lenient};
use crate::reconcile::reconcile;
use crate::selector::{ProjectScope, applies, select_applicable};
use crate::test_support::{TestStore, condition, policy};
use compguard_types::{
    ComponentId, ConditionOperator, Policy, PolicyOperator, ProjectId, Subject,
};
use proptest::prelude::*;
use semver::Version;
use time::macros::datetime;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

fn arb_subject() -> impl Strategy<Value = Subject> {
    prop::sample::select(Subject::ALL.to_vec())
}

/// A policy with 1..6 conditions on arbitrary subjects.
fn arb_policy(operator: PolicyOperator) -> impl Strategy<Value = Policy> {
    prop::collection::vec(arb_subject(), 1..6).prop_map(move |subjects| {
        let conditions = subjects
            .into_iter()
            .enumerate()
            .map(|(i, s)| condition(&format!("k{i}"), s, ConditionOperator::Is, "x"))
            .collect();
        policy("prop", operator, conditions)
    })
}

fn found_for(policy: &Policy, picks: &[usize]) -> Vec<ConditionViolation> {
    picks
        .iter()
        .map(|i| ConditionViolation {
            policy: policy.id.clone(),
            condition: policy.conditions[i % policy.conditions.len()].clone(),
            component: ComponentId::new("c"),
        })
        .collect()
}

/// Triples rendered with 1..=3 parts and an optional `v` prefix.
fn arb_loose_version() -> impl Strategy<Value = (String, Version)> {
    (0u64..50, 0u64..50, 0u64..50, 1usize..=3, any::<bool>()).prop_map(
        |(major, minor, patch, parts, prefix)| {
            let (text, version) = match parts {
                1 => (format!("{major}"), Version::new(major, 0, 0)),
                2 => (format!("{major}.{minor}"), Version::new(major, minor, 0)),
                _ => (
                    format!("{major}.{minor}.{patch}"),
                    Version::new(major, minor, patch),
                ),
            };
            let text = if prefix { format!("v{text}") } else { text };
            (text, version)
        },
    )
}

fn arb_scope() -> impl Strategy<Value = ProjectScope> {
    (
        "[a-d]",
        prop::collection::btree_set("[a-d]", 0..3),
        prop::collection::vec("[a-d]", 0..3),
    )
        .prop_map(|(project, tags, ancestors)| ProjectScope {
            project: ProjectId::new(project),
            tags,
            ancestors: ancestors.into_iter().map(ProjectId::new).collect(),
        })
}

fn arb_assigned_policy() -> impl Strategy<Value = Policy> {
    (
        any::<bool>(),
        any::<bool>(),
        prop::collection::btree_set("[a-d]", 0..3),
        prop::collection::btree_set("[a-d]", 0..3),
    )
        .prop_map(|(global, include_children, projects, tags)| {
            let mut p = policy("assigned", PolicyOperator::Any, Vec::new());
            p.global = global;
            p.include_children = include_children;
            p.projects = projects.into_iter().map(ProjectId::new).collect();
            p.tags = tags;
            p
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn any_raises_iff_something_matched(
        p in arb_policy(PolicyOperator::Any),
        picks in prop::collection::vec(0usize..10, 0..8),
    ) {
        let found = found_for(&p, &picks);
        prop_assert_eq!(should_raise(&p, &found), !found.is_empty());
    }

    #[test]
    fn all_raises_iff_counts_match(
        p in arb_policy(PolicyOperator::All),
        picks in prop::collection::vec(0usize..10, 0..8),
    ) {
        let found = found_for(&p, &picks);
        prop_assert_eq!(should_raise(&p, &found), found.len() == p.conditions.len());
    }

    #[test]
    fn lenient_versions_pad_missing_parts((text, expected) in arb_loose_version()) {
        prop_assert_eq!(parse_version_lenient(&text), Some(expected));
    }

    #[test]
    fn lenient_ordering_matches_semver(
        (a_text, a) in arb_loose_version(),
        (b_text, b) in arb_loose_version(),
    ) {
        let pa = parse_version_lenient(&a_text).expect("a parses");
        let pb = parse_version_lenient(&b_text).expect("b parses");
        prop_assert_eq!(pa.cmp(&pb), a.cmp(&b));
    }

    #[test]
    fn lenient_parse_never_panics(raw in ".{0,24}") {
        let _ = parse_version_lenient(&raw);
    }

    #[test]
    fn global_policies_always_apply(mut p in arb_assigned_policy(), scope in arb_scope()) {
        p.global = true;
        prop_assert!(applies(&p, &scope));
    }

    #[test]
    fn selection_is_deterministic_and_ordered(
        policies in prop::collection::vec(arb_assigned_policy(), 0..8),
        scope in arb_scope(),
    ) {
        let first: Vec<*const Policy> =
            select_applicable(&policies, &scope).into_iter().map(|p| p as *const _).collect();
        let second: Vec<*const Policy> =
            select_applicable(&policies, &scope).into_iter().map(|p| p as *const _).collect();
        prop_assert_eq!(&first, &second);

        let expected: Vec<*const Policy> = policies
            .iter()
            .filter(|p| applies(p, &scope))
            .map(|p| p as *const _)
            .collect();
        prop_assert_eq!(first, expected);
    }

    #[test]
    fn reconcile_twice_is_a_no_op(picks in prop::collection::vec(0usize..10, 0..12)) {
        let p = policy(
            "r",
            PolicyOperator::Any,
            (0..5)
                .map(|i| {
                    condition(&format!("k{i}"), Subject::Cpe, ConditionOperator::Matches, "x")
                })
                .collect(),
        );
        let ts = datetime!(2024-01-01 00:00:00 UTC);
        let computed = to_policy_violations(&found_for(&p, &picks), ts);
        let store = TestStore::default();
        let component = ComponentId::new("c");

        let first = reconcile(&store, &component, computed.clone()).expect("first");
        let after_first = store.recorded();
        let second = reconcile(&store, &component, computed).expect("second");

        prop_assert!(second.added.is_empty());
        prop_assert!(second.removed.is_empty());
        prop_assert_eq!(store.recorded(), after_first);
        prop_assert_eq!(first.standing.len(), store.recorded().len());
    }
}
