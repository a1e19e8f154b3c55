//! Property-Based Tests for cascade
//!
//! Generated plan trees and documents exercise the invariants of the
//! correlator, the completion rate and the compliance check.
//!
//! ## Configuration
//!
//! Property test case counts can be configured via environment variables:
//!
//! - `PROPTEST_CASES`: Number of test cases per property (default: 64)
//! - `PROPTEST_MAX_SHRINK_ITERS`: Max shrinking iterations on failure (default: 1000)
//!
//! ```bash
//! PROPTEST_CASES=256 cargo test --test property_based_tests
//! ```

mod test_support;

use cascade::{
    ComplianceCheck, ComplianceOptions, ConsumerPolicy, IdentityAlgorithm, Phase, StatusManager,
};
use cascade_plans::correlator::completion_rate;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::env;
use test_support::{PlanTree, VALID_EXECUTED, VALID_PLAN, VALID_VERIFICATION};

/// Default number of test cases per property.
const DEFAULT_PROPTEST_CASES: u32 = 64;

/// Default max shrink iterations.
const DEFAULT_MAX_SHRINK_ITERS: u32 = 1000;

/// Creates a ProptestConfig that respects `PROPTEST_CASES` and
/// `PROPTEST_MAX_SHRINK_ITERS`.
///
/// `max_cases` caps the case count for tests that touch the filesystem
/// heavily.
fn proptest_config(max_cases: Option<u32>) -> ProptestConfig {
    let env_cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_PROPTEST_CASES);

    let env_shrink_iters = env::var("PROPTEST_MAX_SHRINK_ITERS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_MAX_SHRINK_ITERS);

    let cases = match max_cases {
        Some(max) => env_cases.min(max),
        None => env_cases,
    };

    ProptestConfig {
        cases,
        max_shrink_iters: env_shrink_iters,
        max_shrink_time: 30000, // 30 seconds max shrink time
        ..ProptestConfig::default()
    }
}

/// Plan names mapped to whether their phase 2 and phase 3 documents exist.
fn plan_tree_shape() -> impl Strategy<Value = BTreeMap<String, (bool, bool)>> {
    prop::collection::btree_map(
        "[A-Z]{2,6}(_[A-Z0-9]{1,6})?",
        (any::<bool>(), any::<bool>()),
        0..6,
    )
}

fn build_tree(shape: &BTreeMap<String, (bool, bool)>) -> PlanTree {
    let tree = PlanTree::new();
    for phase in Phase::ALL {
        std::fs::create_dir_all(tree.layout.phase_dir(phase)).unwrap();
    }
    for (index, (name, (executed, verified))) in shape.iter().enumerate() {
        let timestamp = format!("202501{:02}_120000", index + 1);
        tree.write(Phase::Plan, &format!("{timestamp}_{name}.md"), VALID_PLAN);
        if *executed {
            tree.write(Phase::Executed, &format!("{timestamp}_{name}_EXECUTED.md"), VALID_EXECUTED);
        }
        if *verified {
            tree.write(
                Phase::Verification,
                &format!("{timestamp}_{name}_VERIFICATION.md"),
                VALID_VERIFICATION,
            );
        }
    }
    tree
}

proptest! {
    #![proptest_config(proptest_config(None))]

    /// Property: the rate is always a percentage and an empty set reports
    /// the caller's default.
    #[test]
    fn prop_completion_rate_is_bounded(
        total in 0usize..500,
        completed in 0usize..600,
        empty_rate in 0u8..=100
    ) {
        let rate = completion_rate(completed, total, empty_rate);
        prop_assert!(rate <= 100);
        if total == 0 {
            prop_assert_eq!(rate, empty_rate);
        } else if completed >= total {
            prop_assert_eq!(rate, 100);
        }
    }

    /// Property: both identity algorithms name every conventional document
    /// of a triplet after its plan.
    #[test]
    fn prop_identity_algorithms_agree_on_triplets(
        name in "[A-Z][A-Z0-9]{0,8}(_[A-Z0-9]{1,8}){0,3}",
        day in 1u32..=28,
        seconds in 0u32..86_400
    ) {
        prop_assume!(!name.ends_with("_EXECUTED") && !name.ends_with("_VERIFICATION"));
        let prefix = format!(
            "202503{day:02}_{:02}{:02}{:02}",
            seconds / 3600,
            (seconds / 60) % 60,
            seconds % 60
        );
        for suffix in ["", "_EXECUTED", "_VERIFICATION"] {
            let filename = format!("{prefix}_{name}{suffix}.md");
            let regex = IdentityAlgorithm::Regex.extract(&filename);
            let split = IdentityAlgorithm::Split.extract(&filename);
            prop_assert_eq!(regex.as_str(), name.as_str());
            prop_assert_eq!(&regex, &split);
        }
    }
}

proptest! {
    #![proptest_config(proptest_config(Some(24)))]

    /// Property: completed plans are exactly those with all three phases.
    #[test]
    fn prop_status_counts_complete_triplets(shape in plan_tree_shape()) {
        let tree = build_tree(&shape);
        let summary = StatusManager::new(
            tree.layout.clone(),
            IdentityAlgorithm::Regex,
            ConsumerPolicy::CHECK,
        )
        .summarize();

        let expected = shape.values().filter(|(executed, verified)| *executed && *verified).count();
        prop_assert_eq!(summary.total_plans, shape.len());
        prop_assert_eq!(summary.completed_plans, expected);
        prop_assert!(summary.completion_rate <= 100);
        prop_assert_eq!(summary.active_plan.is_none(), expected == shape.len());
    }

    /// Property: checking an unchanged tree twice gives the same report,
    /// and the overall verdict agrees with the per-phase verdicts.
    #[test]
    fn prop_compliance_check_is_idempotent(shape in plan_tree_shape()) {
        let tree = build_tree(&shape);
        let check = ComplianceCheck::new(tree.layout.clone(), ComplianceOptions::default());

        let first = check.execute();
        let second = check.execute();
        prop_assert_eq!(&first, &second);

        let all_valid = Phase::ALL.iter().all(|phase| first.phases.get(*phase).is_valid);
        prop_assert_eq!(first.is_valid, all_valid);
        prop_assert_eq!(first.is_valid, first.issue_count() == 0);
    }
}
