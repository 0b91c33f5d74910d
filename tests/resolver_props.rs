//! Property tests for reaction resolution and mixture invariants.

use std::sync::Arc;

use proptest::prelude::*;
use valence_lab::catalog::Catalog;
use valence_lab::lab::*;
use valence_lab::models::*;

fn resolver() -> Resolver {
    Resolver::new(Arc::new(
        Catalog::builtin().unwrap_or_else(|e| panic!("bundled catalog invalid: {e}")),
    ))
}

/// Ids drawn mostly from the catalog, with a few strangers mixed in.
fn id_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(vec![
            "h2o", "vinegar", "hcl", "br", "na", "k", "li", "fe", "cu", "zn", "au", "ag",
            "baking_soda", "unobtanium", "vibranium", "cl", "h", "o",
        ])
        .prop_map(str::to_string),
        1 => "[a-z_]{1,8}",
    ]
}

fn ids_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(id_strategy(), 0..5)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn resolution_ignores_order(ids in ids_strategy(), seed in any::<u64>()) {
        let resolver = resolver();
        let mut shuffled = ids.clone();
        // Deterministic rotation + reversal stands in for a permutation.
        if !shuffled.is_empty() {
            let k = (seed as usize) % shuffled.len();
            shuffled.rotate_left(k);
            if seed % 2 == 0 {
                shuffled.reverse();
            }
        }
        prop_assert_eq!(resolver.resolve(ids), resolver.resolve(shuffled));
    }

    #[test]
    fn resolution_is_deterministic(ids in ids_strategy()) {
        let resolver = resolver();
        let first = resolver.resolve(ids.clone());
        for _ in 0..3 {
            prop_assert_eq!(&resolver.resolve(ids.clone()), &first);
        }
    }

    #[test]
    fn duplicates_do_not_change_the_outcome(ids in ids_strategy()) {
        let resolver = resolver();
        let doubled: Vec<String> = ids.iter().chain(ids.iter()).cloned().collect();
        prop_assert_eq!(resolver.resolve(ids), resolver.resolve(doubled));
    }

    #[test]
    fn matches_require_exact_set_equality(ids in ids_strategy()) {
        let resolver = resolver();
        let set: ReagentSet = ids.iter().map(String::as_str).collect();
        let outcome = resolver.resolve_set(&set);
        if outcome.product().is_some() {
            let rule = resolver.find_rule(&set).expect("matched without a rule");
            let rule_set: ReagentSet = rule.reagents.iter().map(String::as_str).collect();
            prop_assert_eq!(rule_set, set);
        }
    }

    #[test]
    fn single_reagent_never_matches(id in id_strategy()) {
        let outcome = resolver().resolve([id]);
        prop_assert_eq!(outcome, Outcome::NoReaction);
    }

    #[test]
    fn quantity_is_always_clamped(q in prop::num::f64::ANY) {
        let clamped = clamp_quantity(q);
        prop_assert!(clamped >= MIN_QUANTITY);
        prop_assert!(clamped <= MAX_QUANTITY);
    }

    #[test]
    fn set_quantity_never_stores_non_positive(q in -1.0e6f64..=0.0) {
        let resolver = resolver();
        let mut mixture = Mixture::new();
        let water = resolver.catalog().get("h2o").cloned().expect("water in catalog");
        mixture.add(&water).expect("add failed");

        mixture.set_quantity("h2o", q).expect("set_quantity failed");
        prop_assert_eq!(mixture.quantity("h2o"), Some(MIN_QUANTITY));
    }

    #[test]
    fn reset_always_yields_empty(ids in ids_strategy()) {
        let resolver = resolver();
        let mut mixture = Mixture::new();
        for id in &ids {
            if let Some(reagent) = resolver.catalog().get(id) {
                mixture.add(reagent).expect("add failed");
            }
        }
        let _ = mixture.mix(&resolver);

        mixture.reset();
        prop_assert_eq!(mixture.phase(), MixturePhase::Empty);
        prop_assert!(mixture.staged().is_empty());
        prop_assert!(mixture.resolved_reaction().is_none());
    }
}
