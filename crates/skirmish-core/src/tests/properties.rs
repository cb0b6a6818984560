//! Property tests: invariants under random compositions and seeds.

use std::sync::Arc;

use proptest::prelude::*;

use bestiary::StatTemplate;

use crate::encounter::EncounterConfig;
use crate::recap::run_recap;

use super::helpers::{roster_of, run_observed, seeded_config, standard_store};

fn catalog() -> Vec<Arc<StatTemplate>> {
    standard_store().iter().cloned().collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn encounter_state_stays_in_bounds(
        party in prop::collection::vec(any::<prop::sample::Index>(), 1..4),
        enemies in prop::collection::vec(any::<prop::sample::Index>(), 0..5),
        seed in any::<u64>(),
        round_cap in 1u32..30,
    ) {
        let catalog = catalog();
        let pick = |picks: &[prop::sample::Index]| -> Vec<Arc<StatTemplate>> {
            picks.iter().map(|i| Arc::clone(i.get(&catalog))).collect()
        };
        let config = EncounterConfig::default().with_round_cap(round_cap);
        let (outcome, _) = run_observed(roster_of(&pick(&party), &pick(&enemies)), config, seed);

        prop_assert!(outcome.rounds <= round_cap);
        prop_assert!((0.0..=1.0).contains(&outcome.party_health_fraction));
        prop_assert!(outcome.party_deaths as usize <= party.len());
        if enemies.is_empty() {
            prop_assert!(outcome.party_won());
            prop_assert_eq!(outcome.rounds, 0);
        }
    }

    #[test]
    fn recap_probabilities_are_probabilities(
        seed in any::<u64>(),
        trials in 1usize..12,
        cast_chance in 0.0f64..=1.0,
    ) {
        let config = seeded_config(trials, seed).with_cast_chance(cast_chance);
        let result = run_recap(
            &standard_store(),
            &["Sorcerer Lv5", "Paladin Lv5"],
            &[Some("Night Hag"), None, Some("Giant Spider")],
            &config,
        )
        .unwrap();

        prop_assert_eq!(result.outcomes.len(), trials);
        prop_assert!((0.0..=1.0).contains(&result.summary.win_probability));
        prop_assert!((0.0..=1.0).contains(&result.summary.mean_health_fraction));
    }
}
