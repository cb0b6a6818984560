//! Determinism verification tests.
//!
//! A recap with a fixed seed must produce identical results:
//! - across repeated runs
//! - regardless of worker count
//! - with narrative emission on or off

use std::sync::Arc;

use crate::encounter::EncounterConfig;
use crate::recap::{run_recap, Recap};
use crate::resolver::RandomTarget;

use super::helpers::{roster_of, run_observed, seeded_config, standard_store, template};

const PARTY: [&str; 4] = ["Fighter Lv5", "Cleric Lv5", "Rogue Lv5", "Wizard Lv5"];
const ENEMIES: [Option<&str>; 4] = [Some("Ogre"), Some("Goblin"), None, Some("Wolf")];

#[test]
fn same_seed_same_recap() {
    let store = standard_store();
    let config = seeded_config(64, 1234);
    let a = run_recap(&store, &PARTY, &ENEMIES, &config).unwrap();
    let b = run_recap(&store, &PARTY, &ENEMIES, &config).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.seed, 1234);
}

#[test]
fn worker_count_does_not_change_results() {
    let store = standard_store();
    let config = seeded_config(48, 99);
    let global = run_recap(&store, &PARTY, &ENEMIES, &config).unwrap();
    for workers in [1, 3] {
        let pooled = run_recap(&store, &PARTY, &ENEMIES, &config.with_workers(workers)).unwrap();
        assert_eq!(global.outcomes, pooled.outcomes, "workers = {workers}");
    }
}

#[test]
fn narrative_is_a_side_channel() {
    let store = standard_store();
    let config = seeded_config(16, 5);
    let quiet = run_recap(&store, &PARTY, &ENEMIES, &config).unwrap();
    let verbose = run_recap(&store, &PARTY, &ENEMIES, &config.with_verbose(true)).unwrap();
    assert_eq!(quiet, verbose);
}

#[test]
fn different_seeds_diverge() {
    let store = standard_store();
    let a = run_recap(&store, &PARTY, &ENEMIES, &seeded_config(32, 1)).unwrap();
    let b = run_recap(&store, &PARTY, &ENEMIES, &seeded_config(32, 2)).unwrap();
    assert_ne!(a.outcomes, b.outcomes);
}

#[test]
fn custom_policy_is_deterministic_too() {
    let store = standard_store();
    let config = seeded_config(24, 77);
    let run = || {
        Recap::new(&store, config)
            .with_policy(Arc::new(RandomTarget))
            .run(&PARTY, &ENEMIES)
            .unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn single_encounter_replays() {
    let party = [template("Barbarian Lv5"), template("Bard Lv5")];
    let enemies = [template("Vampire Spawn"), template("Goblin")];
    let a = run_observed(roster_of(&party, &enemies), EncounterConfig::default(), 31);
    let b = run_observed(roster_of(&party, &enemies), EncounterConfig::default(), 31);
    assert_eq!(a, b);
}
