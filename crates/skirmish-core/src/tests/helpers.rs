//! Test helpers for building rosters and observing encounters.

use std::sync::Arc;

use bestiary::{Bestiary, StatTemplate, TemplateKey, TemplateStore};

use crate::combatant::Team;
use crate::encounter::{Encounter, EncounterConfig, Phase, TrialOutcome};
use crate::narrative::Narrative;
use crate::recap::RecapConfig;
use crate::resolver::LowestHitPoints;
use crate::roster::Roster;

// =============================================================================
// Setup
// =============================================================================

/// The standard catalog.
pub fn standard_store() -> Bestiary {
    Bestiary::with_standard_catalog()
}

/// Looks up `name` in the standard catalog.
///
/// # Panics
///
/// If the name is not in the catalog.
pub fn template(name: &str) -> Arc<StatTemplate> {
    standard_store()
        .lookup(&TemplateKey::parse(name))
        .unwrap_or_else(|err| panic!("{err}"))
}

/// A roster with `party` on team 0 and `enemies` on team 1, in order.
pub fn roster_of(party: &[Arc<StatTemplate>], enemies: &[Arc<StatTemplate>]) -> Roster {
    let mut roster = Roster::new();
    for t in party {
        roster.spawn(Arc::clone(t), Team::Party);
    }
    for t in enemies {
        roster.spawn(Arc::clone(t), Team::Enemies);
    }
    roster
}

/// A seeded recap config with `trials` trials.
pub fn seeded_config(trials: usize, seed: u64) -> RecapConfig {
    RecapConfig::default().with_trial_count(trials).with_seed(seed)
}

// =============================================================================
// Observation
// =============================================================================

/// Asserts hit points and slots are within bounds for every combatant.
///
/// # Panics
///
/// On the first violated bound.
pub fn assert_state_bounds(roster: &Roster) {
    for combatant in roster.combatants_sorted() {
        let hp = combatant.hit_points();
        assert!(
            hp.current() <= hp.max(),
            "{} has {} of {} hit points",
            combatant.label(),
            hp.current(),
            hp.max()
        );
        assert_eq!(
            hp.is_depleted(),
            combatant.is_incapacitated(),
            "{} standing state disagrees with its hit points",
            combatant.label()
        );
        let slots = combatant.slots();
        for tier in 1..=3 {
            assert!(slots.remaining(tier) <= slots.max(tier));
        }
    }
}

/// Steps an encounter to the end, checking invariants after every step.
///
/// Returns the outcome and the number of steps taken.
pub fn run_observed(roster: Roster, config: EncounterConfig, seed: u64) -> (TrialOutcome, u32) {
    let mut encounter = Encounter::new(
        roster,
        config,
        Arc::new(LowestHitPoints),
        seed,
        Narrative::disabled(),
    );
    let mut steps = 0;
    let mut previous_slots: Vec<u32> = slot_totals(encounter.roster());
    loop {
        let phase = encounter.step();
        steps += 1;
        assert_state_bounds(encounter.roster());

        let slots = slot_totals(encounter.roster());
        for (before, after) in previous_slots.iter().zip(&slots) {
            assert!(after <= before, "spell slots were restored");
        }
        previous_slots = slots;

        assert!(encounter.state().round <= config.round_cap);
        if phase == Phase::Terminal {
            return (encounter.outcome(), steps);
        }
    }
}

fn slot_totals(roster: &Roster) -> Vec<u32> {
    roster
        .combatants_sorted()
        .map(|c| c.slots().total_remaining())
        .collect()
}
