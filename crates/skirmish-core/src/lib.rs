//! # Skirmish Core
//!
//! Turn-based encounter resolution and Monte Carlo recap.
//!
//! A recap answers "how likely is this party to beat these enemies?" by
//! playing the same encounter many times with independent random streams and
//! summarizing the outcomes.
//!
//! ## Architecture
//!
//! - **Combatants**: per-trial mutable state built from shared [`bestiary::StatTemplate`]s
//! - **Scheduler**: initiative order per round
//! - **Resolver**: one combatant's turn (targeting, spells, attacks, damage)
//! - **Encounter**: the `Setup → RoundInProgress → Terminal` state machine
//! - **Recap**: parallel trials and aggregate statistics
//!
//! ## Usage
//!
//! ```
//! use bestiary::Bestiary;
//! use skirmish_core::{run_recap, RecapConfig};
//!
//! let store = Bestiary::with_standard_catalog();
//! let config = RecapConfig::default().with_trial_count(10).with_seed(42);
//! let result = run_recap(&store, &["Fighter Lv5"], &[Some("Goblin")], &config).unwrap();
//! assert_eq!(result.outcomes.len(), 10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod combatant;
pub mod encounter;
pub mod error;
pub mod narrative;
pub mod pool;
pub mod recap;
pub mod resolver;
pub mod roster;
pub mod scheduler;
pub mod stats;

pub use combatant::{Combatant, CombatantId, Team};
pub use encounter::{Encounter, EncounterConfig, EncounterState, Phase, TrialOutcome};
pub use error::{ActionError, InvalidEncounterError, RecapError, Result};
pub use narrative::{Narrative, NarrativeEvent, NARRATIVE_TARGET};
pub use pool::WorkerPool;
pub use recap::{run_recap, CancelToken, Recap, RecapConfig, RecapResult, RecapSummary};
pub use resolver::{ActionResolver, LowestHitPoints, RandomTarget, TargetPolicy};
pub use roster::Roster;
pub use scheduler::TurnOrder;
pub use stats::ScalarStats;

#[cfg(test)]
mod tests;
