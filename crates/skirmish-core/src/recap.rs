//! Statistical recap: many independent trials of one encounter.
//!
//! A recap resolves every party and enemy name against a [`TemplateStore`],
//! then runs `trial_count` encounters in parallel. Each trial gets a fresh
//! roster and a private random stream seeded from `(master seed, trial index)`,
//! so results are reproducible regardless of how rayon schedules the work.
//!
//! # Example
//!
//! ```
//! use bestiary::Bestiary;
//! use skirmish_core::recap::{run_recap, RecapConfig};
//!
//! let store = Bestiary::with_standard_catalog();
//! let config = RecapConfig::default().with_trial_count(20).with_seed(7);
//! let result = run_recap(&store, &["Fighter Lv5", "Cleric Lv5"], &[Some("Goblin"), None], &config)
//!     .unwrap();
//!
//! assert_eq!(result.outcomes.len(), 20);
//! assert!((0.0..=1.0).contains(&result.summary.win_probability));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use bestiary::{StatTemplate, TemplateKey, TemplateStore};

use crate::combatant::Team;
use crate::encounter::{Encounter, EncounterConfig, TrialOutcome, DEFAULT_ROUND_CAP};
use crate::error::{InvalidEncounterError, RecapError, Result};
use crate::narrative::Narrative;
use crate::pool::WorkerPool;
use crate::resolver::{LowestHitPoints, TargetPolicy, DEFAULT_CAST_CHANCE};
use crate::roster::Roster;
use crate::stats::ScalarStats;

/// Default number of trials per recap.
pub const DEFAULT_TRIAL_COUNT: usize = 100;

// =============================================================================
// Configuration
// =============================================================================

/// Recap parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecapConfig {
    /// Number of independent trials
    pub trial_count: usize,
    /// Rounds before a trial is a draw
    pub round_cap: u32,
    /// Master seed; a random one is drawn when `None`
    pub seed: Option<u64>,
    /// Emit the narrative of every trial
    pub verbose: bool,
    /// Probability a caster picks a damage spell over its weapon
    pub cast_chance: f64,
    /// Worker threads; 0 uses the global rayon pool
    pub workers: usize,
}

impl Default for RecapConfig {
    fn default() -> Self {
        Self {
            trial_count: DEFAULT_TRIAL_COUNT,
            round_cap: DEFAULT_ROUND_CAP,
            seed: None,
            verbose: false,
            cast_chance: DEFAULT_CAST_CHANCE,
            workers: 0,
        }
    }
}

impl RecapConfig {
    /// Sets the trial count.
    #[must_use]
    pub const fn with_trial_count(mut self, trial_count: usize) -> Self {
        self.trial_count = trial_count;
        self
    }

    /// Sets the round cap.
    #[must_use]
    pub const fn with_round_cap(mut self, round_cap: u32) -> Self {
        self.round_cap = round_cap;
        self
    }

    /// Fixes the master seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Turns narrative emission on or off.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the cast chance.
    #[must_use]
    pub const fn with_cast_chance(mut self, cast_chance: f64) -> Self {
        self.cast_chance = cast_chance;
        self
    }

    /// Sets the worker count.
    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Checks the parameters that would make a recap meaningless.
    ///
    /// # Errors
    ///
    /// [`InvalidEncounterError::NoTrials`] or [`InvalidEncounterError::NoRounds`].
    pub const fn validate(&self) -> std::result::Result<(), InvalidEncounterError> {
        if self.trial_count == 0 {
            return Err(InvalidEncounterError::NoTrials);
        }
        if self.round_cap == 0 {
            return Err(InvalidEncounterError::NoRounds);
        }
        Ok(())
    }

    fn encounter_config(&self) -> EncounterConfig {
        EncounterConfig::default()
            .with_round_cap(self.round_cap)
            .with_cast_chance(self.cast_chance)
    }
}

/// Cooperative cancellation for a running recap.
///
/// Clones share one flag. Trials that have not started when the flag is set
/// are skipped and the recap returns [`RecapError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Results
// =============================================================================

/// Aggregates over every trial of a recap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecapSummary {
    /// Trials run
    pub trials: usize,
    /// Trials won by the party
    pub party_wins: usize,
    /// Trials won by the enemies
    pub enemy_wins: usize,
    /// Trials that hit the round cap
    pub draws: usize,
    /// Party wins over trials; draws are not wins
    pub win_probability: f64,
    /// Mean rounds played
    pub mean_rounds: f64,
    /// Mean damage dealt by the party
    pub mean_damage: f64,
    /// Mean party members incapacitated
    pub mean_deaths: f64,
    /// Mean fraction of party hit points remaining
    pub mean_health_fraction: f64,
    /// Distribution of rounds played
    pub rounds: ScalarStats,
    /// Distribution of party damage dealt
    pub damage: ScalarStats,
    /// Distribution of party deaths
    pub deaths: ScalarStats,
    /// Distribution of party health fraction
    pub health_fraction: ScalarStats,
}

impl RecapSummary {
    /// Summarizes `outcomes`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_outcomes(outcomes: &[TrialOutcome]) -> Self {
        let count = |team: Option<Team>| outcomes.iter().filter(|o| o.winner == team).count();
        let party_wins = count(Some(Team::Party));
        let enemy_wins = count(Some(Team::Enemies));
        let draws = count(None);

        let rounds = ScalarStats::from_values(outcomes.iter().map(|o| f64::from(o.rounds)));
        let damage =
            ScalarStats::from_values(outcomes.iter().map(|o| o.party_damage_dealt as f64));
        let deaths = ScalarStats::from_values(outcomes.iter().map(|o| f64::from(o.party_deaths)));
        let health_fraction =
            ScalarStats::from_values(outcomes.iter().map(|o| o.party_health_fraction));

        let win_probability = if outcomes.is_empty() {
            0.0
        } else {
            party_wins as f64 / outcomes.len() as f64
        };

        Self {
            trials: outcomes.len(),
            party_wins,
            enemy_wins,
            draws,
            win_probability,
            mean_rounds: rounds.mean,
            mean_damage: damage.mean,
            mean_deaths: deaths.mean,
            mean_health_fraction: health_fraction.mean,
            rounds,
            damage,
            deaths,
            health_fraction,
        }
    }
}

/// Every trial outcome of a recap plus the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecapResult {
    /// Outcomes in trial order
    pub outcomes: Vec<TrialOutcome>,
    /// Aggregates over `outcomes`
    pub summary: RecapSummary,
    /// Master seed the trials were derived from
    pub seed: u64,
}

impl RecapResult {
    /// Party win probability.
    #[must_use]
    pub const fn win_probability(&self) -> f64 {
        self.summary.win_probability
    }
}

// =============================================================================
// Recap
// =============================================================================

/// Derives the seed of trial `index` from the master seed.
///
/// Each trial reads the first word of its own ChaCha8 stream under the
/// master seed, so seeds are stable across platforms and toolchains.
#[must_use]
pub fn trial_seed(master: u64, index: usize) -> u64 {
    let mut rng = ChaCha8Rng::seed_from_u64(master);
    rng.set_stream(index as u64);
    rng.next_u64()
}

/// A configured recap, for callers that need a custom target policy or
/// cancellation. [`run_recap`] covers the common case.
pub struct Recap<'a, S: TemplateStore + ?Sized> {
    store: &'a S,
    config: RecapConfig,
    policy: Arc<dyn TargetPolicy>,
    cancel: Option<CancelToken>,
}

impl<S: TemplateStore + ?Sized> std::fmt::Debug for Recap<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recap")
            .field("config", &self.config)
            .field("policy", &"<dyn TargetPolicy>")
            .field("cancel", &self.cancel)
            .finish_non_exhaustive()
    }
}

impl<'a, S: TemplateStore + ?Sized> Recap<'a, S> {
    /// A recap over `store` with the default [`LowestHitPoints`] policy.
    #[must_use]
    pub fn new(store: &'a S, config: RecapConfig) -> Self {
        Self {
            store,
            config,
            policy: Arc::new(LowestHitPoints),
            cancel: None,
        }
    }

    /// Uses `policy` for every target choice.
    #[must_use]
    pub fn with_policy(mut self, policy: Arc<dyn TargetPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Lets `token` abandon the recap.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Runs every trial.
    ///
    /// `enemies` entries that are `None` are empty slots and ignored.
    ///
    /// # Errors
    ///
    /// - [`RecapError::InvalidEncounter`] for an empty party, zero trials or
    ///   a zero round cap
    /// - [`RecapError::TemplateNotFound`] for any unknown name
    /// - [`RecapError::Cancelled`] when the cancel token fires mid-run
    /// - [`RecapError::WorkerPool`] when a dedicated pool cannot be built
    ///
    /// All but the last two are reported before any trial runs.
    pub fn run<P, E>(&self, party: &[P], enemies: &[Option<E>]) -> Result<RecapResult>
    where
        P: AsRef<str>,
        E: AsRef<str>,
    {
        if party.is_empty() {
            return Err(InvalidEncounterError::EmptyParty.into());
        }
        self.config.validate()?;

        let party = self.resolve(party.iter().map(|name| name.as_ref()))?;
        let enemies = self.resolve(enemies.iter().flatten().map(|name| name.as_ref()))?;

        let seed = self.config.seed.unwrap_or_else(rand::random);
        let trials = self.config.trial_count;
        let encounter_config = self.config.encounter_config();
        let verbose = self.config.verbose;
        let cancel = self.cancel.as_ref();

        let _span = tracing::info_span!("recap", trials, seed).entered();
        tracing::info!(
            party = party.len(),
            enemies = enemies.len(),
            "starting recap"
        );

        let run_trial = |index: usize| -> Option<TrialOutcome> {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                return None;
            }
            let mut roster = Roster::new();
            for template in &party {
                roster.spawn(Arc::clone(template), Team::Party);
            }
            for template in &enemies {
                roster.spawn(Arc::clone(template), Team::Enemies);
            }
            let encounter = Encounter::new(
                roster,
                encounter_config,
                Arc::clone(&self.policy),
                trial_seed(seed, index),
                Narrative::with_verbosity(verbose),
            );
            Some(encounter.run().0)
        };

        let outcomes: Option<Vec<TrialOutcome>> = WorkerPool::with_workers(self.config.workers)
            .install(|| (0..trials).into_par_iter().map(run_trial).collect())
            .map_err(RecapError::WorkerPool)?;
        let Some(outcomes) = outcomes else {
            tracing::info!("recap cancelled");
            return Err(RecapError::Cancelled);
        };

        let summary = RecapSummary::from_outcomes(&outcomes);
        tracing::info!(
            win_probability = summary.win_probability,
            draws = summary.draws,
            "recap finished"
        );
        Ok(RecapResult {
            outcomes,
            summary,
            seed,
        })
    }

    fn resolve<'n>(
        &self,
        names: impl Iterator<Item = &'n str>,
    ) -> Result<Vec<Arc<StatTemplate>>> {
        names
            .map(|name| {
                self.store
                    .lookup(&TemplateKey::parse(name))
                    .map_err(RecapError::from)
            })
            .collect()
    }
}

/// Runs a recap with the default target policy.
///
/// # Errors
///
/// See [`Recap::run`].
pub fn run_recap<S, P, E>(
    store: &S,
    party: &[P],
    enemies: &[Option<E>],
    config: &RecapConfig,
) -> Result<RecapResult>
where
    S: TemplateStore + ?Sized,
    P: AsRef<str>,
    E: AsRef<str>,
{
    Recap::new(store, *config).run(party, enemies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestiary::Bestiary;

    const NO_ENEMIES: &[Option<&str>] = &[];

    fn store() -> Bestiary {
        Bestiary::with_standard_catalog()
    }

    mod config_tests {
        use super::*;

        #[test]
        fn defaults() {
            let config = RecapConfig::default();
            assert_eq!(config.trial_count, 100);
            assert_eq!(config.round_cap, 50);
            assert_eq!(config.seed, None);
            assert!(!config.verbose);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn rejects_degenerate_parameters() {
            let config = RecapConfig::default().with_trial_count(0);
            assert_eq!(config.validate(), Err(InvalidEncounterError::NoTrials));
            let config = RecapConfig::default().with_round_cap(0);
            assert_eq!(config.validate(), Err(InvalidEncounterError::NoRounds));
        }

        #[test]
        fn trial_seeds_differ() {
            assert_ne!(trial_seed(1, 0), trial_seed(1, 1));
            assert_ne!(trial_seed(1, 0), trial_seed(2, 0));
            assert_eq!(trial_seed(9, 3), trial_seed(9, 3));
        }

        #[test]
        fn trial_seeds_follow_the_master_stream() {
            let mut stream = ChaCha8Rng::seed_from_u64(9);
            stream.set_stream(3);
            assert_eq!(trial_seed(9, 3), stream.next_u64());

            let seeds: std::collections::HashSet<u64> =
                (0..1_000).map(|index| trial_seed(42, index)).collect();
            assert_eq!(seeds.len(), 1_000);
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn empty_party_is_invalid() {
            let party: &[&str] = &[];
            let err = run_recap(&store(), party, &[Some("Goblin")], &RecapConfig::default())
                .unwrap_err();
            assert!(matches!(
                err,
                RecapError::InvalidEncounter(InvalidEncounterError::EmptyParty)
            ));
        }

        #[test]
        fn unknown_enemy_aborts() {
            let err = run_recap(
                &store(),
                &["Fighter Lv5"],
                &[Some("Goblin"), Some("Beholder")],
                &RecapConfig::default(),
            )
            .unwrap_err();
            assert!(matches!(err, RecapError::TemplateNotFound(_)));
        }

        #[test]
        fn cancelled_before_start() {
            let token = CancelToken::new();
            token.cancel();
            let store = store();
            let err = Recap::new(&store, RecapConfig::default().with_seed(1))
                .with_cancel_token(token.clone())
                .run(&["Fighter Lv5"], &[Some("Goblin")])
                .unwrap_err();
            assert!(matches!(err, RecapError::Cancelled));
            assert!(token.is_cancelled());
        }
    }

    mod summary_tests {
        use super::*;

        fn outcome(winner: Option<Team>, rounds: u32, health: f64) -> TrialOutcome {
            TrialOutcome {
                winner,
                rounds,
                party_damage_dealt: u64::from(rounds) * 10,
                party_deaths: 0,
                party_health_fraction: health,
            }
        }

        #[test]
        fn draws_are_not_wins() {
            let outcomes = [
                outcome(Some(Team::Party), 2, 1.0),
                outcome(None, 50, 0.5),
                outcome(Some(Team::Enemies), 4, 0.0),
                outcome(Some(Team::Party), 6, 0.5),
            ];
            let summary = RecapSummary::from_outcomes(&outcomes);
            assert_eq!(summary.trials, 4);
            assert_eq!(summary.party_wins, 2);
            assert_eq!(summary.enemy_wins, 1);
            assert_eq!(summary.draws, 1);
            assert!((summary.win_probability - 0.5).abs() < f64::EPSILON);
            assert!((summary.mean_rounds - 15.5).abs() < 1e-9);
            assert!((summary.mean_damage - 155.0).abs() < 1e-9);
            assert!((summary.mean_health_fraction - 0.5).abs() < 1e-9);
            assert!((summary.rounds.max - 50.0).abs() < f64::EPSILON);
        }

        #[test]
        fn empty_enemies_is_a_clean_win() {
            let config = RecapConfig::default().with_trial_count(10).with_seed(3);
            let result = run_recap(&store(), &["Fighter Lv5"], NO_ENEMIES, &config).unwrap();
            assert_eq!(result.outcomes.len(), 10);
            assert!((result.win_probability() - 1.0).abs() < f64::EPSILON);
            assert!(result.summary.mean_deaths.abs() < f64::EPSILON);
            assert!(result.summary.mean_rounds <= 1.0);
            assert!((result.summary.mean_health_fraction - 1.0).abs() < f64::EPSILON);
        }

        #[test]
        fn result_serializes_for_collaborators() {
            let config = RecapConfig::default().with_trial_count(4).with_seed(11);
            let result = run_recap(&store(), &["Rogue Lv5"], &[Some("Wolf")], &config).unwrap();
            let json: serde_json::Value = serde_json::to_value(&result).unwrap();
            assert_eq!(json["outcomes"].as_array().map(Vec::len), Some(4));
            assert_eq!(json["seed"], 11);
            assert!(json["summary"]["win_probability"].is_f64());
        }

        #[test]
        fn none_slots_are_skipped() {
            let config = RecapConfig::default().with_trial_count(5).with_seed(3);
            let result =
                run_recap(&store(), &["Fighter Lv5"], &[None::<&str>, None], &config).unwrap();
            assert_eq!(result.summary.party_wins, 5);
        }
    }
}
