//! Encounter state machine: one trial from setup to outcome.
//!
//! An encounter moves through three phases:
//!
//! 1. **Setup**: entered once; checks whether either side is already beaten
//! 2. **`RoundInProgress`**: rolls initiative, dispatches every standing
//!    combatant through the [`ActionResolver`], and re-checks terminal
//!    conditions after every turn
//! 3. **Terminal**: the winner (or a draw at the round cap) is fixed and the
//!    roster is never touched again
//!
//! # Determinism
//!
//! Each encounter owns a private `ChaCha8Rng` seeded from a single `u64`.
//! Initiative, target tiebreaks, attack and damage rolls are all drawn from
//! it in a fixed order, so the same roster and seed replay identically.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use bestiary::{DamageDice, StatTemplate};
//! use skirmish_core::combatant::Team;
//! use skirmish_core::encounter::{Encounter, EncounterConfig};
//! use skirmish_core::narrative::Narrative;
//! use skirmish_core::resolver::LowestHitPoints;
//! use skirmish_core::roster::Roster;
//!
//! let knight = StatTemplate::builder("Knight", 5)
//!     .hit_points(50)
//!     .to_hit(8)
//!     .damage(DamageDice::new(2, 6, 4))
//!     .build();
//! let rat = StatTemplate::builder("Rat", 1).hit_points(1).build();
//!
//! let mut roster = Roster::new();
//! roster.spawn(Arc::new(knight), Team::Party);
//! roster.spawn(Arc::new(rat), Team::Enemies);
//!
//! let encounter = Encounter::new(
//!     roster,
//!     EncounterConfig::default(),
//!     Arc::new(LowestHitPoints),
//!     7,
//!     Narrative::disabled(),
//! );
//! let (outcome, _narrative) = encounter.run();
//! assert!(outcome.rounds <= EncounterConfig::default().round_cap);
//! ```

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::combatant::Team;
use crate::narrative::{Narrative, NarrativeEvent};
use crate::resolver::{ActionResolver, TargetPolicy, DEFAULT_CAST_CHANCE};
use crate::roster::Roster;
use crate::scheduler::TurnOrder;

/// Default maximum number of rounds before a trial is declared a draw.
pub const DEFAULT_ROUND_CAP: u32 = 50;

// =============================================================================
// Configuration
// =============================================================================

/// Per-encounter tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncounterConfig {
    /// Rounds played before the trial is declared a draw
    pub round_cap: u32,
    /// Probability a caster picks a damage spell over its weapon
    pub cast_chance: f64,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            round_cap: DEFAULT_ROUND_CAP,
            cast_chance: DEFAULT_CAST_CHANCE,
        }
    }
}

impl EncounterConfig {
    /// Sets the round cap.
    #[must_use]
    pub const fn with_round_cap(mut self, round_cap: u32) -> Self {
        self.round_cap = round_cap;
        self
    }

    /// Sets the cast chance.
    #[must_use]
    pub const fn with_cast_chance(mut self, cast_chance: f64) -> Self {
        self.cast_chance = cast_chance;
        self
    }
}

// =============================================================================
// State
// =============================================================================

/// Where an encounter is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Not started
    Setup,
    /// Rounds are being played
    RoundInProgress,
    /// Finished; the outcome is fixed
    Terminal,
}

/// Observable state of an encounter.
#[derive(Debug, Clone)]
pub struct EncounterState {
    /// Current round, starting at 1
    pub round: u32,
    /// Turn order of the current (or last played) round
    pub order: TurnOrder,
    /// Lifecycle phase
    pub phase: Phase,
    /// Winning team once terminal; `None` before that and on a draw
    pub winner: Option<Team>,
    /// Rounds actually played, fixed once terminal
    pub rounds_played: u32,
}

impl Default for EncounterState {
    fn default() -> Self {
        Self {
            round: 1,
            order: TurnOrder::default(),
            phase: Phase::Setup,
            winner: None,
            rounds_played: 0,
        }
    }
}

/// Result of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Winning team, `None` for a draw
    pub winner: Option<Team>,
    /// Rounds played, never above the round cap
    pub rounds: u32,
    /// Hit points removed by the party
    pub party_damage_dealt: u64,
    /// Party members incapacitated at the end
    pub party_deaths: u32,
    /// Remaining party hit points over starting party hit points
    pub party_health_fraction: f64,
}

impl TrialOutcome {
    /// Whether the party won.
    #[must_use]
    pub fn party_won(&self) -> bool {
        self.winner == Some(Team::Party)
    }

    /// Whether the round cap ended the trial.
    #[must_use]
    pub const fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}

// =============================================================================
// Encounter
// =============================================================================

/// One trial: a roster, a resolver and a private random stream.
#[derive(Debug)]
pub struct Encounter {
    roster: Roster,
    resolver: ActionResolver,
    round_cap: u32,
    rng: ChaCha8Rng,
    state: EncounterState,
    narrative: Narrative,
    party_starting_hit_points: u64,
    party_damage_dealt: u64,
}

impl Encounter {
    /// Creates an encounter in the `Setup` phase.
    #[must_use]
    pub fn new(
        roster: Roster,
        config: EncounterConfig,
        policy: Arc<dyn TargetPolicy>,
        seed: u64,
        narrative: Narrative,
    ) -> Self {
        let party_starting_hit_points = roster.team_hit_points(Team::Party);
        Self {
            roster,
            resolver: ActionResolver::new(policy, config.cast_chance),
            round_cap: config.round_cap.max(1),
            rng: ChaCha8Rng::seed_from_u64(seed),
            state: EncounterState::default(),
            narrative,
            party_starting_hit_points,
            party_damage_dealt: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &EncounterState {
        &self.state
    }

    /// The combatants.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The narrative recorded so far.
    #[must_use]
    pub const fn narrative(&self) -> &Narrative {
        &self.narrative
    }

    /// Advances one phase transition and returns the new phase.
    ///
    /// From `Setup` this checks for an already decided encounter. From
    /// `RoundInProgress` it plays one full round. `Terminal` is absorbing.
    pub fn step(&mut self) -> Phase {
        match self.state.phase {
            Phase::Setup => {
                if !self.check_terminal(0) {
                    self.state.phase = Phase::RoundInProgress;
                }
            }
            Phase::RoundInProgress => self.play_round(),
            Phase::Terminal => {}
        }
        self.state.phase
    }

    /// Runs to completion and returns the outcome with the narrative.
    #[must_use]
    pub fn run(mut self) -> (TrialOutcome, Narrative) {
        while self.step() != Phase::Terminal {}
        let outcome = self.outcome();
        (outcome, self.narrative)
    }

    /// The outcome so far; final once the phase is `Terminal`.
    #[must_use]
    pub fn outcome(&self) -> TrialOutcome {
        let party_health_fraction = if self.party_starting_hit_points == 0 {
            0.0
        } else {
            ratio(
                self.roster.team_hit_points(Team::Party),
                self.party_starting_hit_points,
            )
        };
        TrialOutcome {
            winner: self.state.winner,
            rounds: self.state.rounds_played,
            party_damage_dealt: self.party_damage_dealt,
            party_deaths: u32::try_from(self.roster.incapacitated_count(Team::Party))
                .unwrap_or(u32::MAX),
            party_health_fraction,
        }
    }

    /// Plays the current round.
    fn play_round(&mut self) {
        let round = self.state.round;
        self.narrative
            .record(|| NarrativeEvent::RoundStarted { round });

        self.state.order = TurnOrder::roll(&self.roster, &mut self.rng);
        let order: Vec<_> = self.state.order.ids().collect();

        for actor_id in order {
            let Some(actor) = self.roster.get(actor_id) else {
                continue;
            };
            if actor.is_incapacitated() {
                continue;
            }
            let team = actor.team();

            match self.resolver.take_turn(
                actor_id,
                &mut self.roster,
                &mut self.rng,
                &mut self.narrative,
            ) {
                Ok(summary) => {
                    if team == Team::Party {
                        self.party_damage_dealt += u64::from(summary.damage_dealt);
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, round, "turn skipped");
                }
            }

            if self.check_terminal(round) {
                return;
            }
        }

        if round >= self.round_cap {
            self.finish(None, round);
        } else {
            self.state.round += 1;
        }
    }

    /// Ends the encounter if a side has nobody standing.
    fn check_terminal(&mut self, rounds: u32) -> bool {
        let party = self.roster.has_living(Team::Party);
        let enemies = self.roster.has_living(Team::Enemies);
        let winner = match (party, enemies) {
            (true, true) => return false,
            (true, false) => Some(Team::Party),
            (false, true) => Some(Team::Enemies),
            (false, false) => None,
        };
        self.finish(winner, rounds);
        true
    }

    fn finish(&mut self, winner: Option<Team>, rounds: u32) {
        self.state.phase = Phase::Terminal;
        self.state.winner = winner;
        self.state.rounds_played = rounds;
        match winner {
            Some(team) => self
                .narrative
                .record(|| NarrativeEvent::Victory { team, rounds }),
            None => self.narrative.record(|| NarrativeEvent::Draw { rounds }),
        }
        tracing::debug!(?winner, rounds, "encounter finished");
    }
}

/// `part / whole` in `0.0..=1.0`.
#[allow(clippy::cast_precision_loss)]
fn ratio(part: u64, whole: u64) -> f64 {
    (part as f64 / whole as f64).clamp(0.0, 1.0)
}
