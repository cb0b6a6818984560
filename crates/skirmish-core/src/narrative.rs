//! Human-readable narrative of an encounter.
//!
//! Narrative emission is off by default. When enabled, every event is kept in
//! order and also emitted through `tracing` at INFO under the
//! `skirmish::narrative` target, so a subscriber decides whether it reaches a
//! terminal. Events are built lazily: a disabled narrative never formats or
//! allocates.

use std::fmt;
use std::sync::Arc;

use crate::combatant::Team;

/// Tracing target used for narrative lines.
pub const NARRATIVE_TARGET: &str = "skirmish::narrative";

/// Something worth telling about a trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeEvent {
    /// A new round begins.
    RoundStarted {
        /// Round number, starting at 1
        round: u32,
    },
    /// A weapon or spell attack roll.
    Attack {
        /// Attacker label
        attacker: Arc<str>,
        /// Target label
        target: Arc<str>,
        /// Natural d20 result
        natural: i32,
        /// Roll plus bonus
        total: i32,
        /// Whether the attack hit
        hit: bool,
        /// Whether the hit was critical
        critical: bool,
        /// Hit points removed
        damage: u32,
    },
    /// A spell is cast.
    SpellCast {
        /// Caster label
        caster: Arc<str>,
        /// Spell name
        spell: Arc<str>,
        /// Slot tier spent
        tier: u8,
    },
    /// A saving throw against a spell.
    SavingThrow {
        /// Label of the creature saving
        target: Arc<str>,
        /// Roll plus save bonus
        total: i32,
        /// Whether the save succeeded
        success: bool,
        /// Hit points removed
        damage: u32,
    },
    /// Hit points restored by a spell.
    Healed {
        /// Healer label
        healer: Arc<str>,
        /// Label of the creature healed
        target: Arc<str>,
        /// Hit points restored
        amount: u32,
    },
    /// Start-of-turn regeneration.
    Regenerated {
        /// Label of the regenerating creature
        combatant: Arc<str>,
        /// Hit points restored
        amount: u32,
    },
    /// A combatant enters a rage.
    Raged {
        /// Label of the raging creature
        combatant: Arc<str>,
    },
    /// A combatant uses action surge.
    ActionSurge {
        /// Label of the surging creature
        combatant: Arc<str>,
    },
    /// A combatant drops to zero hit points.
    Incapacitated {
        /// Label of the fallen creature
        combatant: Arc<str>,
    },
    /// A combatant has nothing to do this turn.
    Passed {
        /// Label of the idle creature
        combatant: Arc<str>,
    },
    /// A team won.
    Victory {
        /// Winning team
        team: Team,
        /// Rounds played
        rounds: u32,
    },
    /// The round cap ended the trial with both sides standing.
    Draw {
        /// Rounds played
        rounds: u32,
    },
}

impl fmt::Display for NarrativeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundStarted { round } => write!(f, "-- Round {round} --"),
            Self::Attack {
                attacker,
                target,
                natural,
                total,
                hit,
                critical,
                damage,
            } => {
                if *critical {
                    write!(f, "{attacker} crits {target} (nat {natural}) for {damage}")
                } else if *hit {
                    write!(f, "{attacker} hits {target} ({total}) for {damage}")
                } else {
                    write!(f, "{attacker} misses {target} ({total})")
                }
            }
            Self::SpellCast {
                caster,
                spell,
                tier,
            } => write!(f, "{caster} casts {spell} (tier {tier})"),
            Self::SavingThrow {
                target,
                total,
                success,
                damage,
            } => {
                let verdict = if *success { "saves" } else { "fails" };
                write!(f, "{target} {verdict} ({total}) and takes {damage}")
            }
            Self::Healed {
                healer,
                target,
                amount,
            } => write!(f, "{healer} heals {target} for {amount}"),
            Self::Regenerated { combatant, amount } => {
                write!(f, "{combatant} regenerates {amount}")
            }
            Self::Raged { combatant } => write!(f, "{combatant} rages"),
            Self::ActionSurge { combatant } => write!(f, "{combatant} surges"),
            Self::Incapacitated { combatant } => write!(f, "{combatant} is incapacitated"),
            Self::Passed { combatant } => write!(f, "{combatant} has nothing to do"),
            Self::Victory { team, rounds } => write!(f, "{team} win after {rounds} rounds"),
            Self::Draw { rounds } => write!(f, "draw after {rounds} rounds"),
        }
    }
}

/// Ordered narrative of one trial.
#[derive(Debug, Clone, Default)]
pub struct Narrative {
    enabled: bool,
    events: Vec<NarrativeEvent>,
}

impl Narrative {
    /// A narrative that drops every event.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// A narrative that keeps and emits every event.
    #[must_use]
    pub fn recording() -> Self {
        Self {
            enabled: true,
            events: Vec::new(),
        }
    }

    /// Recording when `verbose`, disabled otherwise.
    #[must_use]
    pub fn with_verbosity(verbose: bool) -> Self {
        if verbose {
            Self::recording()
        } else {
            Self::disabled()
        }
    }

    /// Whether events are kept.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records the event built by `event`; the closure only runs when enabled.
    pub fn record(&mut self, event: impl FnOnce() -> NarrativeEvent) {
        if !self.enabled {
            return;
        }
        let event = event();
        tracing::info!(target: NARRATIVE_TARGET, "{event}");
        self.events.push(event);
    }

    /// Events recorded so far.
    #[must_use]
    pub fn events(&self) -> &[NarrativeEvent] {
        &self.events
    }

    /// Consumes the narrative, returning its events.
    #[must_use]
    pub fn into_events(self) -> Vec<NarrativeEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_narrative_never_builds_events() {
        let mut narrative = Narrative::disabled();
        narrative.record(|| panic!("event built while disabled"));
        assert!(narrative.events().is_empty());
    }

    #[test]
    fn recording_keeps_order() {
        let mut narrative = Narrative::with_verbosity(true);
        narrative.record(|| NarrativeEvent::RoundStarted { round: 1 });
        narrative.record(|| NarrativeEvent::Draw { rounds: 1 });
        assert_eq!(
            narrative.into_events(),
            vec![
                NarrativeEvent::RoundStarted { round: 1 },
                NarrativeEvent::Draw { rounds: 1 },
            ]
        );
    }

    #[test]
    fn display_lines() {
        let hit = NarrativeEvent::Attack {
            attacker: "Fighter#0".into(),
            target: "Goblin#1".into(),
            natural: 14,
            total: 21,
            hit: true,
            critical: false,
            damage: 9,
        };
        assert_eq!(hit.to_string(), "Fighter#0 hits Goblin#1 (21) for 9");
        assert_eq!(
            NarrativeEvent::Victory {
                team: Team::Party,
                rounds: 3
            }
            .to_string(),
            "Party win after 3 rounds"
        );
    }
}
