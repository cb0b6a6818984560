//! Action resolution: one combatant's turn.
//!
//! A turn runs in a fixed order:
//! 1. Start of turn: regeneration, entering a rage
//! 2. Healing: a caster with a castable heal tends to an ally below half hit points
//! 3. Otherwise a damage spell with probability `cast_chance`, or weapon attacks
//!
//! Targets come from a pluggable [`TargetPolicy`]. All randomness is drawn
//! from the trial's generator, so a turn is deterministic for a fixed seed.
//!
//! # Invariants
//!
//! - Hit points stay within `0..=max`; reaching zero incapacitates at once
//! - Incapacitated combatants are never targeted
//! - Slots only decrease, and a spell is only cast with a slot at or above its tier

mod attack;
mod spell;
mod targeting;

pub use attack::{roll_d20, sneak_attack_dice, AttackRoll, SavingThrow, RAGE_DAMAGE_BONUS};
pub use spell::{choose_damage_spell, choose_heal};
pub use targeting::{reachable_targets, spell_targets, LowestHitPoints, RandomTarget, TargetPolicy};

use std::sync::Arc;

use rand::Rng;

use bestiary::DamageType;

use crate::combatant::{Combatant, CombatantId, TurnStart};
use crate::error::ActionError;
use crate::narrative::{Narrative, NarrativeEvent};
use crate::roster::Roster;

/// Default probability that a caster picks a damage spell over its weapon.
pub const DEFAULT_CAST_CHANCE: f64 = 0.5;

/// What the actor ended up doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnAction {
    /// Nothing to do: no reachable opponent or already incapacitated
    #[default]
    Pass,
    /// Weapon attacks
    Weapon {
        /// Attacks made, including action surge
        attacks: u8,
    },
    /// A damage spell
    Spell {
        /// Slot tier spent
        tier: u8,
    },
    /// A healing spell
    Heal {
        /// Slot tier spent
        tier: u8,
    },
}

/// Bookkeeping of one turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnSummary {
    /// What the actor did
    pub action: TurnAction,
    /// Hit points removed from opponents
    pub damage_dealt: u32,
    /// Hit points restored to allies
    pub healing_done: u32,
    /// Opponents dropped to zero this turn
    pub incapacitated: u32,
}

/// Which opponents an action can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reach {
    /// Weapon reach: front line first for melee-only actors
    Weapon,
    /// Spells reach every standing opponent
    Spell,
}

/// One landed or missed attack, ready to apply.
struct Strike {
    target: CombatantId,
    roll: AttackRoll,
    damage: u32,
    damage_type: Option<DamageType>,
}

impl Strike {
    /// Applies the damage and narrates the attack and any knockout.
    fn land(
        self,
        actor_id: CombatantId,
        roster: &mut Roster,
        narrative: &mut Narrative,
        summary: &mut TurnSummary,
    ) {
        let attacker = roster.get(actor_id).map(Combatant::shared_label);
        let Some(target) = roster.get_mut(self.target) else {
            return;
        };
        let removed = if self.roll.hit {
            target.take_damage(self.damage, self.damage_type)
        } else {
            0
        };
        let downed = removed > 0 && target.is_incapacitated();
        summary.damage_dealt += removed;

        if let Some(attacker) = attacker {
            narrative.record(|| NarrativeEvent::Attack {
                attacker,
                target: target.shared_label(),
                natural: self.roll.natural,
                total: self.roll.total,
                hit: self.roll.hit,
                critical: self.roll.critical,
                damage: removed,
            });
        }
        if downed {
            summary.incapacitated += 1;
            tracing::debug!(combatant = %self.target, "combatant incapacitated");
            narrative.record(|| NarrativeEvent::Incapacitated {
                combatant: target.shared_label(),
            });
        }
    }
}

/// Whether someone else on the actor's team is still standing.
fn has_standing_ally(actor_id: CombatantId, roster: &Roster) -> bool {
    roster.get(actor_id).is_some_and(|actor| {
        roster
            .living(actor.team())
            .any(|ally| ally.id() != actor_id)
    })
}

/// Resolves combatant turns.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use bestiary::{DamageDice, StatTemplate};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use skirmish_core::combatant::Team;
/// use skirmish_core::narrative::Narrative;
/// use skirmish_core::resolver::{ActionResolver, LowestHitPoints, TurnAction};
/// use skirmish_core::roster::Roster;
///
/// let fighter = StatTemplate::builder("Fighter", 5)
///     .hit_points(44)
///     .to_hit(7)
///     .attacks(2)
///     .damage(DamageDice::new(1, 8, 4))
///     .build();
/// let dummy = StatTemplate::builder("Dummy", 1).hit_points(500).build();
///
/// let mut roster = Roster::new();
/// let actor = roster.spawn(Arc::new(fighter), Team::Party);
/// roster.spawn(Arc::new(dummy), Team::Enemies);
///
/// let resolver = ActionResolver::new(Arc::new(LowestHitPoints), 0.5);
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let summary = resolver
///     .take_turn(actor, &mut roster, &mut rng, &mut Narrative::disabled())
///     .unwrap();
/// assert_eq!(summary.action, TurnAction::Weapon { attacks: 2 });
/// ```
#[derive(Clone)]
pub struct ActionResolver {
    policy: Arc<dyn TargetPolicy>,
    cast_chance: f64,
}

impl std::fmt::Debug for ActionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionResolver")
            .field("policy", &"<dyn TargetPolicy>")
            .field("cast_chance", &self.cast_chance)
            .finish()
    }
}

impl Default for ActionResolver {
    fn default() -> Self {
        Self::new(Arc::new(LowestHitPoints), DEFAULT_CAST_CHANCE)
    }
}

impl ActionResolver {
    /// Creates a resolver. `cast_chance` is clamped to `0.0..=1.0`; NaN counts
    /// as zero.
    #[must_use]
    pub fn new(policy: Arc<dyn TargetPolicy>, cast_chance: f64) -> Self {
        let cast_chance = if cast_chance.is_nan() {
            0.0
        } else {
            cast_chance.clamp(0.0, 1.0)
        };
        Self {
            policy,
            cast_chance,
        }
    }

    /// Probability of choosing a damage spell over weapon attacks.
    #[must_use]
    pub const fn cast_chance(&self) -> f64 {
        self.cast_chance
    }

    /// Plays one turn for `actor_id`.
    ///
    /// Incapacitated or unknown actors pass.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::NoViableAction`] when the actor has opponents
    /// to fight but neither weapon attacks nor a castable spell. Start-of-turn
    /// effects have already been applied when this is returned.
    pub fn take_turn<R: Rng>(
        &self,
        actor_id: CombatantId,
        roster: &mut Roster,
        rng: &mut R,
        narrative: &mut Narrative,
    ) -> Result<TurnSummary, ActionError> {
        let Some(actor) = roster.get_mut(actor_id) else {
            return Ok(TurnSummary::default());
        };
        if actor.is_incapacitated() {
            return Ok(TurnSummary::default());
        }

        let TurnStart { regenerated, raged } = actor.start_turn();
        if regenerated > 0 {
            narrative.record(|| NarrativeEvent::Regenerated {
                combatant: actor.shared_label(),
                amount: regenerated,
            });
        }
        if raged {
            narrative.record(|| NarrativeEvent::Raged {
                combatant: actor.shared_label(),
            });
        }

        let template = Arc::clone(actor.template());
        let actor = roster.get(actor_id).ok_or(ActionError::NoViableAction {
            combatant: actor_id,
        })?;

        if let Some((spell, patient)) = choose_heal(&template, actor, roster) {
            return Ok(Self::cast_heal(actor_id, spell, patient, roster, rng, narrative));
        }

        if spell_targets(actor, roster).is_empty() {
            narrative.record(|| NarrativeEvent::Passed {
                combatant: actor.shared_label(),
            });
            return Ok(TurnSummary::default());
        }

        let damage_spell = choose_damage_spell(&template, actor);
        let cast = match damage_spell {
            Some(_) if template.attacks == 0 => true,
            Some(_) => rng.gen_bool(self.cast_chance),
            None if template.attacks == 0 => {
                return Err(ActionError::NoViableAction {
                    combatant: actor_id,
                });
            }
            None => false,
        };

        let summary = match damage_spell {
            Some(spell) if cast => {
                self.cast_damage(actor_id, spell, &template, roster, rng, narrative)
            }
            _ => self.weapon_attacks(actor_id, roster, rng, narrative),
        };
        Ok(summary)
    }

    /// Asks the policy for a target within `reach`, skipping `exclude`.
    fn pick_target<R: Rng>(
        &self,
        actor_id: CombatantId,
        roster: &Roster,
        rng: &mut R,
        reach: Reach,
        exclude: &[CombatantId],
    ) -> Option<CombatantId> {
        let actor = roster.get(actor_id)?;
        let mut candidates = match reach {
            Reach::Weapon => reachable_targets(actor, roster),
            Reach::Spell => spell_targets(actor, roster),
        };
        candidates.retain(|c| !exclude.contains(&c.id()));
        self.policy.select(actor, &candidates, rng)
    }
}
