//! Attack rolls, saving throws and weapon attacks.

use rand::Rng;

use bestiary::{DamageDice, Position};

use super::{ActionResolver, Reach, Strike, TurnAction, TurnSummary};
use crate::combatant::{CombatantId, TraitFlags};
use crate::narrative::{Narrative, NarrativeEvent};
use crate::roster::Roster;

/// Melee damage bonus while raging.
pub const RAGE_DAMAGE_BONUS: i32 = 2;

/// Rolls a d20, taking the higher of two with advantage.
pub fn roll_d20<R: Rng + ?Sized>(rng: &mut R, advantage: bool) -> i32 {
    let first = rng.gen_range(1..=20);
    if advantage {
        first.max(rng.gen_range(1..=20))
    } else {
        first
    }
}

/// Result of one attack roll against an armor class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRoll {
    /// The d20 as rolled
    pub natural: i32,
    /// Natural roll plus bonus
    pub total: i32,
    /// Whether the attack hit
    pub hit: bool,
    /// Natural 20
    pub critical: bool,
}

impl AttackRoll {
    /// Resolves a d20 roll: a natural 20 always hits and crits, a natural 1
    /// always misses, anything else hits when `natural + bonus >= armor_class`.
    #[must_use]
    pub const fn resolve(natural: i32, bonus: i32, armor_class: i32) -> Self {
        let total = natural + bonus;
        let critical = natural == 20;
        let hit = critical || (natural != 1 && total >= armor_class);
        Self {
            natural,
            total,
            hit,
            critical,
        }
    }

    /// Rolls an attack.
    pub fn roll<R: Rng + ?Sized>(
        rng: &mut R,
        bonus: i32,
        armor_class: i32,
        advantage: bool,
    ) -> Self {
        Self::resolve(roll_d20(rng, advantage), bonus, armor_class)
    }
}

/// Result of a saving throw against a DC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavingThrow {
    /// d20 plus save bonus
    pub total: i32,
    /// Whether the total met the DC
    pub success: bool,
}

impl SavingThrow {
    /// Rolls `d20 + bonus` against `dc`.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, bonus: i32, dc: i32) -> Self {
        let total = roll_d20(rng, false) + bonus;
        Self {
            total,
            success: total >= dc,
        }
    }
}

/// Rolls damage, doubling the dice on a critical.
pub fn roll_damage<R: Rng + ?Sized>(dice: DamageDice, critical: bool, rng: &mut R) -> u32 {
    if critical {
        dice.roll_critical(rng)
    } else {
        dice.roll(rng)
    }
}

/// Sneak attack dice: `ceil(level / 2)` d6.
#[must_use]
pub fn sneak_attack_dice(level: u8) -> DamageDice {
    DamageDice::new(u32::from(level).div_ceil(2), 6, 0)
}

impl ActionResolver {
    /// Makes the actor's weapon attacks for this turn.
    pub(super) fn weapon_attacks<R: Rng>(
        &self,
        actor_id: CombatantId,
        roster: &mut Roster,
        rng: &mut R,
        narrative: &mut Narrative,
    ) -> TurnSummary {
        let mut summary = TurnSummary::default();
        let Some(actor) = roster.get_mut(actor_id) else {
            return summary;
        };
        let template = std::sync::Arc::clone(actor.template());
        let traits = actor.traits();

        let mut attacks = template.attacks;
        if actor.use_action_surge() {
            attacks = attacks.saturating_mul(2);
            narrative.record(|| NarrativeEvent::ActionSurge {
                combatant: actor.shared_label(),
            });
        }

        let melee = template.position == Position::Melee;
        let dice = if actor.is_raging() && melee {
            template.damage.with_bonus(RAGE_DAMAGE_BONUS)
        } else {
            template.damage
        };

        let ally_standing = super::has_standing_ally(actor_id, roster);
        let advantage = traits.contains(TraitFlags::PACK_TACTICS) && ally_standing;
        let mut sneak_attack =
            traits.contains(TraitFlags::SNEAK_ATTACK) && (advantage || ally_standing);

        for _ in 0..attacks {
            let target = self.pick_target(actor_id, roster, rng, Reach::Weapon, &[]);
            let Some(target) = target.and_then(|id| roster.get(id)) else {
                break;
            };
            let (target_id, armor_class) = (target.id(), target.template().armor_class);

            let roll = AttackRoll::roll(rng, template.to_hit, armor_class, advantage);
            let mut damage = 0;
            if roll.hit {
                damage = roll_damage(dice, roll.critical, rng);
                if sneak_attack {
                    damage += roll_damage(sneak_attack_dice(template.level), roll.critical, rng);
                    sneak_attack = false;
                }
            }
            let strike = Strike {
                target: target_id,
                roll,
                damage,
                damage_type: template.primary_damage_type(),
            };
            strike.land(actor_id, roster, narrative, &mut summary);
        }

        summary.action = TurnAction::Weapon { attacks };
        summary
    }
}
