//! Spell choice and spell effects.
//!
//! Healing comes first: a caster with a castable heal tends to the most hurt
//! ally below half hit points. Damage spells are the strongest castable one.
//! Every cast spends the lowest slot at or above the spell's tier.

use std::cmp::Ordering;

use rand::Rng;

use bestiary::{SpellEffect, SpellTemplate, StatTemplate};

use super::attack::{roll_damage, AttackRoll, SavingThrow};
use super::{ActionResolver, Reach, Strike, TurnAction, TurnSummary};
use crate::combatant::{Combatant, CombatantId, TraitFlags};
use crate::narrative::{Narrative, NarrativeEvent};
use crate::roster::Roster;

/// Compares hit-point fractions without floating point.
fn by_health_fraction(a: &&Combatant, b: &&Combatant) -> Ordering {
    let (a, b) = (a.hit_points(), b.hit_points());
    let lhs = u64::from(a.current()) * u64::from(b.max());
    let rhs = u64::from(b.current()) * u64::from(a.max());
    lhs.cmp(&rhs)
}

/// A castable heal and the ally it should go to, if anyone needs one.
///
/// The ally is the standing teammate (the caster included) with the lowest
/// hit-point fraction below one half, first in join order on ties. The
/// cheapest castable heal is used.
#[must_use]
pub fn choose_heal<'t>(
    template: &'t StatTemplate,
    actor: &Combatant,
    roster: &Roster,
) -> Option<(&'t SpellTemplate, CombatantId)> {
    let spell = template
        .spells
        .iter()
        .filter(|spell| spell.is_heal() && actor.can_cast(spell))
        .min_by_key(|spell| spell.tier)?;
    let patient = roster
        .living(actor.team())
        .filter(|ally| ally.hit_points().is_bloodied())
        .min_by(by_health_fraction)?;
    Some((spell, patient.id()))
}

/// The highest-tier damage spell the actor can still cast.
#[must_use]
pub fn choose_damage_spell<'t>(
    template: &'t StatTemplate,
    actor: &Combatant,
) -> Option<&'t SpellTemplate> {
    template
        .spells
        .iter()
        .filter(|spell| !spell.is_heal() && actor.can_cast(spell))
        .max_by_key(|spell| spell.tier)
}

impl ActionResolver {
    /// Casts `spell` on `patient`.
    pub(super) fn cast_heal<R: Rng>(
        actor_id: CombatantId,
        spell: &SpellTemplate,
        patient: CombatantId,
        roster: &mut Roster,
        rng: &mut R,
        narrative: &mut Narrative,
    ) -> TurnSummary {
        let mut summary = TurnSummary::default();
        let SpellEffect::Heal { amount } = spell.effect else {
            return summary;
        };
        let Some(tier) = Self::spend_slot(actor_id, spell, roster, narrative) else {
            return summary;
        };

        let rolled = amount.roll(rng);
        let healer = roster.get(actor_id).map(Combatant::shared_label);
        if let Some(target) = roster.get_mut(patient) {
            let restored = target.heal(rolled);
            summary.healing_done += restored;
            if let Some(healer) = healer {
                narrative.record(|| NarrativeEvent::Healed {
                    healer,
                    target: target.shared_label(),
                    amount: restored,
                });
            }
        }

        summary.action = TurnAction::Heal { tier };
        summary
    }

    /// Casts a damage spell at the actor's opponents.
    pub(super) fn cast_damage<R: Rng>(
        &self,
        actor_id: CombatantId,
        spell: &SpellTemplate,
        template: &StatTemplate,
        roster: &mut Roster,
        rng: &mut R,
        narrative: &mut Narrative,
    ) -> TurnSummary {
        let mut summary = TurnSummary::default();
        let Some(tier) = Self::spend_slot(actor_id, spell, roster, narrative) else {
            return summary;
        };

        match spell.effect {
            SpellEffect::Attack { damage, rays } => {
                let advantage = roster.get(actor_id).is_some_and(|actor| {
                    actor.traits().contains(TraitFlags::PACK_TACTICS)
                        && super::has_standing_ally(actor_id, roster)
                });
                for _ in 0..rays {
                    let target = self.pick_target(actor_id, roster, rng, Reach::Spell, &[]);
                    let Some(target) = target.and_then(|id| roster.get(id)) else {
                        break;
                    };
                    let (target_id, armor_class) = (target.id(), target.template().armor_class);
                    let roll = AttackRoll::roll(
                        rng,
                        template.spell_attack_modifier,
                        armor_class,
                        advantage,
                    );
                    let damage = if roll.hit {
                        roll_damage(damage, roll.critical, rng)
                    } else {
                        0
                    };
                    let strike = Strike {
                        target: target_id,
                        roll,
                        damage,
                        damage_type: None,
                    };
                    strike.land(actor_id, roster, narrative, &mut summary);
                }
            }
            SpellEffect::Save {
                damage,
                ability,
                mitigation,
                targets,
            } => {
                let rolled = damage.roll(rng);
                let mut struck: Vec<CombatantId> = Vec::with_capacity(usize::from(targets));
                for _ in 0..targets {
                    let Some(target_id) =
                        self.pick_target(actor_id, roster, rng, Reach::Spell, &struck)
                    else {
                        break;
                    };
                    struck.push(target_id);

                    let Some(target) = roster.get_mut(target_id) else {
                        continue;
                    };
                    let bonus = target.template().save_bonus(ability);
                    let save = SavingThrow::roll(rng, bonus, template.spell_save_dc);
                    let taken = if save.success {
                        mitigation.apply(rolled)
                    } else {
                        rolled
                    };
                    let removed = target.take_damage(taken, None);
                    let downed = removed > 0 && target.is_incapacitated();
                    summary.damage_dealt += removed;
                    narrative.record(|| NarrativeEvent::SavingThrow {
                        target: target.shared_label(),
                        total: save.total,
                        success: save.success,
                        damage: removed,
                    });
                    if downed {
                        summary.incapacitated += 1;
                        narrative.record(|| NarrativeEvent::Incapacitated {
                            combatant: target.shared_label(),
                        });
                    }
                }
            }
            SpellEffect::Heal { .. } => {}
        }

        summary.action = TurnAction::Spell { tier };
        summary
    }

    /// Spends the actor's slot for `spell` and narrates the cast.
    fn spend_slot(
        actor_id: CombatantId,
        spell: &SpellTemplate,
        roster: &mut Roster,
        narrative: &mut Narrative,
    ) -> Option<u8> {
        let actor = roster.get_mut(actor_id)?;
        let tier = actor.spend_slot(spell)?;
        narrative.record(|| NarrativeEvent::SpellCast {
            caster: actor.shared_label(),
            spell: spell.name.as_str().into(),
            tier,
        });
        Some(tier)
    }
}
