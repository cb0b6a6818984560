//! Target selection.
//!
//! Which opponents an actor can reach is a rule ([`reachable_targets`]);
//! which of those it picks is a strategy ([`TargetPolicy`]).

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use bestiary::Position;

use crate::combatant::{Combatant, CombatantId};
use crate::roster::Roster;

/// Chooses one target among candidates.
///
/// Policies are shared by every trial of a recap, so they must be
/// `Send + Sync` and hold no per-trial state. All randomness comes from the
/// trial's generator passed in as `rng`.
///
/// # Example
///
/// ```
/// use rand::RngCore;
/// use skirmish_core::combatant::{Combatant, CombatantId};
/// use skirmish_core::resolver::TargetPolicy;
///
/// /// Always picks the first candidate in join order.
/// struct FirstInLine;
///
/// impl TargetPolicy for FirstInLine {
///     fn select(
///         &self,
///         _actor: &Combatant,
///         candidates: &[&Combatant],
///         _rng: &mut dyn RngCore,
///     ) -> Option<CombatantId> {
///         candidates.first().map(|c| c.id())
///     }
/// }
/// ```
pub trait TargetPolicy: Send + Sync {
    /// Picks a target from `candidates`, or `None` when there are none.
    ///
    /// Candidates are standing opponents in join order.
    fn select(
        &self,
        actor: &Combatant,
        candidates: &[&Combatant],
        rng: &mut dyn RngCore,
    ) -> Option<CombatantId>;
}

/// Focus fire: the candidate with the fewest current hit points, ties broken
/// uniformly at random.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestHitPoints;

impl TargetPolicy for LowestHitPoints {
    fn select(
        &self,
        _actor: &Combatant,
        candidates: &[&Combatant],
        rng: &mut dyn RngCore,
    ) -> Option<CombatantId> {
        let lowest = candidates
            .iter()
            .map(|c| c.hit_points().current())
            .min()?;
        let tied: Vec<CombatantId> = candidates
            .iter()
            .filter(|c| c.hit_points().current() == lowest)
            .map(|c| c.id())
            .collect();
        tied.choose(rng).copied()
    }
}

/// Uniformly random target.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTarget;

impl TargetPolicy for RandomTarget {
    fn select(
        &self,
        _actor: &Combatant,
        candidates: &[&Combatant],
        rng: &mut dyn RngCore,
    ) -> Option<CombatantId> {
        if candidates.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..candidates.len());
        Some(candidates[index].id())
    }
}

/// Standing opponents `actor` can hit with its weapon.
///
/// Ranged-capable actors reach everyone. Melee-only actors go for opponents
/// holding the front line and fall back to anyone once the front line is
/// down.
#[must_use]
pub fn reachable_targets<'a>(actor: &Combatant, roster: &'a Roster) -> Vec<&'a Combatant> {
    let opponents: Vec<&Combatant> = roster.living(actor.team().opponent()).collect();
    if actor.template().ranged_attack {
        return opponents;
    }
    let front_line: Vec<&Combatant> = opponents
        .iter()
        .copied()
        .filter(|c| c.template().position == Position::Melee)
        .collect();
    if front_line.is_empty() {
        opponents
    } else {
        front_line
    }
}

/// Every standing opponent; spells are not limited by the front line.
#[must_use]
pub fn spell_targets<'a>(actor: &Combatant, roster: &'a Roster) -> Vec<&'a Combatant> {
    roster.living(actor.team().opponent()).collect()
}
