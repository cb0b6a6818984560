//! Mutable per-trial state carried by a combatant.
//!
//! Everything here is owned by exactly one trial. The immutable stat block
//! lives in the shared [`bestiary::StatTemplate`].

use bestiary::{SpellSlots, StatTemplate};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// =============================================================================
// Hit points
// =============================================================================

/// Current and maximum hit points. `current` never exceeds `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    current: u32,
    max: u32,
}

impl HitPoints {
    /// Full health at `max`.
    #[must_use]
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Current hit points.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Hit points missing from the maximum.
    #[must_use]
    pub const fn missing(&self) -> u32 {
        self.max - self.current
    }

    /// Whether hit points have reached zero.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Whether current hit points are strictly below half the maximum.
    #[must_use]
    pub fn is_bloodied(&self) -> bool {
        u64::from(self.current) * 2 < u64::from(self.max)
    }

    /// Removes up to `amount` hit points, flooring at zero.
    ///
    /// Returns the hit points actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Restores up to `amount` hit points, capped at the maximum.
    ///
    /// Returns the hit points actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.missing());
        self.current += restored;
        restored
    }
}

// =============================================================================
// Spell slots
// =============================================================================

/// Remaining spell slots per tier. Slots only ever go down within a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPool {
    remaining: SpellSlots,
    max: SpellSlots,
}

impl SlotPool {
    /// A full pool.
    #[must_use]
    pub const fn full(max: SpellSlots) -> Self {
        Self {
            remaining: max,
            max,
        }
    }

    /// Remaining slots at `tier` (1-based).
    #[must_use]
    pub fn remaining(&self, tier: u8) -> u8 {
        self.remaining.get(tier)
    }

    /// Starting slots at `tier` (1-based).
    #[must_use]
    pub fn max(&self, tier: u8) -> u8 {
        self.max.get(tier)
    }

    /// Total slots left across tiers.
    #[must_use]
    pub fn total_remaining(&self) -> u32 {
        self.remaining.total()
    }

    /// Lowest tier at or above `min_tier` with a slot left.
    #[must_use]
    pub fn lowest_available(&self, min_tier: u8) -> Option<u8> {
        let top = u8::try_from(SpellSlots::TIERS).unwrap_or(u8::MAX);
        (min_tier.max(1)..=top).find(|&tier| self.remaining(tier) > 0)
    }

    /// Spends the lowest slot at or above `min_tier`, returning its tier.
    pub fn spend(&mut self, min_tier: u8) -> Option<u8> {
        let tier = self.lowest_available(min_tier)?;
        self.remaining.0[usize::from(tier - 1)] -= 1;
        Some(tier)
    }
}

// =============================================================================
// Flags
// =============================================================================

bitflags! {
    /// Transient state of a combatant during a trial.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct StatusFlags: u8 {
        /// At zero hit points; skipped by the scheduler and by targeting
        const INCAPACITATED = 1 << 0;
        /// Raging: bonus melee damage, physical damage halved
        const RAGING = 1 << 1;
        /// Action surge has been used this trial
        const ACTION_SURGE_SPENT = 1 << 2;
    }
}

bitflags! {
    /// Special abilities parsed from a template's tags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TraitFlags: u8 {
        /// Advantage on attacks while an ally stands
        const PACK_TACTICS = 1 << 0;
        /// Extra dice once per turn with advantage or a standing ally
        const SNEAK_ATTACK = 1 << 1;
        /// Enters a rage on its first turn
        const RAGE = 1 << 2;
        /// Doubles weapon attacks once per trial
        const ACTION_SURGE = 1 << 3;
        /// Regains hit points at the start of each turn
        const REGENERATION = 1 << 4;
    }
}

impl TraitFlags {
    const TAGS: [(&'static str, TraitFlags); 5] = [
        ("pack tactics", TraitFlags::PACK_TACTICS),
        ("sneak attack", TraitFlags::SNEAK_ATTACK),
        ("rage", TraitFlags::RAGE),
        ("action surge", TraitFlags::ACTION_SURGE),
        ("regeneration", TraitFlags::REGENERATION),
    ];

    /// Collects the recognised tags of a template.
    #[must_use]
    pub fn from_template(template: &StatTemplate) -> Self {
        Self::TAGS
            .iter()
            .filter(|(tag, _)| template.has_tag(tag))
            .fold(Self::empty(), |flags, &(_, flag)| flags | flag)
    }
}

/// Hit points regained per turn from a `regeneration N` tag.
///
/// A bare `regeneration` tag or an unparseable amount regenerates nothing.
#[must_use]
pub fn regeneration_amount(template: &StatTemplate) -> u32 {
    template
        .tag("regeneration")
        .and_then(|amount| amount.parse().ok())
        .unwrap_or(0)
}
