//! Combatants: a stat template plus the state it accumulates in one trial.
//!
//! - [`CombatantId`]: join-order identifier, unique within a roster
//! - [`Team`]: the party (team 0) or the enemies (team 1)
//! - [`Combatant`]: shared template, hit points, slots and flags
//!
//! A combatant is created at trial start with full hit points and slots and
//! dropped when the trial ends. It is never shared across trials.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use bestiary::StatTemplate;
//! use skirmish_core::combatant::{Combatant, CombatantId, Team};
//!
//! let template = Arc::new(StatTemplate::builder("Ogre", 2).hit_points(59).build());
//! let mut ogre = Combatant::new(CombatantId::new(3), Team::Enemies, template);
//!
//! assert_eq!(ogre.label(), "Ogre#3");
//! assert_eq!(ogre.take_damage(100, None), 59);
//! assert!(ogre.is_incapacitated());
//! ```

pub mod components;

use std::fmt;
use std::sync::Arc;

use bestiary::{
    DamageType, SpellTemplate, StatTemplate, TemplateKey, TemplateNotFoundError, TemplateStore,
};
use serde::{Deserialize, Serialize};

pub use components::{HitPoints, SlotPool, StatusFlags, TraitFlags};

/// Join-order identifier of a combatant.
///
/// Ids are assigned in spawn order, so ordering by id is ordering by join
/// order. The scheduler uses this as its final tiebreak.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(u32);

impl CombatantId {
    /// Creates an id from its raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Raw value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CombatantId({})", self.0)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CombatantId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

/// Side of the encounter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Team {
    /// The player party (team 0)
    Party,
    /// The opposing creatures (team 1)
    Enemies,
}

impl Team {
    /// Numeric team id: 0 for the party, 1 for the enemies.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Party => 0,
            Self::Enemies => 1,
        }
    }

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Party => Self::Enemies,
            Self::Enemies => Self::Party,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Party => write!(f, "Party"),
            Self::Enemies => write!(f, "Enemies"),
        }
    }
}

/// What happened at the start of a combatant's turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnStart {
    /// Hit points regained from regeneration
    pub regenerated: u32,
    /// Whether the combatant entered a rage this turn
    pub raged: bool,
}

/// A template instantiated into one trial.
#[derive(Debug, Clone)]
pub struct Combatant {
    id: CombatantId,
    team: Team,
    template: Arc<StatTemplate>,
    label: Arc<str>,
    hit_points: HitPoints,
    slots: SlotPool,
    status: StatusFlags,
    traits: TraitFlags,
    regeneration: u32,
}

impl Combatant {
    /// Creates a combatant at full hit points with full slots.
    #[must_use]
    pub fn new(id: CombatantId, team: Team, template: Arc<StatTemplate>) -> Self {
        let label: Arc<str> = format!("{}#{}", template.name, id).into();
        let traits = TraitFlags::from_template(&template);
        let regeneration = components::regeneration_amount(&template);
        let mut status = StatusFlags::empty();
        if template.max_hit_points == 0 {
            status.insert(StatusFlags::INCAPACITATED);
        }
        Self {
            id,
            team,
            hit_points: HitPoints::full(template.max_hit_points),
            slots: SlotPool::full(template.spell_slots),
            label,
            status,
            traits,
            regeneration,
            template,
        }
    }

    /// Looks the template up in `store` and instantiates it.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateNotFoundError`] when the store has no such template.
    pub fn instantiate<S: TemplateStore + ?Sized>(
        store: &S,
        key: &TemplateKey,
        team: Team,
        id: CombatantId,
    ) -> Result<Self, TemplateNotFoundError> {
        let template = store.lookup(key)?;
        Ok(Self::new(id, team, template))
    }

    /// Join-order id.
    #[must_use]
    pub const fn id(&self) -> CombatantId {
        self.id
    }

    /// Side of the encounter.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Shared stat block.
    #[must_use]
    pub fn template(&self) -> &Arc<StatTemplate> {
        &self.template
    }

    /// Display label, e.g. `"Goblin#3"`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Display label as a shared string, for narrative events.
    #[must_use]
    pub fn shared_label(&self) -> Arc<str> {
        Arc::clone(&self.label)
    }

    /// Hit points.
    #[must_use]
    pub const fn hit_points(&self) -> &HitPoints {
        &self.hit_points
    }

    /// Remaining spell slots.
    #[must_use]
    pub const fn slots(&self) -> &SlotPool {
        &self.slots
    }

    /// Status flags.
    #[must_use]
    pub const fn status(&self) -> StatusFlags {
        self.status
    }

    /// Trait flags.
    #[must_use]
    pub const fn traits(&self) -> TraitFlags {
        self.traits
    }

    /// Whether the combatant is at zero hit points.
    #[must_use]
    pub const fn is_incapacitated(&self) -> bool {
        self.status.contains(StatusFlags::INCAPACITATED)
    }

    /// Whether the combatant can still act and be targeted.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.is_incapacitated()
    }

    /// Whether the combatant is raging.
    #[must_use]
    pub const fn is_raging(&self) -> bool {
        self.status.contains(StatusFlags::RAGING)
    }

    /// Applies damage, flooring hit points at zero.
    ///
    /// Physical damage is halved while raging. Reaching zero incapacitates
    /// the combatant immediately. Returns the hit points actually removed.
    pub fn take_damage(&mut self, amount: u32, damage_type: Option<DamageType>) -> u32 {
        if self.is_incapacitated() {
            return 0;
        }
        let amount = match damage_type {
            Some(kind) if kind.is_physical() && self.is_raging() => amount / 2,
            _ => amount,
        };
        let removed = self.hit_points.take_damage(amount);
        if self.hit_points.is_depleted() {
            self.status.insert(StatusFlags::INCAPACITATED);
        }
        removed
    }

    /// Restores hit points, capped at the maximum. Incapacitated combatants
    /// are not revived. Returns the hit points actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.is_incapacitated() {
            return 0;
        }
        self.hit_points.heal(amount)
    }

    /// Start-of-turn bookkeeping: regeneration and entering a rage.
    pub fn start_turn(&mut self) -> TurnStart {
        if self.is_incapacitated() {
            return TurnStart::default();
        }
        let regenerated = if self.traits.contains(TraitFlags::REGENERATION) {
            self.hit_points.heal(self.regeneration)
        } else {
            0
        };
        let raged = self.traits.contains(TraitFlags::RAGE) && !self.is_raging();
        if raged {
            self.status.insert(StatusFlags::RAGING);
        }
        TurnStart { regenerated, raged }
    }

    /// Uses action surge if the combatant has it and has not spent it yet.
    pub fn use_action_surge(&mut self) -> bool {
        let available = self.traits.contains(TraitFlags::ACTION_SURGE)
            && !self.status.contains(StatusFlags::ACTION_SURGE_SPENT);
        if available {
            self.status.insert(StatusFlags::ACTION_SURGE_SPENT);
        }
        available
    }

    /// Whether a slot at or above the spell's tier remains.
    #[must_use]
    pub fn can_cast(&self, spell: &SpellTemplate) -> bool {
        self.slots.lowest_available(spell.tier).is_some()
    }

    /// Spends a slot for `spell`, returning the tier spent.
    pub fn spend_slot(&mut self, spell: &SpellTemplate) -> Option<u8> {
        self.slots.spend(spell.tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bestiary::{Bestiary, SpellEffect, SpellSlots};

    fn template(hp: u32) -> Arc<StatTemplate> {
        Arc::new(StatTemplate::builder("Test", 1).hit_points(hp).build())
    }

    mod id_tests {
        use super::*;

        #[test]
        fn ids_order_by_join_order() {
            assert!(CombatantId::new(1) < CombatantId::new(2));
            assert_eq!(format!("{:?}", CombatantId::new(7)), "CombatantId(7)");
            assert_eq!(CombatantId::from(7).to_string(), "7");
        }

        #[test]
        fn teams() {
            assert_eq!(Team::Party.id(), 0);
            assert_eq!(Team::Enemies.id(), 1);
            assert_eq!(Team::Party.opponent(), Team::Enemies);
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn starts_fresh() {
            let c = Combatant::new(CombatantId::new(0), Team::Party, template(12));
            assert_eq!(c.hit_points().current(), 12);
            assert!(c.is_alive());
            assert!(c.status().is_empty());
        }

        #[test]
        fn zero_hit_points_incapacitates() {
            let mut c = Combatant::new(CombatantId::new(0), Team::Party, template(12));
            assert_eq!(c.take_damage(5, None), 5);
            assert!(c.is_alive());
            assert_eq!(c.take_damage(20, None), 7);
            assert!(c.is_incapacitated());
            assert_eq!(c.take_damage(5, None), 0);
            assert_eq!(c.heal(5), 0);
        }

        #[test]
        fn raging_halves_physical_damage_only() {
            let barbarian = Arc::new(
                StatTemplate::builder("Barbarian", 5)
                    .hit_points(50)
                    .tag("rage")
                    .build(),
            );
            let mut c = Combatant::new(CombatantId::new(0), Team::Party, barbarian);
            assert!(c.start_turn().raged);
            assert!(!c.start_turn().raged);
            assert_eq!(c.take_damage(9, Some(DamageType::Slashing)), 4);
            assert_eq!(c.take_damage(9, Some(DamageType::Fire)), 9);
            assert_eq!(c.take_damage(9, None), 9);
        }

        #[test]
        fn regeneration_heals_living_combatants() {
            let vampire = Arc::new(
                StatTemplate::builder("Vampire", 13)
                    .hit_points(100)
                    .tag("regeneration 20")
                    .build(),
            );
            let mut c = Combatant::new(CombatantId::new(0), Team::Enemies, vampire);
            c.take_damage(30, None);
            assert_eq!(c.start_turn().regenerated, 20);
            assert_eq!(c.start_turn().regenerated, 10);
            c.take_damage(500, None);
            assert_eq!(c.start_turn().regenerated, 0);
            assert_eq!(c.hit_points().current(), 0);
        }

        #[test]
        fn action_surge_once_per_trial() {
            let fighter = Arc::new(
                StatTemplate::builder("Fighter", 5)
                    .hit_points(44)
                    .tag("action surge")
                    .build(),
            );
            let mut c = Combatant::new(CombatantId::new(0), Team::Party, fighter);
            assert!(c.use_action_surge());
            assert!(!c.use_action_surge());

            let mut plain = Combatant::new(CombatantId::new(1), Team::Party, template(10));
            assert!(!plain.use_action_surge());
        }

        #[test]
        fn casting_spends_slots() {
            let spell = SpellTemplate::new(
                "Cure Wounds",
                1,
                SpellEffect::Heal {
                    amount: bestiary::DamageDice::new(1, 8, 3),
                },
            );
            let cleric = Arc::new(
                StatTemplate::builder("Cleric", 5)
                    .hit_points(38)
                    .slots(SpellSlots::new(1, 0, 0))
                    .spell(spell.clone())
                    .build(),
            );
            let mut c = Combatant::new(CombatantId::new(0), Team::Party, cleric);
            assert!(c.can_cast(&spell));
            assert_eq!(c.spend_slot(&spell), Some(1));
            assert!(!c.can_cast(&spell));
            assert_eq!(c.spend_slot(&spell), None);
        }
    }

    mod instantiate_tests {
        use super::*;

        #[test]
        fn instantiates_from_store() {
            let store = Bestiary::with_standard_catalog();
            let key = TemplateKey::parse("Fighter Lv5");
            let c = Combatant::instantiate(&store, &key, Team::Party, CombatantId::new(0)).unwrap();
            assert_eq!(c.template().name, "Fighter");
            assert_eq!(c.hit_points().current(), c.template().max_hit_points);
            assert!(c.traits().contains(TraitFlags::ACTION_SURGE));
        }

        #[test]
        fn missing_template_propagates() {
            let store = Bestiary::new();
            let key = TemplateKey::parse("Unknown Class");
            let err = Combatant::instantiate(&store, &key, Team::Party, CombatantId::new(0))
                .unwrap_err();
            assert_eq!(err.key, key);
        }
    }
}
