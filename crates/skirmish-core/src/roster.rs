//! Roster: every combatant in one trial.
//!
//! The roster stores combatants in a `BTreeMap` keyed by [`CombatantId`], so
//! iteration is always in join order. Ids are handed out monotonically by
//! [`Roster::spawn`]; party members are spawned before enemies, which makes
//! join order match the order the encounter was described in.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use bestiary::StatTemplate;
//! use skirmish_core::combatant::Team;
//! use skirmish_core::roster::Roster;
//!
//! let fighter = Arc::new(StatTemplate::builder("Fighter", 5).hit_points(44).build());
//! let goblin = Arc::new(StatTemplate::builder("Goblin", 1).hit_points(7).build());
//!
//! let mut roster = Roster::new();
//! let a = roster.spawn(fighter, Team::Party);
//! let b = roster.spawn(goblin, Team::Enemies);
//!
//! let ids: Vec<_> = roster.ids_sorted().collect();
//! assert_eq!(ids, vec![a, b]);
//! assert_eq!(roster.living_count(Team::Enemies), 1);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use bestiary::{StatTemplate, TemplateKey, TemplateNotFoundError, TemplateStore};

use crate::combatant::{Combatant, CombatantId, Team};

/// All combatants of a trial, in join order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    /// Monotonically increasing id counter.
    next_id: u32,
    /// Combatants with deterministic iteration order.
    combatants: BTreeMap<CombatantId, Combatant>,
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            combatants: BTreeMap::new(),
        }
    }

    /// Adds a fresh combatant for `template` on `team`.
    ///
    /// # Returns
    ///
    /// The join-order id assigned to the combatant.
    pub fn spawn(&mut self, template: Arc<StatTemplate>, team: Team) -> CombatantId {
        let id = CombatantId::new(self.next_id);
        self.next_id += 1;
        self.combatants.insert(id, Combatant::new(id, team, template));
        id
    }

    /// Looks `key` up in `store` and spawns the result.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateNotFoundError`] when the store has no such template;
    /// the roster is left unchanged.
    pub fn spawn_from<S: TemplateStore + ?Sized>(
        &mut self,
        store: &S,
        key: &TemplateKey,
        team: Team,
    ) -> Result<CombatantId, TemplateNotFoundError> {
        let template = store.lookup(key)?;
        Ok(self.spawn(template, team))
    }

    /// Returns a combatant by id.
    #[must_use]
    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    /// Returns a mutable combatant by id.
    #[must_use]
    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    /// Ids in join order.
    pub fn ids_sorted(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.combatants.keys().copied()
    }

    /// Combatants in join order.
    pub fn combatants_sorted(&self) -> impl Iterator<Item = &Combatant> + '_ {
        self.combatants.values()
    }

    /// Members of `team` in join order, standing or not.
    pub fn members(&self, team: Team) -> impl Iterator<Item = &Combatant> + '_ {
        self.combatants.values().filter(move |c| c.team() == team)
    }

    /// Standing members of `team` in join order.
    pub fn living(&self, team: Team) -> impl Iterator<Item = &Combatant> + '_ {
        self.members(team).filter(|c| c.is_alive())
    }

    /// Every standing combatant in join order.
    pub fn all_living(&self) -> impl Iterator<Item = &Combatant> + '_ {
        self.combatants.values().filter(|c| c.is_alive())
    }

    /// Number of standing members of `team`.
    #[must_use]
    pub fn living_count(&self, team: Team) -> usize {
        self.living(team).count()
    }

    /// Whether `team` has anyone standing.
    #[must_use]
    pub fn has_living(&self, team: Team) -> bool {
        self.living(team).next().is_some()
    }

    /// Number of incapacitated members of `team`.
    #[must_use]
    pub fn incapacitated_count(&self, team: Team) -> usize {
        self.members(team).filter(|c| c.is_incapacitated()).count()
    }

    /// Sum of current hit points of `team`.
    #[must_use]
    pub fn team_hit_points(&self, team: Team) -> u64 {
        self.members(team)
            .map(|c| u64::from(c.hit_points().current()))
            .sum()
    }

    /// Sum of maximum hit points of `team`.
    #[must_use]
    pub fn team_max_hit_points(&self, team: Team) -> u64 {
        self.members(team)
            .map(|c| u64::from(c.hit_points().max()))
            .sum()
    }

    /// Number of combatants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
