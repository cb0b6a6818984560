//! Bestiary: stat templates for the skirmish encounter simulator.
//!
//! This crate is the leaf of the workspace. It owns the immutable data the
//! simulation reads:
//!
//! - [`StatTemplate`]: the stat block of a class or creature at a level
//! - [`DamageDice`]: `XdY+Z` damage expressions
//! - [`TemplateStore`]: lookup by [`TemplateKey`], with the in-memory [`Bestiary`]
//! - [`budget`]: encounter XP arithmetic
//!
//! # Example
//!
//! ```
//! use bestiary::{budget, Bestiary, TemplateKey, TemplateStore};
//!
//! let bestiary = Bestiary::with_standard_catalog();
//! let ogre = bestiary.lookup(&TemplateKey::parse("Ogre")).unwrap();
//! assert_eq!(ogre.max_hit_points, 59);
//!
//! let xp = budget::adjusted_experience(&[Some("Ogre"), None, Some("Goblin")]);
//! assert!((xp - 750.0).abs() < f64::EPSILON);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod budget;
pub mod catalog;
pub mod dice;
pub mod store;
pub mod template;

pub use dice::{DamageDice, DiceError, MAX_DICE_COUNT, MAX_DIE_SIDES};
pub use store::{Bestiary, TemplateKey, TemplateNotFoundError, TemplateStore};
pub use template::{
    Ability, AbilityScores, DamageType, Mitigation, Position, SaveProficiencies, SpellEffect,
    SpellSlots, SpellTemplate, StatTemplate, StatTemplateBuilder,
};
