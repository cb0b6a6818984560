//! Encounter budget arithmetic.
//!
//! The party's budget is a per-character XP threshold times the party size.
//! The enemy side is the sum of creature XP scaled by a multiplier that grows
//! with the number of creatures, as in the Dungeon Master's Guide. Comparing
//! the two gives a rough difficulty rating before any simulation runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// XP award per built-in creature.
pub const CREATURE_EXPERIENCE: [(&str, u32); 25] = [
    ("Ape", 100),
    ("Boar", 50),
    ("Brown Bear", 200),
    ("Crocodile", 100),
    ("Displacer Beast", 700),
    ("Fire Elemental", 1800),
    ("Flameskull", 1100),
    ("Giant Boar", 450),
    ("Giant Centipede", 50),
    ("Giant Crocodile", 1800),
    ("Giant Eagle", 200),
    ("Giant Scorpion", 700),
    ("Giant Spider", 200),
    ("Giant Wasp", 100),
    ("Goblin", 50),
    ("Night Hag", 1800),
    ("Ogre", 450),
    ("Pirate", 200),
    ("Polar Bear", 450),
    ("Stone Giant", 2900),
    ("Swarm of Bats", 50),
    ("Vampire Spawn", 1800),
    ("Vampire", 10000),
    ("Wolf", 50),
    ("Young Dragon", 5900),
];

/// XP award for a creature, matched case-insensitively.
#[must_use]
pub fn experience(name: &str) -> Option<u32> {
    CREATURE_EXPERIENCE
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name.trim()))
        .map(|&(_, xp)| xp)
}

/// XP multiplier for a group of `count` creatures.
#[must_use]
pub fn encounter_multiplier(count: usize) -> f64 {
    match count {
        0 => 0.0,
        1 => 1.0,
        2 => 1.5,
        3..=6 => 2.0,
        7..=10 => 2.5,
        11..=14 => 3.0,
        _ => 4.0,
    }
}

/// Adjusted XP of an enemy line-up. `None` slots and unknown names are skipped
/// and do not count toward the multiplier.
#[must_use]
pub fn adjusted_experience<S: AsRef<str>>(enemies: &[Option<S>]) -> f64 {
    let awards: Vec<u32> = enemies
        .iter()
        .flatten()
        .filter_map(|name| experience(name.as_ref()))
        .collect();
    let total: u32 = awards.iter().sum();
    f64::from(total) * encounter_multiplier(awards.len())
}

/// Encounter difficulty relative to the party's thresholds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Below the easy threshold
    Trivial,
    /// At least easy
    Easy,
    /// At least medium
    Medium,
    /// At least hard
    Hard,
    /// At least deadly
    Deadly,
}

impl Difficulty {
    /// Ratings that have a threshold, from easiest to hardest.
    pub const RATED: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Deadly,
    ];

    /// Per-character XP threshold at level 5.
    #[must_use]
    pub const fn threshold(self) -> u32 {
        match self {
            Self::Trivial => 0,
            Self::Easy => 500,
            Self::Medium => 750,
            Self::Hard => 1100,
            Self::Deadly => 2200,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Trivial => "trivial",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Deadly => "deadly",
        };
        f.write_str(label)
    }
}

/// XP budget of a party of `party_size` at the given difficulty.
#[must_use]
pub fn party_budget(party_size: usize, difficulty: Difficulty) -> u64 {
    u64::from(difficulty.threshold()) * party_size as u64
}

/// Rates an adjusted enemy XP total against a party of `party_size`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rate(party_size: usize, adjusted_xp: f64) -> Difficulty {
    Difficulty::RATED
        .iter()
        .rev()
        .find(|&&difficulty| adjusted_xp >= party_budget(party_size, difficulty) as f64)
        .copied()
        .unwrap_or(Difficulty::Trivial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_table() {
        let expected = [
            (1, 1.0),
            (2, 1.5),
            (3, 2.0),
            (6, 2.0),
            (7, 2.5),
            (10, 2.5),
            (11, 3.0),
            (14, 3.0),
            (15, 4.0),
            (40, 4.0),
        ];
        for (count, multiplier) in expected {
            assert!(
                (encounter_multiplier(count) - multiplier).abs() < f64::EPSILON,
                "count {count}"
            );
        }
    }

    #[test]
    fn apes_scale_with_group_size() {
        for (count, xp) in [(1, 100.0), (2, 300.0), (3, 600.0), (7, 1750.0), (15, 6000.0)] {
            let enemies = vec![Some("Ape"); count];
            assert!((adjusted_experience(&enemies) - xp).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn empty_slots_do_not_count() {
        let enemies = [Some("Goblin"), None, Some("ogre"), None];
        assert!((adjusted_experience(&enemies) - 750.0).abs() < f64::EPSILON);
        assert!(adjusted_experience::<&str>(&[None, None]).abs() < f64::EPSILON);
    }

    #[test]
    fn party_budget_scales_with_size() {
        assert_eq!(party_budget(4, Difficulty::Hard), 4400);
        assert_eq!(party_budget(3, Difficulty::Easy), 1500);
    }

    #[test]
    fn ratings() {
        assert_eq!(rate(4, 0.0), Difficulty::Trivial);
        assert_eq!(rate(4, 2000.0), Difficulty::Easy);
        assert_eq!(rate(4, 3000.0), Difficulty::Medium);
        assert_eq!(rate(4, 4400.0), Difficulty::Hard);
        assert_eq!(rate(4, 20_000.0), Difficulty::Deadly);
    }

    #[test]
    fn every_catalog_creature_has_experience() {
        for template in crate::catalog::creatures() {
            assert!(experience(&template.name).is_some(), "{}", template.name);
        }
    }
}
