//! Damage dice expressions.
//!
//! A [`DamageDice`] is the `XdY+Z` notation used throughout stat blocks: a
//! number of identical dice plus a flat modifier. Rolls are drawn from any
//! [`rand::Rng`], so a seeded generator reproduces the same totals.
//!
//! # Example
//!
//! ```
//! use bestiary::DamageDice;
//!
//! let greatsword: DamageDice = "2d6+4".parse().unwrap();
//! assert_eq!(greatsword, DamageDice::new(2, 6, 4));
//! assert_eq!(greatsword.to_string(), "2d6+4");
//! assert_eq!(greatsword.max_total(), 16);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for dice notation parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    /// The string is not of the form `XdY`, `XdY+Z`, `XdY-Z` or `Z`.
    #[error("invalid dice notation: {0:?}")]
    InvalidNotation(String),
    /// A die needs at least one side.
    #[error("invalid die size: d{0}")]
    InvalidDieSize(u32),
    /// More dice or faces than a stat block can sensibly carry.
    #[error("dice out of range: {count}d{sides} (at most 100d1000)")]
    OutOfRange {
        /// Dice requested
        count: u32,
        /// Faces requested
        sides: u32,
    },
}

/// Most dice a parsed expression may roll.
pub const MAX_DICE_COUNT: u32 = 100;

/// Most faces a parsed die may have.
pub const MAX_DIE_SIDES: u32 = 1000;

/// A damage expression: `count` dice with `sides` faces plus `modifier`.
///
/// A flat expression (no dice) has `count == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageDice {
    /// Number of dice rolled.
    pub count: u32,
    /// Faces per die.
    pub sides: u32,
    /// Flat modifier added to the dice total.
    pub modifier: i32,
}

impl DamageDice {
    /// Creates a new dice expression.
    #[must_use]
    pub const fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// A flat amount with no dice.
    #[must_use]
    pub const fn flat(modifier: i32) -> Self {
        Self::new(0, 0, modifier)
    }

    /// Returns a copy with `bonus` added to the modifier.
    #[must_use]
    pub const fn with_bonus(self, bonus: i32) -> Self {
        Self::new(self.count, self.sides, self.modifier + bonus)
    }

    /// Sum of the dice alone, without the modifier.
    pub fn roll_dice<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.sides == 0 {
            return 0;
        }
        (0..self.count).fold(0u32, |total, _| {
            total.saturating_add(rng.gen_range(1..=self.sides))
        })
    }

    /// Rolls the full expression. Negative totals floor at zero.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        Self::floor_total(i64::from(self.roll_dice(rng)), self.modifier)
    }

    /// Rolls a critical hit: the dice are rolled and their maximum is added
    /// on top, then the modifier once.
    pub fn roll_critical<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let dice = i64::from(self.roll_dice(rng)) + i64::from(self.max_dice());
        Self::floor_total(dice, self.modifier)
    }

    /// Highest value the dice alone can show, saturating at `u32::MAX`.
    #[must_use]
    pub const fn max_dice(&self) -> u32 {
        self.count.saturating_mul(self.sides)
    }

    /// Lowest possible total of a normal roll.
    #[must_use]
    pub fn min_total(&self) -> u32 {
        let dice = if self.sides == 0 { 0 } else { self.count };
        Self::floor_total(i64::from(dice), self.modifier)
    }

    /// Highest possible total of a normal roll.
    #[must_use]
    pub fn max_total(&self) -> u32 {
        Self::floor_total(i64::from(self.max_dice()), self.modifier)
    }

    /// Expected total of a normal roll, ignoring the zero floor.
    #[must_use]
    pub fn average(&self) -> f64 {
        if self.sides == 0 {
            return f64::from(self.modifier);
        }
        f64::from(self.count) * (f64::from(self.sides) + 1.0) / 2.0 + f64::from(self.modifier)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn floor_total(dice: i64, modifier: i32) -> u32 {
        (dice + i64::from(modifier)).clamp(0, i64::from(u32::MAX)) as u32
    }
}

impl fmt::Display for DamageDice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 || self.sides == 0 {
            return write!(f, "{}", self.modifier);
        }
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

impl FromStr for DamageDice {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let notation: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        let invalid = || DiceError::InvalidNotation(s.to_string());

        if notation.is_empty() {
            return Err(invalid());
        }

        let Some((count_str, rest)) = notation.split_once('d') else {
            let modifier = notation.parse::<i32>().map_err(|_| invalid())?;
            return Ok(Self::flat(modifier));
        };

        let count = if count_str.is_empty() {
            1
        } else {
            count_str.parse::<u32>().map_err(|_| invalid())?
        };

        let (sides_str, modifier) = match rest.find(['+', '-']) {
            Some(pos) => {
                let modifier = rest[pos..]
                    .trim_start_matches('+')
                    .parse::<i32>()
                    .map_err(|_| invalid())?;
                (&rest[..pos], modifier)
            }
            None => (rest, 0),
        };

        let sides = sides_str.parse::<u32>().map_err(|_| invalid())?;
        if sides == 0 {
            return Err(DiceError::InvalidDieSize(sides));
        }
        if count > MAX_DICE_COUNT || sides > MAX_DIE_SIDES {
            return Err(DiceError::OutOfRange { count, sides });
        }

        Ok(Self::new(count, sides, modifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    mod parse_tests {
        use super::*;

        #[test]
        fn parses_full_notation() {
            assert_eq!("2d6+4".parse(), Ok(DamageDice::new(2, 6, 4)));
            assert_eq!("1d8-1".parse(), Ok(DamageDice::new(1, 8, -1)));
            assert_eq!(" 3d10 ".parse(), Ok(DamageDice::new(3, 10, 0)));
        }

        #[test]
        fn implicit_single_die() {
            assert_eq!("d20".parse(), Ok(DamageDice::new(1, 20, 0)));
        }

        #[test]
        fn flat_amount() {
            assert_eq!("7".parse(), Ok(DamageDice::flat(7)));
        }

        #[test]
        fn rejects_garbage() {
            assert!(matches!(
                "two dice".parse::<DamageDice>(),
                Err(DiceError::InvalidNotation(_))
            ));
            assert!(matches!(
                "".parse::<DamageDice>(),
                Err(DiceError::InvalidNotation(_))
            ));
            assert_eq!("2d0".parse::<DamageDice>(), Err(DiceError::InvalidDieSize(0)));
        }

        #[test]
        fn rejects_oversized_dice() {
            assert_eq!(
                "70000d70000".parse::<DamageDice>(),
                Err(DiceError::OutOfRange {
                    count: 70_000,
                    sides: 70_000
                })
            );
            assert!(matches!(
                "101d6".parse::<DamageDice>(),
                Err(DiceError::OutOfRange { .. })
            ));
            assert!(matches!(
                "1d1001".parse::<DamageDice>(),
                Err(DiceError::OutOfRange { .. })
            ));
            assert_eq!("100d1000".parse(), Ok(DamageDice::new(100, 1000, 0)));
        }

        #[test]
        fn display_matches_notation() {
            assert_eq!(DamageDice::new(2, 6, 4).to_string(), "2d6+4");
            assert_eq!(DamageDice::new(1, 8, -1).to_string(), "1d8-1");
            assert_eq!(DamageDice::new(8, 6, 0).to_string(), "8d6");
            assert_eq!(DamageDice::flat(3).to_string(), "3");
        }
    }

    mod roll_tests {
        use super::*;

        #[test]
        fn rolls_stay_in_range() {
            let dice = DamageDice::new(3, 6, 2);
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            for _ in 0..500 {
                let total = dice.roll(&mut rng);
                assert!((dice.min_total()..=dice.max_total()).contains(&total));
            }
        }

        #[test]
        fn critical_adds_max_dice() {
            let dice = DamageDice::new(1, 8, 3);
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            for _ in 0..200 {
                let total = dice.roll_critical(&mut rng);
                assert!((12..=19).contains(&total), "crit total {total}");
            }
        }

        #[test]
        fn negative_modifier_floors_at_zero() {
            let dice = DamageDice::new(1, 4, -10);
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            assert_eq!(dice.roll(&mut rng), 0);
            assert_eq!(dice.min_total(), 0);
        }

        #[test]
        fn same_seed_same_rolls() {
            let dice = DamageDice::new(4, 6, 0);
            let mut a = ChaCha8Rng::seed_from_u64(42);
            let mut b = ChaCha8Rng::seed_from_u64(42);
            for _ in 0..50 {
                assert_eq!(dice.roll(&mut a), dice.roll(&mut b));
            }
        }

        #[test]
        fn huge_dice_saturate_instead_of_overflowing() {
            let dice = DamageDice::new(70_000, 70_000, 5);
            assert_eq!(dice.max_dice(), u32::MAX);
            assert_eq!(dice.max_total(), u32::MAX);
            let mut rng = ChaCha8Rng::seed_from_u64(9);
            assert_eq!(dice.roll_critical(&mut rng), u32::MAX);
            assert!(dice.roll(&mut rng) >= 70_000);
        }

        #[test]
        fn average_of_common_dice() {
            assert!((DamageDice::new(2, 6, 4).average() - 11.0).abs() < f64::EPSILON);
            assert!((DamageDice::flat(5).average() - 5.0).abs() < f64::EPSILON);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rolls_stay_within_range(
                count in 0u32..12,
                sides in 1u32..=20,
                modifier in -10i32..=10,
                seed in any::<u64>(),
            ) {
                let dice = DamageDice::new(count, sides, modifier);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let total = dice.roll(&mut rng);
                prop_assert!(total >= dice.min_total());
                prop_assert!(total <= dice.max_total());
                prop_assert!(dice.roll_critical(&mut rng) <= dice.max_total() + dice.max_dice());
            }

            #[test]
            fn notation_survives_display(
                count in 1u32..12,
                sides in 1u32..=20,
                modifier in -10i32..=10,
            ) {
                let dice = DamageDice::new(count, sides, modifier);
                prop_assert_eq!(dice.to_string().parse::<DamageDice>(), Ok(dice));
            }
        }
    }
}
