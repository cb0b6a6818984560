//! Stat templates: the immutable stat block of a class or creature at a level.
//!
//! Templates are owned by a [`crate::TemplateStore`] and handed out behind an
//! `Arc`; nothing in a simulation ever mutates one. Runtime state (current hit
//! points, spent slots) lives in the simulation's own combatant type.
//!
//! # Example
//!
//! ```
//! use bestiary::{DamageDice, Position, SaveProficiencies, StatTemplate};
//!
//! let goblin = StatTemplate::builder("Goblin", 1)
//!     .armor_class(15)
//!     .hit_points(7)
//!     .to_hit(4)
//!     .damage(DamageDice::new(1, 6, 2))
//!     .ranged_attack(true)
//!     .build();
//!
//! assert_eq!(goblin.position, Position::Melee);
//! assert!(goblin.save_proficiencies.is_empty());
//! assert!(!goblin.is_spellcaster());
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dice::DamageDice;

// =============================================================================
// Abilities
// =============================================================================

/// The six ability scores.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    /// Strength
    Strength,
    /// Dexterity
    Dexterity,
    /// Constitution
    Constitution,
    /// Intelligence
    Intelligence,
    /// Wisdom
    Wisdom,
    /// Charisma
    Charisma,
}

impl Ability {
    /// All abilities in stat-block order.
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// The saving-throw proficiency bit for this ability.
    #[must_use]
    pub const fn save_flag(self) -> SaveProficiencies {
        match self {
            Self::Strength => SaveProficiencies::STR,
            Self::Dexterity => SaveProficiencies::DEX,
            Self::Constitution => SaveProficiencies::CON,
            Self::Intelligence => SaveProficiencies::INT,
            Self::Wisdom => SaveProficiencies::WIS,
            Self::Charisma => SaveProficiencies::CHA,
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
            Self::Constitution => "CON",
            Self::Intelligence => "INT",
            Self::Wisdom => "WIS",
            Self::Charisma => "CHA",
        };
        f.write_str(label)
    }
}

/// Raw ability scores, typically 1..=30.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityScores {
    /// Strength score
    pub strength: u8,
    /// Dexterity score
    pub dexterity: u8,
    /// Constitution score
    pub constitution: u8,
    /// Intelligence score
    pub intelligence: u8,
    /// Wisdom score
    pub wisdom: u8,
    /// Charisma score
    pub charisma: u8,
}

impl AbilityScores {
    /// Builds scores from a `[STR, DEX, CON, INT, WIS, CHA]` array.
    #[must_use]
    pub const fn from_array(scores: [u8; 6]) -> Self {
        Self {
            strength: scores[0],
            dexterity: scores[1],
            constitution: scores[2],
            intelligence: scores[3],
            wisdom: scores[4],
            charisma: scores[5],
        }
    }

    /// Raw score for an ability.
    #[must_use]
    pub const fn score(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// Ability modifier: `floor((score - 10) / 2)`.
    #[must_use]
    pub fn modifier(&self, ability: Ability) -> i32 {
        (i32::from(self.score(ability)) - 10).div_euclid(2)
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::from_array([10; 6])
    }
}

bitflags! {
    /// Abilities whose saving throws add the proficiency bonus.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SaveProficiencies: u8 {
        /// Strength saves
        const STR = 1 << 0;
        /// Dexterity saves
        const DEX = 1 << 1;
        /// Constitution saves
        const CON = 1 << 2;
        /// Intelligence saves
        const INT = 1 << 3;
        /// Wisdom saves
        const WIS = 1 << 4;
        /// Charisma saves
        const CHA = 1 << 5;
    }
}

// =============================================================================
// Combat descriptors
// =============================================================================

/// Preferred place in a fight.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Front line, trades blows at arm's reach
    #[default]
    Melee,
    /// Back line, attacks from a distance
    Ranged,
}

/// Damage types dealt by attacks and spells.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum DamageType {
    Slashing,
    Piercing,
    Bludgeoning,
    Fire,
    Cold,
    Lightning,
    Thunder,
    Acid,
    Poison,
    Necrotic,
    Radiant,
    Force,
    Psychic,
}

impl DamageType {
    /// Bludgeoning, piercing or slashing.
    #[must_use]
    pub const fn is_physical(self) -> bool {
        matches!(self, Self::Slashing | Self::Piercing | Self::Bludgeoning)
    }
}

/// What a successful saving throw does to a spell's damage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mitigation {
    /// Half damage, rounded down
    Half,
    /// No damage
    Negate,
}

impl Mitigation {
    /// Damage taken after a successful save.
    #[must_use]
    pub const fn apply(self, damage: u32) -> u32 {
        match self {
            Self::Half => damage / 2,
            Self::Negate => 0,
        }
    }
}

/// How a spell takes effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellEffect {
    /// One spell attack roll per ray; each ray picks its own target.
    Attack {
        /// Damage per ray
        damage: DamageDice,
        /// Number of separate attack rolls
        rays: u8,
    },
    /// Damage rolled once; every target saves against the caster's DC.
    Save {
        /// Damage before mitigation
        damage: DamageDice,
        /// Ability used for the saving throw
        ability: Ability,
        /// Effect of a successful save
        mitigation: Mitigation,
        /// Maximum number of opponents caught
        targets: u8,
    },
    /// Restores hit points to one ally.
    Heal {
        /// Hit points restored
        amount: DamageDice,
    },
}

/// A spell a template can cast by spending a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellTemplate {
    /// Spell name, used in narrative output
    pub name: String,
    /// Minimum slot tier (1..=3)
    pub tier: u8,
    /// What the spell does
    pub effect: SpellEffect,
}

impl SpellTemplate {
    /// Creates a spell.
    #[must_use]
    pub fn new(name: &str, tier: u8, effect: SpellEffect) -> Self {
        Self {
            name: name.to_string(),
            tier,
            effect,
        }
    }

    /// Whether the spell restores hit points instead of dealing damage.
    #[must_use]
    pub const fn is_heal(&self) -> bool {
        matches!(self.effect, SpellEffect::Heal { .. })
    }
}

/// Spell slots per tier, index 0 holding first-tier slots.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpellSlots(pub [u8; 3]);

impl SpellSlots {
    /// Number of slot tiers tracked.
    pub const TIERS: usize = 3;

    /// Creates a slot table.
    #[must_use]
    pub const fn new(first: u8, second: u8, third: u8) -> Self {
        Self([first, second, third])
    }

    /// No slots at all.
    #[must_use]
    pub const fn none() -> Self {
        Self([0; Self::TIERS])
    }

    /// Slots at `tier` (1-based). Out-of-range tiers have none.
    #[must_use]
    pub fn get(&self, tier: u8) -> u8 {
        usize::from(tier)
            .checked_sub(1)
            .and_then(|i| self.0.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Total slots across tiers.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&n| u32::from(n)).sum()
    }
}

// =============================================================================
// StatTemplate
// =============================================================================

/// Immutable stat block for a class or creature at a given level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatTemplate {
    /// Class or creature name
    pub name: String,
    /// Character level (creatures use their rounded challenge rating)
    pub level: u8,
    /// Armor class
    pub armor_class: i32,
    /// Maximum hit points
    pub max_hit_points: u32,
    /// Proficiency bonus
    pub proficiency_bonus: i32,
    /// Weapon to-hit bonus
    pub to_hit: i32,
    /// Weapon attacks per turn
    pub attacks: u8,
    /// Damage per weapon hit
    pub damage: DamageDice,
    /// Ability scores
    pub abilities: AbilityScores,
    /// Spell save DC
    pub spell_save_dc: i32,
    /// Spell attack modifier
    pub spell_attack_modifier: i32,
    /// Spell slots per tier
    pub spell_slots: SpellSlots,
    /// Speed in feet
    pub speed: u32,
    /// Can attack from range
    pub ranged_attack: bool,
    /// Preferred position
    pub position: Position,
    /// Proficient saving throws
    pub save_proficiencies: SaveProficiencies,
    /// Damage types dealt by weapon attacks; the first is the primary type
    pub damage_types: Vec<DamageType>,
    /// Castable spells
    pub spells: Vec<SpellTemplate>,
    /// Free-form ability tags such as `"pack tactics"` or `"regeneration 10"`
    pub tags: Vec<String>,
}

impl StatTemplate {
    /// Starts a builder with neutral defaults.
    #[must_use]
    pub fn builder(name: &str, level: u8) -> StatTemplateBuilder {
        StatTemplateBuilder::new(name, level)
    }

    /// Ability modifier shortcut.
    #[must_use]
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.abilities.modifier(ability)
    }

    /// Saving-throw bonus for an ability, including proficiency.
    #[must_use]
    pub fn save_bonus(&self, ability: Ability) -> i32 {
        let proficiency = if self.save_proficiencies.contains(ability.save_flag()) {
            self.proficiency_bonus
        } else {
            0
        };
        self.modifier(ability) + proficiency
    }

    /// Whether the template has any spell to cast.
    #[must_use]
    pub fn is_spellcaster(&self) -> bool {
        !self.spells.is_empty()
    }

    /// Primary weapon damage type.
    #[must_use]
    pub fn primary_damage_type(&self) -> Option<DamageType> {
        self.damage_types.first().copied()
    }

    /// Finds a tag by its leading words, case-insensitively.
    ///
    /// Returns the remainder of the tag after the match (trimmed), so
    /// `"regeneration 10"` looked up as `"regeneration"` yields `Some("10")`.
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags.iter().find_map(|tag| {
            let head = tag.get(..name.len())?;
            if !head.eq_ignore_ascii_case(name) {
                return None;
            }
            let rest = &tag[name.len()..];
            (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest.trim())
        })
    }

    /// Whether the template carries a tag.
    #[must_use]
    pub fn has_tag(&self, name: &str) -> bool {
        self.tag(name).is_some()
    }
}

/// Builder for [`StatTemplate`], used by the built-in catalog and tests.
#[derive(Debug, Clone)]
#[must_use]
pub struct StatTemplateBuilder {
    template: StatTemplate,
}

impl StatTemplateBuilder {
    fn new(name: &str, level: u8) -> Self {
        Self {
            template: StatTemplate {
                name: name.to_string(),
                level,
                armor_class: 10,
                max_hit_points: 1,
                proficiency_bonus: 2,
                to_hit: 0,
                attacks: 1,
                damage: DamageDice::new(1, 4, 0),
                abilities: AbilityScores::default(),
                spell_save_dc: 0,
                spell_attack_modifier: 0,
                spell_slots: SpellSlots::none(),
                speed: 30,
                ranged_attack: false,
                position: Position::Melee,
                save_proficiencies: SaveProficiencies::empty(),
                damage_types: Vec::new(),
                spells: Vec::new(),
                tags: Vec::new(),
            },
        }
    }

    /// Armor class.
    pub fn armor_class(mut self, ac: i32) -> Self {
        self.template.armor_class = ac;
        self
    }

    /// Maximum hit points.
    pub fn hit_points(mut self, hp: u32) -> Self {
        self.template.max_hit_points = hp;
        self
    }

    /// Proficiency bonus.
    pub fn proficiency(mut self, bonus: i32) -> Self {
        self.template.proficiency_bonus = bonus;
        self
    }

    /// Weapon to-hit bonus.
    pub fn to_hit(mut self, bonus: i32) -> Self {
        self.template.to_hit = bonus;
        self
    }

    /// Weapon attacks per turn.
    pub fn attacks(mut self, attacks: u8) -> Self {
        self.template.attacks = attacks;
        self
    }

    /// Weapon damage.
    pub fn damage(mut self, damage: DamageDice) -> Self {
        self.template.damage = damage;
        self
    }

    /// Ability scores as `[STR, DEX, CON, INT, WIS, CHA]`.
    pub fn abilities(mut self, scores: [u8; 6]) -> Self {
        self.template.abilities = AbilityScores::from_array(scores);
        self
    }

    /// Spell save DC and spell attack modifier.
    pub fn spellcasting(mut self, save_dc: i32, attack_modifier: i32) -> Self {
        self.template.spell_save_dc = save_dc;
        self.template.spell_attack_modifier = attack_modifier;
        self
    }

    /// Spell slots per tier.
    pub fn slots(mut self, slots: SpellSlots) -> Self {
        self.template.spell_slots = slots;
        self
    }

    /// Speed in feet.
    pub fn speed(mut self, speed: u32) -> Self {
        self.template.speed = speed;
        self
    }

    /// Whether weapon attacks reach at range.
    pub fn ranged_attack(mut self, ranged: bool) -> Self {
        self.template.ranged_attack = ranged;
        self
    }

    /// Preferred position.
    pub fn position(mut self, position: Position) -> Self {
        self.template.position = position;
        self
    }

    /// Proficient saving throws.
    pub fn saves(mut self, saves: SaveProficiencies) -> Self {
        self.template.save_proficiencies = saves;
        self
    }

    /// Damage types dealt by weapon attacks.
    pub fn damage_types(mut self, types: &[DamageType]) -> Self {
        self.template.damage_types = types.to_vec();
        self
    }

    /// Adds a castable spell.
    pub fn spell(mut self, spell: SpellTemplate) -> Self {
        self.template.spells.push(spell);
        self
    }

    /// Adds a free-form ability tag.
    pub fn tag(mut self, tag: &str) -> Self {
        self.template.tags.push(tag.to_string());
        self
    }

    /// Finishes the template.
    #[must_use]
    pub fn build(self) -> StatTemplate {
        self.template
    }
}
