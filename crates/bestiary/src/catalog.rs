//! Built-in stat blocks.
//!
//! Twelve player classes at level 5 and the creatures offered by the
//! encounter builder. Creature levels are their challenge rating rounded to
//! the nearest whole number, never below 1, so `"Goblin"` resolves to
//! `Goblin Lv1`.
//!
//! Ability tags understood by the simulation: `action surge`, `sneak attack`,
//! `rage`, `pack tactics` and `regeneration N`.

use crate::dice::DamageDice;
use crate::template::{
    Ability, DamageType, Mitigation, Position, SaveProficiencies as Saves, SpellEffect,
    SpellSlots, SpellTemplate, StatTemplate,
};

/// Level at which the built-in classes are provided.
pub const CLASS_LEVEL: u8 = 5;

/// Names of the built-in classes.
pub const CLASS_NAMES: [&str; 12] = [
    "Barbarian",
    "Bard",
    "Cleric",
    "Druid",
    "Fighter",
    "Monk",
    "Paladin",
    "Ranger",
    "Rogue",
    "Sorcerer",
    "Warlock",
    "Wizard",
];

/// Every built-in template: classes first, then creatures.
#[must_use]
pub fn standard() -> Vec<StatTemplate> {
    let mut templates = classes();
    templates.extend(creatures());
    templates
}

// =============================================================================
// Spells
// =============================================================================

fn heal(name: &str, tier: u8, amount: DamageDice) -> SpellTemplate {
    SpellTemplate::new(name, tier, SpellEffect::Heal { amount })
}

fn ray(name: &str, tier: u8, damage: DamageDice, rays: u8) -> SpellTemplate {
    SpellTemplate::new(name, tier, SpellEffect::Attack { damage, rays })
}

fn save(
    name: &str,
    tier: u8,
    damage: DamageDice,
    ability: Ability,
    mitigation: Mitigation,
    targets: u8,
) -> SpellTemplate {
    SpellTemplate::new(
        name,
        tier,
        SpellEffect::Save {
            damage,
            ability,
            mitigation,
            targets,
        },
    )
}

fn fireball() -> SpellTemplate {
    save(
        "Fireball",
        3,
        DamageDice::new(8, 6, 0),
        Ability::Dexterity,
        Mitigation::Half,
        3,
    )
}

fn scorching_ray() -> SpellTemplate {
    ray("Scorching Ray", 2, DamageDice::new(2, 6, 0), 3)
}

fn chromatic_orb() -> SpellTemplate {
    ray("Chromatic Orb", 1, DamageDice::new(3, 8, 0), 1)
}

fn shatter() -> SpellTemplate {
    save(
        "Shatter",
        2,
        DamageDice::new(3, 8, 0),
        Ability::Constitution,
        Mitigation::Half,
        2,
    )
}

fn magic_missile() -> SpellTemplate {
    ray("Magic Missile", 1, DamageDice::new(1, 4, 1), 3)
}

// =============================================================================
// Classes
// =============================================================================

/// The built-in level-5 classes.
#[must_use]
pub fn classes() -> Vec<StatTemplate> {
    let lv = CLASS_LEVEL;
    vec![
        StatTemplate::builder("Barbarian", lv)
            .armor_class(15)
            .hit_points(55)
            .proficiency(3)
            .to_hit(7)
            .attacks(2)
            .damage(DamageDice::new(1, 12, 4))
            .abilities([18, 14, 16, 8, 12, 10])
            .saves(Saves::STR | Saves::CON)
            .damage_types(&[DamageType::Slashing])
            .speed(40)
            .tag("rage")
            .build(),
        StatTemplate::builder("Bard", lv)
            .armor_class(14)
            .hit_points(33)
            .proficiency(3)
            .to_hit(5)
            .damage(DamageDice::new(1, 6, 2))
            .abilities([8, 14, 14, 10, 12, 18])
            .saves(Saves::DEX | Saves::CHA)
            .spellcasting(15, 7)
            .slots(SpellSlots::new(4, 3, 2))
            .ranged_attack(true)
            .position(Position::Ranged)
            .damage_types(&[DamageType::Piercing])
            .spell(heal("Healing Word", 1, DamageDice::new(1, 4, 4)))
            .spell(save(
                "Dissonant Whispers",
                1,
                DamageDice::new(3, 6, 0),
                Ability::Wisdom,
                Mitigation::Half,
                1,
            ))
            .spell(shatter())
            .build(),
        StatTemplate::builder("Cleric", lv)
            .armor_class(18)
            .hit_points(38)
            .proficiency(3)
            .to_hit(5)
            .damage(DamageDice::new(1, 6, 2))
            .abilities([14, 10, 14, 10, 18, 12])
            .saves(Saves::WIS | Saves::CHA)
            .spellcasting(15, 7)
            .slots(SpellSlots::new(4, 3, 2))
            .damage_types(&[DamageType::Bludgeoning])
            .spell(heal("Cure Wounds", 1, DamageDice::new(1, 8, 4)))
            .spell(ray("Guiding Bolt", 1, DamageDice::new(4, 6, 0), 1))
            .spell(save(
                "Spirit Guardians",
                3,
                DamageDice::new(3, 8, 0),
                Ability::Wisdom,
                Mitigation::Half,
                3,
            ))
            .build(),
        StatTemplate::builder("Druid", lv)
            .armor_class(16)
            .hit_points(38)
            .proficiency(3)
            .to_hit(5)
            .damage(DamageDice::new(1, 6, 2))
            .abilities([10, 14, 14, 12, 18, 8])
            .saves(Saves::INT | Saves::WIS)
            .spellcasting(15, 7)
            .slots(SpellSlots::new(4, 3, 2))
            .damage_types(&[DamageType::Slashing])
            .spell(heal("Cure Wounds", 1, DamageDice::new(1, 8, 4)))
            .spell(save(
                "Thunderwave",
                1,
                DamageDice::new(2, 8, 0),
                Ability::Constitution,
                Mitigation::Half,
                2,
            ))
            .spell(save(
                "Call Lightning",
                3,
                DamageDice::new(3, 10, 0),
                Ability::Dexterity,
                Mitigation::Half,
                1,
            ))
            .build(),
        StatTemplate::builder("Fighter", lv)
            .armor_class(18)
            .hit_points(44)
            .proficiency(3)
            .to_hit(7)
            .attacks(2)
            .damage(DamageDice::new(1, 8, 4))
            .abilities([18, 12, 16, 10, 12, 8])
            .saves(Saves::STR | Saves::CON)
            .damage_types(&[DamageType::Slashing])
            .tag("action surge")
            .build(),
        StatTemplate::builder("Monk", lv)
            .armor_class(16)
            .hit_points(38)
            .proficiency(3)
            .to_hit(7)
            .attacks(3)
            .damage(DamageDice::new(1, 6, 4))
            .abilities([10, 18, 14, 10, 16, 8])
            .saves(Saves::STR | Saves::DEX)
            .speed(40)
            .damage_types(&[DamageType::Bludgeoning])
            .build(),
        StatTemplate::builder("Paladin", lv)
            .armor_class(18)
            .hit_points(44)
            .proficiency(3)
            .to_hit(7)
            .attacks(2)
            .damage(DamageDice::new(1, 8, 4))
            .abilities([18, 10, 14, 8, 12, 16])
            .saves(Saves::WIS | Saves::CHA)
            .spellcasting(14, 6)
            .slots(SpellSlots::new(4, 2, 0))
            .damage_types(&[DamageType::Slashing])
            .spell(heal("Cure Wounds", 1, DamageDice::new(1, 8, 3)))
            .build(),
        StatTemplate::builder("Ranger", lv)
            .armor_class(15)
            .hit_points(44)
            .proficiency(3)
            .to_hit(7)
            .attacks(2)
            .damage(DamageDice::new(1, 8, 4))
            .abilities([12, 18, 14, 10, 14, 8])
            .saves(Saves::STR | Saves::DEX)
            .spellcasting(13, 5)
            .slots(SpellSlots::new(4, 2, 0))
            .ranged_attack(true)
            .position(Position::Ranged)
            .damage_types(&[DamageType::Piercing])
            .spell(heal("Cure Wounds", 1, DamageDice::new(1, 8, 2)))
            .spell(save(
                "Hail of Thorns",
                1,
                DamageDice::new(1, 10, 0),
                Ability::Dexterity,
                Mitigation::Half,
                2,
            ))
            .build(),
        StatTemplate::builder("Rogue", lv)
            .armor_class(15)
            .hit_points(33)
            .proficiency(3)
            .to_hit(7)
            .damage(DamageDice::new(1, 6, 4))
            .abilities([10, 18, 14, 12, 12, 10])
            .saves(Saves::DEX | Saves::INT)
            .ranged_attack(true)
            .position(Position::Ranged)
            .damage_types(&[DamageType::Piercing])
            .tag("sneak attack")
            .build(),
        StatTemplate::builder("Sorcerer", lv)
            .armor_class(13)
            .hit_points(32)
            .proficiency(3)
            .to_hit(5)
            .damage(DamageDice::new(1, 8, 2))
            .abilities([8, 14, 16, 10, 12, 18])
            .saves(Saves::CON | Saves::CHA)
            .spellcasting(15, 7)
            .slots(SpellSlots::new(4, 3, 2))
            .ranged_attack(true)
            .position(Position::Ranged)
            .damage_types(&[DamageType::Piercing])
            .spell(chromatic_orb())
            .spell(scorching_ray())
            .spell(fireball())
            .build(),
        StatTemplate::builder("Warlock", lv)
            .armor_class(13)
            .hit_points(38)
            .proficiency(3)
            .to_hit(7)
            .attacks(2)
            .damage(DamageDice::new(1, 10, 4))
            .abilities([8, 14, 14, 12, 10, 18])
            .saves(Saves::WIS | Saves::CHA)
            .spellcasting(15, 7)
            .slots(SpellSlots::new(0, 0, 2))
            .ranged_attack(true)
            .position(Position::Ranged)
            .damage_types(&[DamageType::Force])
            .spell(shatter())
            .build(),
        StatTemplate::builder("Wizard", lv)
            .armor_class(12)
            .hit_points(27)
            .proficiency(3)
            .to_hit(5)
            .damage(DamageDice::new(1, 4, 2))
            .abilities([8, 14, 14, 18, 12, 10])
            .saves(Saves::INT | Saves::WIS)
            .spellcasting(15, 7)
            .slots(SpellSlots::new(4, 3, 2))
            .ranged_attack(true)
            .position(Position::Ranged)
            .damage_types(&[DamageType::Piercing])
            .spell(magic_missile())
            .spell(scorching_ray())
            .spell(fireball())
            .build(),
    ]
}

// =============================================================================
// Creatures
// =============================================================================

/// The built-in creatures.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn creatures() -> Vec<StatTemplate> {
    vec![
        StatTemplate::builder("Ape", 1)
            .armor_class(12)
            .hit_points(19)
            .to_hit(5)
            .attacks(2)
            .damage(DamageDice::new(1, 6, 3))
            .abilities([16, 14, 14, 6, 12, 7])
            .damage_types(&[DamageType::Bludgeoning])
            .build(),
        StatTemplate::builder("Boar", 1)
            .armor_class(11)
            .hit_points(11)
            .to_hit(3)
            .damage(DamageDice::new(1, 6, 1))
            .abilities([13, 11, 12, 2, 9, 5])
            .speed(40)
            .damage_types(&[DamageType::Slashing])
            .build(),
        StatTemplate::builder("Brown Bear", 1)
            .armor_class(11)
            .hit_points(34)
            .to_hit(6)
            .attacks(2)
            .damage(DamageDice::new(1, 8, 4))
            .abilities([19, 10, 16, 2, 13, 7])
            .speed(40)
            .damage_types(&[DamageType::Slashing, DamageType::Piercing])
            .build(),
        StatTemplate::builder("Crocodile", 1)
            .armor_class(12)
            .hit_points(19)
            .to_hit(4)
            .damage(DamageDice::new(1, 10, 2))
            .abilities([15, 10, 13, 2, 10, 5])
            .speed(20)
            .damage_types(&[DamageType::Piercing])
            .build(),
        StatTemplate::builder("Displacer Beast", 3)
            .armor_class(13)
            .hit_points(85)
            .to_hit(6)
            .attacks(2)
            .damage(DamageDice::new(1, 6, 4))
            .abilities([18, 15, 16, 6, 12, 8])
            .speed(40)
            .damage_types(&[DamageType::Bludgeoning, DamageType::Piercing])
            .build(),
        StatTemplate::builder("Fire Elemental", 5)
            .armor_class(13)
            .hit_points(102)
            .proficiency(3)
            .to_hit(6)
            .attacks(2)
            .damage(DamageDice::new(2, 6, 3))
            .abilities([10, 17, 16, 6, 10, 7])
            .speed(50)
            .damage_types(&[DamageType::Fire])
            .build(),
        StatTemplate::builder("Flameskull", 4)
            .armor_class(13)
            .hit_points(40)
            .to_hit(5)
            .attacks(2)
            .damage(DamageDice::new(3, 6, 0))
            .abilities([1, 17, 14, 16, 10, 11])
            .spellcasting(13, 5)
            .slots(SpellSlots::new(3, 2, 1))
            .ranged_attack(true)
            .position(Position::Ranged)
            .speed(40)
            .damage_types(&[DamageType::Fire])
            .spell(magic_missile())
            .spell(fireball())
            .build(),
        StatTemplate::builder("Giant Boar", 2)
            .armor_class(12)
            .hit_points(42)
            .to_hit(5)
            .damage(DamageDice::new(2, 6, 3))
            .abilities([17, 10, 16, 2, 7, 5])
            .speed(40)
            .damage_types(&[DamageType::Slashing])
            .build(),
        StatTemplate::builder("Giant Centipede", 1)
            .armor_class(13)
            .hit_points(4)
            .to_hit(4)
            .damage(DamageDice::new(1, 4, 2))
            .abilities([5, 14, 12, 1, 7, 3])
            .damage_types(&[DamageType::Piercing])
            .build(),
        StatTemplate::builder("Giant Crocodile", 5)
            .armor_class(14)
            .hit_points(85)
            .proficiency(3)
            .to_hit(8)
            .attacks(2)
            .damage(DamageDice::new(2, 8, 5))
            .abilities([21, 9, 17, 2, 10, 7])
            .damage_types(&[DamageType::Piercing, DamageType::Bludgeoning])
            .build(),
        StatTemplate::builder("Giant Eagle", 1)
            .armor_class(13)
            .hit_points(26)
            .to_hit(5)
            .attacks(2)
            .damage(DamageDice::new(1, 6, 3))
            .abilities([16, 17, 13, 8, 14, 10])
            .speed(80)
            .damage_types(&[DamageType::Piercing, DamageType::Slashing])
            .build(),
        StatTemplate::builder("Giant Scorpion", 3)
            .armor_class(15)
            .hit_points(52)
            .to_hit(4)
            .attacks(3)
            .damage(DamageDice::new(1, 8, 2))
            .abilities([15, 13, 15, 1, 9, 3])
            .speed(40)
            .damage_types(&[DamageType::Bludgeoning, DamageType::Piercing])
            .build(),
        StatTemplate::builder("Giant Spider", 1)
            .armor_class(14)
            .hit_points(26)
            .to_hit(5)
            .damage(DamageDice::new(1, 8, 3))
            .abilities([14, 16, 12, 2, 11, 4])
            .ranged_attack(true)
            .damage_types(&[DamageType::Piercing])
            .build(),
        StatTemplate::builder("Giant Wasp", 1)
            .armor_class(12)
            .hit_points(13)
            .to_hit(4)
            .damage(DamageDice::new(1, 6, 2))
            .abilities([10, 14, 10, 1, 10, 3])
            .speed(50)
            .damage_types(&[DamageType::Piercing])
            .build(),
        StatTemplate::builder("Goblin", 1)
            .armor_class(15)
            .hit_points(7)
            .to_hit(4)
            .damage(DamageDice::new(1, 6, 2))
            .abilities([8, 14, 10, 10, 8, 8])
            .ranged_attack(true)
            .damage_types(&[DamageType::Slashing])
            .build(),
        StatTemplate::builder("Night Hag", 5)
            .armor_class(17)
            .hit_points(112)
            .proficiency(3)
            .to_hit(7)
            .damage(DamageDice::new(2, 8, 4))
            .abilities([18, 15, 16, 16, 14, 16])
            .spellcasting(14, 6)
            .slots(SpellSlots::new(2, 0, 0))
            .damage_types(&[DamageType::Slashing])
            .spell(magic_missile())
            .build(),
        StatTemplate::builder("Ogre", 2)
            .armor_class(11)
            .hit_points(59)
            .to_hit(6)
            .damage(DamageDice::new(2, 8, 4))
            .abilities([19, 8, 16, 5, 7, 7])
            .speed(40)
            .damage_types(&[DamageType::Bludgeoning])
            .build(),
        StatTemplate::builder("Pirate", 1)
            .armor_class(14)
            .hit_points(32)
            .to_hit(5)
            .attacks(2)
            .damage(DamageDice::new(1, 6, 3))
            .abilities([15, 16, 14, 10, 11, 14])
            .ranged_attack(true)
            .damage_types(&[DamageType::Slashing])
            .build(),
        StatTemplate::builder("Polar Bear", 2)
            .armor_class(12)
            .hit_points(42)
            .to_hit(7)
            .attacks(2)
            .damage(DamageDice::new(1, 8, 5))
            .abilities([20, 10, 16, 2, 13, 7])
            .speed(40)
            .damage_types(&[DamageType::Piercing, DamageType::Slashing])
            .build(),
        StatTemplate::builder("Stone Giant", 7)
            .armor_class(17)
            .hit_points(126)
            .proficiency(3)
            .to_hit(9)
            .attacks(2)
            .damage(DamageDice::new(3, 8, 6))
            .abilities([23, 15, 20, 10, 12, 9])
            .saves(Saves::DEX | Saves::CON | Saves::WIS)
            .ranged_attack(true)
            .speed(40)
            .damage_types(&[DamageType::Bludgeoning])
            .build(),
        StatTemplate::builder("Swarm of Bats", 1)
            .armor_class(12)
            .hit_points(22)
            .to_hit(4)
            .damage(DamageDice::new(2, 4, 0))
            .abilities([5, 15, 10, 2, 12, 4])
            .damage_types(&[DamageType::Piercing])
            .build(),
        StatTemplate::builder("Vampire", 13)
            .armor_class(16)
            .hit_points(144)
            .proficiency(5)
            .to_hit(9)
            .attacks(3)
            .damage(DamageDice::new(1, 8, 4))
            .abilities([18, 18, 18, 17, 15, 18])
            .saves(Saves::DEX | Saves::WIS | Saves::CHA)
            .damage_types(&[DamageType::Bludgeoning, DamageType::Piercing])
            .tag("regeneration 20")
            .build(),
        StatTemplate::builder("Vampire Spawn", 5)
            .armor_class(15)
            .hit_points(82)
            .proficiency(3)
            .to_hit(6)
            .attacks(2)
            .damage(DamageDice::new(2, 4, 3))
            .abilities([16, 16, 16, 11, 10, 12])
            .saves(Saves::DEX | Saves::WIS)
            .damage_types(&[DamageType::Slashing, DamageType::Piercing])
            .tag("regeneration 10")
            .build(),
        StatTemplate::builder("Wolf", 1)
            .armor_class(13)
            .hit_points(11)
            .to_hit(4)
            .damage(DamageDice::new(2, 4, 2))
            .abilities([12, 15, 12, 3, 12, 6])
            .speed(40)
            .damage_types(&[DamageType::Piercing])
            .tag("pack tactics")
            .build(),
        StatTemplate::builder("Young Dragon", 10)
            .armor_class(18)
            .hit_points(178)
            .proficiency(4)
            .to_hit(10)
            .attacks(3)
            .damage(DamageDice::new(2, 6, 6))
            .abilities([23, 10, 21, 14, 11, 19])
            .saves(Saves::DEX | Saves::CON | Saves::WIS | Saves::CHA)
            .spellcasting(17, 8)
            .slots(SpellSlots::new(0, 0, 2))
            .speed(40)
            .damage_types(&[DamageType::Slashing, DamageType::Piercing])
            .spell(save(
                "Fire Breath",
                3,
                DamageDice::new(16, 6, 0),
                Ability::Dexterity,
                Mitigation::Half,
                3,
            ))
            .build(),
    ]
}
