//! `skirmish recap`: run a statistical recap and report it.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use bestiary::budget::{self, Difficulty};
use bestiary::{Bestiary, TemplateKey};
use skirmish_core::{run_recap, RecapConfig, RecapResult};

/// Simulate an encounter many times and summarize the outcomes
#[derive(Parser, Debug)]
pub struct Recap {
    /// Party members, comma separated (e.g. `Fighter,Cleric Lv3`)
    #[arg(long, value_delimiter = ',', required = true)]
    pub party: Vec<String>,

    /// Enemies, comma separated; `None` marks an empty slot
    #[arg(long, value_delimiter = ',')]
    pub enemies: Vec<String>,

    /// Level for party members given without an `LvN` suffix
    #[arg(long, default_value_t = 5)]
    pub level: u8,

    /// Number of trials
    #[arg(long, default_value_t = skirmish_core::recap::DEFAULT_TRIAL_COUNT)]
    pub trials: usize,

    /// Master seed for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Rounds before a trial is declared a draw
    #[arg(long, default_value_t = skirmish_core::encounter::DEFAULT_ROUND_CAP)]
    pub round_cap: u32,

    /// Probability a caster picks a damage spell over its weapon
    #[arg(long, default_value_t = skirmish_core::resolver::DEFAULT_CAST_CHANCE)]
    pub cast_chance: f64,

    /// Worker threads (0 = all cores)
    #[arg(long, default_value_t = 0)]
    pub workers: usize,

    /// Print the narrative of every trial to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

/// What `--json` prints.
#[derive(Serialize)]
struct Report<'a> {
    party: &'a [String],
    enemies: &'a [Option<String>],
    adjusted_experience: f64,
    difficulty: Difficulty,
    recap: &'a RecapResult,
}

impl Recap {
    pub fn execute(self) -> Result<()> {
        let party: Vec<String> = self
            .party
            .iter()
            .map(|name| party_key(name, self.level))
            .collect();
        let enemies: Vec<Option<String>> = self.enemies.iter().map(|name| enemy_slot(name)).collect();

        let config = RecapConfig {
            trial_count: self.trials,
            round_cap: self.round_cap,
            seed: self.seed,
            verbose: self.verbose,
            cast_chance: self.cast_chance,
            workers: self.workers,
        };

        let store = Bestiary::with_standard_catalog();
        let result = run_recap(&store, &party, &enemies, &config).context("recap failed")?;

        let adjusted_experience = budget::adjusted_experience(&enemies);
        let difficulty = budget::rate(party.len(), adjusted_experience);

        if self.json {
            let report = Report {
                party: &party,
                enemies: &enemies,
                adjusted_experience,
                difficulty,
                recap: &result,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_summary(&party, &enemies, adjusted_experience, difficulty, &result);
        }
        Ok(())
    }
}

/// Appends ` Lv{level}` unless the name already carries a level.
fn party_key(name: &str, level: u8) -> String {
    let name = name.trim();
    if TemplateKey::parse(name).level.is_some() {
        name.to_string()
    } else {
        TemplateKey::new(name, level).to_string()
    }
}

/// `None` (any case) and blanks are empty slots.
fn enemy_slot(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() || name.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(name.to_string())
    }
}

fn print_summary(
    party: &[String],
    enemies: &[Option<String>],
    adjusted_experience: f64,
    difficulty: Difficulty,
    result: &RecapResult,
) {
    let summary = &result.summary;
    let enemies: Vec<&str> = enemies.iter().flatten().map(String::as_str).collect();

    println!("Party:    {}", party.join(", "));
    if enemies.is_empty() {
        println!("Enemies:  (none)");
    } else {
        println!("Enemies:  {}", enemies.join(", "));
    }
    let thresholds: Vec<String> = Difficulty::RATED
        .iter()
        .map(|d| format!("{d} {}", budget::party_budget(party.len(), *d)))
        .collect();
    println!("Budget:   {adjusted_experience:.0} adjusted XP, {difficulty}");
    println!("          ({})", thresholds.join(", "));
    println!("Seed:     {}", result.seed);
    println!();
    println!(
        "Win probability: {:.1}% ({} wins, {} losses, {} draws over {} trials)",
        summary.win_probability * 100.0,
        summary.party_wins,
        summary.enemy_wins,
        summary.draws,
        summary.trials,
    );
    println!(
        "Rounds:          {:.2} (min {}, max {})",
        summary.mean_rounds, summary.rounds.min, summary.rounds.max
    );
    println!(
        "Damage dealt:    {:.1} ± {:.1}",
        summary.mean_damage,
        summary.damage.std_dev()
    );
    println!("Party deaths:    {:.2}", summary.mean_deaths);
    println!(
        "Health left:     {:.1}%",
        summary.mean_health_fraction * 100.0
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_is_appended_once() {
        assert_eq!(party_key("Fighter", 5), "Fighter Lv5");
        assert_eq!(party_key(" Rogue Lv3 ", 5), "Rogue Lv3");
    }

    #[test]
    fn none_marks_empty_slots() {
        assert_eq!(enemy_slot("None"), None);
        assert_eq!(enemy_slot("none"), None);
        assert_eq!(enemy_slot(" "), None);
        assert_eq!(enemy_slot("Goblin"), Some("Goblin".to_string()));
    }
}
