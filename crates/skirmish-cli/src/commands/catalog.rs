//! `skirmish catalog`: list the built-in templates.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use bestiary::{budget, Bestiary, StatTemplate};

/// List the built-in stat templates
#[derive(Parser, Debug)]
pub struct Catalog {
    /// Print full stat blocks as JSON
    #[arg(long)]
    pub json: bool,
}

impl Catalog {
    pub fn execute(self) -> Result<()> {
        let store = Bestiary::with_standard_catalog();
        let templates: Vec<&StatTemplate> = store.iter().map(Arc::as_ref).collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&templates)?);
            return Ok(());
        }

        println!("{:<18} {:>3} {:>3} {:>4} {:>6}", "Name", "Lv", "AC", "HP", "XP");
        for template in templates {
            let xp = budget::experience(&template.name)
                .map_or_else(|| "-".to_string(), |xp| xp.to_string());
            println!(
                "{:<18} {:>3} {:>3} {:>4} {:>6}",
                template.name, template.level, template.armor_class, template.max_hit_points, xp
            );
        }
        Ok(())
    }
}
