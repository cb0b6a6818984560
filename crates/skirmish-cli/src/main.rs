//! Skirmish command-line front end.
//!
//! Run with: `skirmish <command>`

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Catalog, Recap};
use tracing_subscriber::EnvFilter;

/// Monte Carlo encounter recaps for tabletop parties
#[derive(Parser)]
#[command(name = "skirmish")]
#[command(about = "Estimate how a party fares against an encounter", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Simulate an encounter many times and summarize the outcomes
    Recap(Recap),

    /// List the built-in stat templates
    Catalog(Catalog),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Command::Recap(cmd) if cmd.verbose);
    init_logging(verbose)?;

    match cli.command {
        Command::Recap(cmd) => cmd.execute(),
        Command::Catalog(cmd) => cmd.execute(),
    }
}

/// Logs to stderr, honoring `RUST_LOG`. The narrative target is raised to
/// INFO when `verbose`.
fn init_logging(verbose: bool) -> Result<()> {
    let mut filter = EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into());
    if verbose {
        let directive = format!("{}=info", skirmish_core::NARRATIVE_TARGET);
        filter = filter.add_directive(directive.parse()?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}
