//! Subcommands.

mod catalog;
mod recap;

pub use catalog::Catalog;
pub use recap::Recap;
