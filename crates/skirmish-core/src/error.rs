//! Error types for encounter simulation.

use bestiary::TemplateNotFoundError;
use thiserror::Error;

use crate::combatant::CombatantId;

/// An encounter that cannot be simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidEncounterError {
    /// The party has no members.
    #[error("the party has no members")]
    EmptyParty,

    /// Zero trials were requested.
    #[error("trial count must be at least 1")]
    NoTrials,

    /// A round cap of zero would end every trial before it starts.
    #[error("round cap must be at least 1")]
    NoRounds,
}

/// A combatant could not act on its turn.
///
/// The encounter recovers from this by treating the turn as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionError {
    /// No weapon attacks and no castable spell.
    #[error("combatant {combatant} has no attack and no castable spell")]
    NoViableAction {
        /// The stuck combatant
        combatant: CombatantId,
    },
}

/// Errors surfaced by a recap.
#[derive(Debug, Error)]
pub enum RecapError {
    /// A party member or enemy names a template the store does not have.
    #[error(transparent)]
    TemplateNotFound(#[from] TemplateNotFoundError),

    /// The request cannot be simulated.
    #[error("invalid encounter: {0}")]
    InvalidEncounter(#[from] InvalidEncounterError),

    /// The caller cancelled the recap; partial results were discarded.
    #[error("recap cancelled before all trials completed")]
    Cancelled,

    /// The dedicated worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[source] rayon::ThreadPoolBuildError),
}

/// Result alias for recap operations.
pub type Result<T> = std::result::Result<T, RecapError>;
