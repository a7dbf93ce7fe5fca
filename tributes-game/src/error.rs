//! Runtime errors raised by a simulation.
use thiserror::Error;

use crate::scheduler::RoundType;
use crate::template::TemplateError;

/// Precondition violations on the simulation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidState {
    #[error("the simulation has not been started")]
    NotStarted,
    #[error("the simulation has already started")]
    AlreadyStarted,
    #[error("the simulation has already finished")]
    Finished,
    #[error("at least {need} tributes are required (have {have})")]
    NotEnoughTributes { have: usize, need: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid simulation state: {0}")]
    InvalidState(#[from] InvalidState),
    #[error("no admissible {round} action for {available} available tributes")]
    NoAdmissibleAction { round: RoundType, available: usize },
    #[error("tribute name is empty")]
    EmptyName,
    #[error("tribute name is longer than {max} characters")]
    NameTooLong { max: usize },
    #[error("a tribute named \"{0}\" is already in the game")]
    DuplicateName(String),
    #[error("the roster is full ({max} tributes)")]
    RosterFull { max: usize },
    #[error("no tribute named \"{0}\"")]
    UnknownTribute(String),
    #[error(transparent)]
    Template(#[from] TemplateError),
}
