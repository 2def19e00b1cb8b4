//! Error taxonomy for the rules engine.
//!
//! Every rules failure is advisory: the action is rejected, state is left
//! untouched, and the player can choose again within the same turn.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::PlayerId;
use crate::resources::ResourcePile;
use crate::rules::Phase;

/// Errors returned when a command cannot be applied.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    #[error("not allowed during the {0} phase")]
    WrongPhase(Phase),

    #[error("illegal action: {0}")]
    Illegal(Illegal),

    #[error("no valid destination")]
    NoValidDestination,

    #[error("insufficient resources: need {needed}, have {available}")]
    InsufficientResources {
        needed: ResourcePile,
        available: ResourcePile,
    },

    #[error("no cards remain")]
    NoCardsRemain,

    #[error("waiting for {0} to decide")]
    AwaitingDecision(PlayerId),

    #[error("no pending decision matches that token")]
    NoPendingDecision,

    #[error("the game is over")]
    GameOver,

    #[error("recorded outcomes do not match the action being replayed")]
    ReplayDesync,
}

/// Rule violations reported through [`GameError::Illegal`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Illegal {
    #[error("no such pawn")]
    UnknownPawn,

    #[error("pawn belongs to the other player")]
    NotYourPawn,

    #[error("no such building")]
    UnknownBuilding,

    #[error("tile is off the board")]
    OffBoard,

    #[error("tile is not adjacent")]
    NotAdjacent,

    #[error("tile is occupied")]
    Occupied,

    #[error("too close to another building or pawn")]
    Crowded,

    #[error("tile is already at maximum depth")]
    MaxDepth,

    #[error("building does not match the tile layer")]
    WrongLayer,

    #[error("building is already at full health")]
    FullHealth,

    #[error("hand slot is empty")]
    EmptySlot,

    #[error("a ticket card is required")]
    TicketRequired,

    #[error("card needs a target building")]
    TargetRequired,

    #[error("card does not take a target")]
    UnexpectedTarget,

    #[error("no actions of that kind remain this turn")]
    NoActionsRemaining,

    #[error("that card cannot be used for this decision")]
    InvalidChoice,

    #[error("hand is already within the limit")]
    HandWithinLimit,
}

impl From<Illegal> for GameError {
    fn from(reason: Illegal) -> Self {
        GameError::Illegal(reason)
    }
}

/// Errors loading a rules configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid rules configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors encoding or decoding the action log.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("action log codec failed: {0}")]
    Codec(#[from] bincode::Error),
}

/// Result alias for rules operations.
pub type Result<T, E = GameError> = std::result::Result<T, E>;
