//! # digging-game
//!
//! Rules engine for a two-player digging and building board game.
//!
//! Players move pawns over a grid of layered tiles, dig through
//! grass, dirt and stone toward hidden gold, spend what they dig on
//! buildings, and play cards that help them or damage the opponent's
//! buildings. The first player to the winning score takes the game.
//!
//! ## Design Principles
//!
//! 1. **Commands in, events out**: The input layer sends `Command`s, the
//!    presentation layer consumes `Event`s. Nothing here renders or reads
//!    devices.
//!
//! 2. **Recorded randomness**: Every die roll and card pick goes through
//!    the `Randomness` trait, so an authoritative session can record
//!    outcomes and a peer can replay them exactly.
//!
//! 3. **Rejected actions change nothing**: Rules failures are values,
//!    returned before any state is touched.
//!
//! ## Modules
//!
//! - `core`: Players, state, commands and events, RNG, configuration
//! - `board`: Tiles, pawns and buildings
//! - `resources`: Suits and per-player resource piles
//! - `cards`: Card definitions and registry
//! - `zones`: Decks, discard piles, hand slots and in-play areas
//! - `rules`: Action resolution, turn structure, scoring, game end
//! - `session`: A running game with its action log

pub mod board;
pub mod cards;
pub mod core;
pub mod error;
pub mod resources;
pub mod rules;
pub mod session;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    ActionRecord, Command, DecisionToken, Event, GameRng, GameRngState, GameState, PlayerId,
    PlayerMap, Randomness, RecordedRandomness, RecordingRandomness, RulesConfig,
};

pub use crate::board::{BoardState, Building, BuildingId, BuildingKind, Layer, PawnId, TilePos};

pub use crate::cards::{CardDefinition, CardId, CardName, CardRegistry};

pub use crate::error::{ConfigError, GameError, Illegal, LogError};

pub use crate::resources::{ResourceLedger, ResourcePile, Suit};

pub use crate::rules::{ActionResolver, GameResult, Phase, PendingDecision, TurnController};

pub use crate::session::{Session, SessionBuilder, SessionView};

pub use crate::zones::{DrawPile, ZoneManager};
