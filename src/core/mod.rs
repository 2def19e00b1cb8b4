//! Core types: players, state, commands, RNG, configuration.

pub mod action;
pub mod config;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{ActionRecord, Command, DecisionToken, Event};
pub use config::{BuildCosts, RulesConfig, MAX_PAWNS_PER_PLAYER};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState, Randomness, RecordedRandomness, RecordingRandomness};
pub use state::GameState;
