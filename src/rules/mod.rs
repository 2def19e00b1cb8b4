//! Game rules.
//!
//! - `resolver`: legality and effects of individual actions
//! - `turn`: phases, allowances and player alternation
//! - `scoring`: per-player statistics
//! - `result`: the terminal condition

pub mod resolver;
pub mod result;
pub mod scoring;
pub mod turn;

pub use resolver::{ActionResolver, DamageSource, PendingDecision};
pub use result::{evaluate, GameResult};
pub use scoring::{ScoreTracker, Stats};
pub use turn::{Phase, TurnController, TurnState};
