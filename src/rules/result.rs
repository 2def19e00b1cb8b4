//! Terminal condition.

use serde::{Deserialize, Serialize};

use super::scoring::ScoreTracker;
use crate::core::PlayerId;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Both players reached the winning score together.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Draw => false,
        }
    }
}

/// Check if the game is over.
///
/// Returns `Some(result)` once any score reaches `winning_score`, `None`
/// while the game continues.
#[must_use]
pub fn evaluate(scores: &ScoreTracker, winning_score: u32) -> Option<GameResult> {
    let reached: Vec<PlayerId> = PlayerId::all()
        .filter(|&p| scores.score(p) >= winning_score)
        .collect();
    match reached.as_slice() {
        [] => None,
        [winner] => Some(GameResult::Winner(*winner)),
        _ => Some(GameResult::Draw),
    }
}
