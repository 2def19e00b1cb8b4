//! Complete game state.
//!
//! ## GameState
//!
//! - Board (tiles, pawns, buildings)
//! - Resource ledger
//! - Zone manager (card locations)
//! - Turn state and scores
//! - The pending protection decision, if any
//!
//! Randomness and the action log live in the session, not here, so a
//! state can be cloned and compared freely.

use serde::{Deserialize, Serialize};

use super::action::DecisionToken;
use super::config::RulesConfig;
use super::player::PlayerId;
use super::rng::GameRng;
use crate::board::BoardState;
use crate::cards::CardRegistry;
use crate::resources::ResourceLedger;
use crate::rules::{evaluate, GameResult, PendingDecision, ScoreTracker, TurnState};
use crate::zones::ZoneManager;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub board: BoardState,
    pub ledger: ResourceLedger,
    pub zones: ZoneManager,
    pub turn: TurnState,
    pub scores: ScoreTracker,
    pub pending: Option<PendingDecision>,
    next_token: u32,
}

impl GameState {
    /// Create the opening state. `board_rng` places the hidden gold.
    ///
    /// Hands start empty; the session deals them.
    #[must_use]
    pub fn new(config: &RulesConfig, registry: &CardRegistry, board_rng: &mut GameRng) -> Self {
        Self {
            board: BoardState::setup(config, board_rng),
            ledger: ResourceLedger::new(config.starting_resources),
            zones: ZoneManager::new(registry, config.hand_slots),
            turn: TurnState::new(),
            scores: ScoreTracker::new(),
            pending: None,
            next_token: 0,
        }
    }

    /// Player whose command is needed next: the decider while a decision
    /// is pending, otherwise the current player.
    #[must_use]
    pub fn acting_player(&self) -> PlayerId {
        self.pending
            .as_ref()
            .map_or(self.turn.current, |pending| pending.decider)
    }

    pub(crate) fn issue_token(&mut self) -> DecisionToken {
        self.next_token += 1;
        DecisionToken(self.next_token)
    }

    #[must_use]
    pub fn result(&self, config: &RulesConfig) -> Option<GameResult> {
        evaluate(&self.scores, config.winning_score)
    }
}
