//! Read-only snapshots for the presentation layer.

use serde::{Deserialize, Serialize};

use crate::board::{BuildingKind, PawnId, TilePos};
use crate::cards::CardName;
use crate::core::{GameState, PlayerId, PlayerMap, RulesConfig};
use crate::resources::ResourcePile;
use crate::rules::{GameResult, PendingDecision, Phase};

/// What one player can see about themselves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub resources: ResourcePile,
    pub score: u32,
    /// Occupied hand slots and the card in each.
    pub hand: Vec<(usize, CardName)>,
    pub in_play: Vec<CardName>,
}

/// Snapshot of a session for the UI text layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub current: PlayerId,
    pub phase: Phase,
    pub turn: u32,
    pub round: u32,
    pub activations_left: u32,
    pub bonus_digs: u32,
    pub prompt: String,
    pub players: PlayerMap<PlayerView>,
    pub pending: Option<PendingDecision>,
    pub result: Option<GameResult>,
}

impl SessionView {
    pub(crate) fn capture(state: &GameState, config: &RulesConfig) -> Self {
        let turn = &state.turn;
        let allowance =
            config.base_activations + state.scores.built_count(turn.current, BuildingKind::Burrow);
        let result = state.result(config);
        Self {
            current: turn.current,
            phase: turn.phase,
            turn: turn.turn_number,
            round: turn.round,
            activations_left: allowance.saturating_sub(turn.activations_used),
            bonus_digs: turn.bonus_digs,
            prompt: prompt(state, config, result),
            players: PlayerMap::new(|player| PlayerView {
                resources: *state.ledger.pile(player),
                score: state.scores.score(player),
                hand: state
                    .zones
                    .hand_cards(player)
                    .map(|(slot, _, name)| (slot, name))
                    .collect(),
                in_play: state.zones.in_play(player),
            }),
            pending: state.pending.clone(),
            result,
        }
    }
}

fn prompt(state: &GameState, config: &RulesConfig, result: Option<GameResult>) -> String {
    match result {
        Some(GameResult::Winner(player)) => return format!("{player} wins!"),
        Some(GameResult::Draw) => return "The game is a draw.".to_string(),
        None => {}
    }
    if let Some(pending) = &state.pending {
        return format!(
            "{}: incoming {} damage. Play a protective card or take it?",
            pending.decider, pending.amount
        );
    }
    let player = state.turn.current;
    match state.turn.phase {
        Phase::Start => format!("{player}: you may move a pawn for free."),
        Phase::Then => format!("{player}: discard a card to move, dig or build."),
        Phase::Finally if state.turn.bonus_digs > 0 => {
            format!("{player}: dig with Excavation, play cards or end your turn.")
        }
        Phase::Finally => format!("{player}: play cards or end your turn."),
        Phase::End => format!("{player}: discard down to {} cards.", config.hand_limit),
    }
}

/// Tiles to highlight for a selected pawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlights {
    pub pawn: PawnId,
    pub movable: Vec<TilePos>,
    pub diggable: Vec<TilePos>,
    /// Legal sites per building kind the owner can currently afford.
    pub buildable: Vec<(BuildingKind, Vec<TilePos>)>,
}

impl Highlights {
    pub(crate) fn for_pawn(state: &GameState, config: &RulesConfig, pawn: PawnId) -> Option<Self> {
        let pawn = *state.board.pawn(pawn)?;
        let pile = state.ledger.pile(pawn.owner);
        let buildable = BuildingKind::ALL
            .into_iter()
            .filter(|&kind| pile.covers(config.build_costs.get(kind)))
            .map(|kind| (kind, state.board.build_targets(&pawn, kind)))
            .filter(|(_, tiles)| !tiles.is_empty())
            .collect();
        Some(Self {
            pawn: pawn.id,
            movable: state.board.move_targets(&pawn, state.turn.teleport[pawn.owner]),
            diggable: state.board.dig_targets(&pawn),
            buildable,
        })
    }
}
