//! Commands in, events out.
//!
//! A `Command` is a player decision delivered by the input layer (a tile
//! click, a card click, a yes/no answer). Resolving a command produces
//! `Event`s, which describe every state change for the visual and UI
//! layers. An `ActionRecord` pairs a command with the random outcomes the
//! authoritative side rolled for it, so peers can apply the same result
//! without rolling themselves.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;
use crate::board::{BuildingId, BuildingKind, Layer, PawnId, TilePos};
use crate::cards::CardName;
use crate::resources::{ResourcePile, Suit};
use crate::rules::Phase;
use crate::zones::DrawPile;

/// Identifies a pending decision so a late answer cannot resolve the
/// wrong prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionToken(pub u32);

/// A player decision.
///
/// `ticket` is the hand slot discarded to pay for a Then-phase action.
/// Start-phase moves and Finally-phase bonus digs are free and ignore it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    Move {
        pawn: PawnId,
        to: TilePos,
        ticket: Option<usize>,
    },
    Dig {
        pawn: PawnId,
        target: TilePos,
        ticket: Option<usize>,
    },
    Build {
        pawn: PawnId,
        target: TilePos,
        kind: BuildingKind,
        ticket: Option<usize>,
    },
    ActivateCard {
        slot: usize,
        target: Option<BuildingId>,
    },
    /// Answer a protection prompt: play one of the offered cards, or
    /// `None` to take the damage.
    Decide {
        token: DecisionToken,
        choice: Option<CardName>,
    },
    /// Discard down to the hand limit at the end of a turn.
    Discard {
        slot: usize,
    },
    /// Finish the current phase without (further) action.
    EndPhase,
}

/// A state change, for the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    PhaseChanged {
        player: PlayerId,
        phase: Phase,
    },
    TurnPassed {
        player: PlayerId,
        turn: u32,
        round: u32,
    },
    MineIncome {
        player: PlayerId,
        building: BuildingId,
        suit: Suit,
        amount: u32,
    },
    PawnMoved {
        pawn: PawnId,
        from: TilePos,
        to: TilePos,
    },
    TileDug {
        player: PlayerId,
        pos: TilePos,
        removed: Suit,
        revealed: Layer,
    },
    BuildingPlaced {
        player: PlayerId,
        building: BuildingId,
        kind: BuildingKind,
        pos: TilePos,
    },
    BuildingDamaged {
        building: BuildingId,
        amount: u8,
        health: u8,
    },
    BuildingRepaired {
        building: BuildingId,
        health: u8,
    },
    BuildingDestroyed {
        building: BuildingId,
        owner: PlayerId,
        kind: BuildingKind,
    },
    /// A protective card reduced incoming damage to `amount`.
    DamagePrevented {
        building: BuildingId,
        card: CardName,
        amount: u8,
    },
    DecisionRequested {
        token: DecisionToken,
        decider: PlayerId,
        building: BuildingId,
        amount: u8,
        options: SmallVec<[CardName; 2]>,
    },
    ResourcesPaid {
        player: PlayerId,
        cost: ResourcePile,
    },
    ResourcesGained {
        player: PlayerId,
        gained: ResourcePile,
    },
    CardDrawn {
        player: PlayerId,
        slot: usize,
        name: CardName,
    },
    HandFull {
        player: PlayerId,
    },
    NoCardsRemain {
        player: PlayerId,
        pile: DrawPile,
    },
    CardDiscarded {
        player: PlayerId,
        name: CardName,
    },
    CardActivated {
        player: PlayerId,
        name: CardName,
    },
    PersistentTriggered {
        player: PlayerId,
        name: CardName,
    },
    ScoreChanged {
        player: PlayerId,
        score: u32,
    },
    DiscardRequired {
        player: PlayerId,
        count: usize,
    },
}

/// A resolved command with the outcomes rolled for it.
///
/// Used for:
/// - Broadcasting an authoritative result to a peer
/// - Replay/debugging
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who issued the command.
    pub player: PlayerId,

    pub command: Command,

    /// Die rolls and draw picks, in the order they were consumed.
    pub outcomes: Vec<u32>,

    /// Turn number when the command was resolved.
    pub turn: u32,

    /// Position in the session log.
    pub sequence: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_equality() {
        let a = Command::Move {
            pawn: PawnId(0),
            to: TilePos::new(1, 2),
            ticket: None,
        };
        let b = Command::Move {
            pawn: PawnId(0),
            to: TilePos::new(1, 2),
            ticket: Some(0),
        };
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_command_serialization() {
        let command = Command::Build {
            pawn: PawnId(1),
            target: TilePos::new(3, 3),
            kind: BuildingKind::GoldMine,
            ticket: Some(2),
        };
        let json = serde_json::to_string(&command).unwrap();
        let deserialized: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(command, deserialized);
    }

    #[test]
    fn test_record_serialization() {
        let record = ActionRecord {
            player: PlayerId::Two,
            command: Command::ActivateCard {
                slot: 1,
                target: Some(BuildingId(4)),
            },
            outcomes: vec![6],
            turn: 3,
            sequence: 12,
        };

        let bytes = bincode::serialize(&record).unwrap();
        let decoded: ActionRecord = bincode::deserialize(&bytes).unwrap();
        assert_eq!(record, decoded);
    }
}
