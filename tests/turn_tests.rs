//! Turn structure tests: phases, alternation, income, draws and discards.

mod common;

use common::Table;
use digging_game::board::{BuildingKind, PawnId, TilePos};
use digging_game::cards::CardName;
use digging_game::core::{Command, Event, PlayerId};
use digging_game::error::{GameError, Illegal};
use digging_game::resources::Suit;
use digging_game::rules::Phase;

#[test]
fn test_turns_alternate_and_rounds_advance() {
    let mut table = Table::new();
    let mut order = Vec::new();
    let mut rounds = Vec::new();

    for _ in 0..6 {
        order.push(table.state.turn.current);
        rounds.push(table.state.turn.round);
        table.finish_turn();
    }

    use PlayerId::{One, Two};
    assert_eq!(order, vec![One, Two, One, Two, One, Two]);
    assert_eq!(rounds, vec![1, 1, 2, 2, 3, 3]);
    assert_eq!(table.state.turn.turn_number, 7);
}

#[test]
fn test_start_move_then_phase() {
    let mut table = Table::new();
    let events = table
        .handle(
            PlayerId::One,
            Command::Move {
                pawn: PawnId(0),
                to: TilePos::new(2, 1),
                ticket: None,
            },
        )
        .unwrap();

    assert_eq!(table.state.turn.phase, Phase::Then);
    assert!(events.contains(&Event::PhaseChanged {
        player: PlayerId::One,
        phase: Phase::Then
    }));

    // The Then move costs a ticket.
    let err = table
        .handle(
            PlayerId::One,
            Command::Move {
                pawn: PawnId(0),
                to: TilePos::new(3, 1),
                ticket: None,
            },
        )
        .unwrap_err();
    assert_eq!(err, GameError::Illegal(Illegal::TicketRequired));

    let err = table
        .handle(
            PlayerId::One,
            Command::Move {
                pawn: PawnId(0),
                to: TilePos::new(3, 1),
                ticket: Some(0),
            },
        )
        .unwrap_err();
    assert_eq!(err, GameError::Illegal(Illegal::EmptySlot));
}

#[test]
fn test_then_move_spends_ticket() {
    let mut table = Table::new();
    let ticket = table.give(PlayerId::One, CardName::Barricade);
    table.handle(PlayerId::One, Command::EndPhase).unwrap();

    table
        .handle(
            PlayerId::One,
            Command::Move {
                pawn: PawnId(0),
                to: TilePos::new(1, 0),
                ticket: Some(ticket),
            },
        )
        .unwrap();

    assert_eq!(table.state.turn.phase, Phase::Finally);
    assert_eq!(table.state.zones.hand_count(PlayerId::One), 0);
    // One Then action per turn.
    assert_eq!(
        table
            .handle(
                PlayerId::One,
                Command::Move {
                    pawn: PawnId(0),
                    to: TilePos::new(1, 1),
                    ticket: None,
                },
            )
            .unwrap_err(),
        GameError::WrongPhase(Phase::Finally)
    );
}

#[test]
fn test_out_of_turn_commands_rejected() {
    let mut table = Table::new();
    assert_eq!(
        table.handle(PlayerId::Two, Command::EndPhase).unwrap_err(),
        GameError::NotYourTurn(PlayerId::Two)
    );
    assert_eq!(
        table
            .handle(
                PlayerId::One,
                Command::Decide {
                    token: digging_game::core::DecisionToken(1),
                    choice: None
                }
            )
            .unwrap_err(),
        GameError::NoPendingDecision
    );
}

#[test]
fn test_end_of_turn_draw_and_factory_bonus() {
    let mut table = Table::new();
    table.finish_turn();
    assert_eq!(table.state.zones.hand_count(PlayerId::One), 1);

    table.place(PlayerId::Two, BuildingKind::Factory, TilePos::new(6, 0), 2);
    table.finish_turn();
    assert_eq!(table.state.zones.hand_count(PlayerId::Two), 2);
}

#[test]
fn test_discard_down_to_limit() {
    let mut table = Table::new();
    for name in [
        CardName::Windfall,
        CardName::Windfall,
        CardName::Excavation,
        CardName::Fortify,
        CardName::Barricade,
    ] {
        table.give(PlayerId::One, name);
    }
    table.enter(Phase::Finally);

    let events = table.handle(PlayerId::One, Command::EndPhase).unwrap();
    assert_eq!(table.state.turn.phase, Phase::End);
    assert!(events.contains(&Event::DiscardRequired {
        player: PlayerId::One,
        count: 1
    }));
    assert_eq!(table.state.turn.current, PlayerId::One);

    assert_eq!(
        table.handle(PlayerId::One, Command::EndPhase).unwrap_err(),
        GameError::WrongPhase(Phase::End)
    );

    let events = table.handle(PlayerId::One, Command::Discard { slot: 0 }).unwrap();
    assert_eq!(table.state.zones.hand_count(PlayerId::One), 5);
    assert_eq!(table.state.turn.current, PlayerId::Two);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::TurnPassed { player: PlayerId::Two, .. })));
}

#[test]
fn test_mines_pay_at_start_of_turn() {
    let mut table = Table::new();
    table.place(PlayerId::One, BuildingKind::GrassMine, TilePos::new(3, 3), 2);
    table.place(PlayerId::One, BuildingKind::StoneMine, TilePos::new(3, 5), 2);
    table.place(PlayerId::Two, BuildingKind::DirtMine, TilePos::new(5, 2), 2);

    table.finish_turn();
    assert_eq!(table.state.ledger.pile(PlayerId::Two).get(Suit::Dirt), 1);
    assert!(table.state.ledger.pile(PlayerId::One).is_empty());

    table.finish_turn();
    let pile = *table.state.ledger.pile(PlayerId::One);
    assert_eq!(pile.get(Suit::Grass), 1);
    assert_eq!(pile.get(Suit::Stone), 1);
    assert_eq!(pile.total(), 2);
}

#[test]
fn test_start_move_only_once() {
    let mut table = Table::new();
    table
        .handle(
            PlayerId::One,
            Command::Move {
                pawn: PawnId(0),
                to: TilePos::new(1, 2),
                ticket: None,
            },
        )
        .unwrap();
    assert!(table.state.turn.start_move_used);
    assert_eq!(table.state.turn.phase, Phase::Then);

    table.finish_turn();
    assert!(!table.state.turn.start_move_used);
}
