//! Session tests: authoritative play, peer replay and the game end.

mod common;

use common::{init_logging, play_simple_turn};
use digging_game::board::BuildingKind;
use digging_game::core::{Command, PlayerId, RulesConfig};
use digging_game::error::GameError;
use digging_game::resources::ResourcePile;
use digging_game::rules::{GameResult, Stats};
use digging_game::session::Session;

#[test]
fn test_peer_stays_in_sync() {
    init_logging();
    let mut host = Session::builder().seed(2024).build();
    let mut peer = Session::builder().seed(2024).build();

    for _ in 0..12 {
        let before = host.log().len();
        play_simple_turn(&mut host);
        for record in host.log().iter().skip(before) {
            peer.apply_record(record).unwrap();
        }
    }

    assert_eq!(host.view(), peer.view());
    let tiles = |s: &Session| s.state().board.tiles().cloned().collect::<Vec<_>>();
    assert_eq!(tiles(&host), tiles(&peer));
    assert_eq!(host.log(), peer.log());
}

#[test]
fn test_draws_are_recorded() {
    init_logging();
    let mut host = Session::builder().seed(8).build();
    for _ in 0..3 {
        host.apply(PlayerId::One, Command::EndPhase).unwrap();
    }

    let records = host.log();
    assert!(records[0].outcomes.is_empty());
    assert_eq!(records[2].outcomes.len(), 1);
    assert_eq!(records[2].turn, 1);
    assert_eq!(host.state().turn.current, PlayerId::Two);
}

#[test]
fn test_tampered_records_desync() {
    init_logging();
    let mut host = Session::builder().seed(8).build();
    for _ in 0..3 {
        host.apply(PlayerId::One, Command::EndPhase).unwrap();
    }
    let records: Vec<_> = host.log().iter().cloned().collect();

    let mut extra = Session::builder().seed(8).build();
    extra.apply_record(&records[0]).unwrap();
    let mut padded = records[1].clone();
    padded.outcomes.push(3);
    assert_eq!(extra.apply_record(&padded).unwrap_err(), GameError::ReplayDesync);

    let mut short = Session::replay(RulesConfig::default(), 8, &records[..2]).unwrap();
    let mut missing = records[2].clone();
    missing.outcomes.clear();
    assert_eq!(short.apply_record(&missing).unwrap_err(), GameError::ReplayDesync);
}

#[test]
fn test_log_bytes_replay() {
    init_logging();
    let mut host = Session::builder().seed(77).build();
    for _ in 0..6 {
        play_simple_turn(&mut host);
    }

    let bytes = host.encode_log().unwrap();
    let records = Session::decode_log(&bytes).unwrap();
    let replica = Session::replay(host.config().clone(), host.seed(), &records).unwrap();

    assert_eq!(replica.view(), host.view());
    assert!(Session::decode_log(&bytes[..bytes.len() / 2]).is_err());
}

#[test]
fn test_commands_refused_after_game_over() {
    init_logging();
    let config = RulesConfig {
        winning_score: 1,
        starting_resources: ResourcePile::new(1, 1, 1, 0),
        ..RulesConfig::default()
    };
    let mut session = Session::builder().config(config).seed(3).build();

    let pawn = session.state().board.pawns_of(PlayerId::One).next().unwrap().id;
    let highlights = session.highlights(pawn).unwrap();
    let (_, sites) = highlights
        .buildable
        .iter()
        .find(|(kind, _)| *kind == BuildingKind::Factory)
        .cloned()
        .expect("factory site");
    let (ticket, _, _) = session.state().zones.hand_cards(PlayerId::One).next().unwrap();

    session.apply(PlayerId::One, Command::EndPhase).unwrap();
    session
        .apply(
            PlayerId::One,
            Command::Build {
                pawn,
                target: sites[0],
                kind: BuildingKind::Factory,
                ticket: Some(ticket),
            },
        )
        .unwrap();

    assert_eq!(session.result(), Some(GameResult::Winner(PlayerId::One)));
    assert_eq!(
        session.apply(PlayerId::One, Command::EndPhase).unwrap_err(),
        GameError::GameOver
    );
    let view = session.view();
    assert_eq!(view.result, Some(GameResult::Winner(PlayerId::One)));
    assert!(view.prompt.contains("wins"));
}

#[test]
fn test_view_reports_players() {
    init_logging();
    let session = Session::builder().seed(4).build();
    let view = session.view();

    assert_eq!(view.current, PlayerId::One);
    assert_eq!(view.turn, 1);
    assert_eq!(view.round, 1);
    assert_eq!(view.activations_left, 1);
    assert!(view.prompt.starts_with("Player 1"));
    assert_eq!(view.players[PlayerId::One].hand.len(), 4);
    assert_eq!(view.players[PlayerId::Two].score, 0);

    let json = serde_json::to_string(&view).unwrap();
    assert!(json.contains("\"prompt\""));
}

#[test]
fn test_new_game_resets() {
    init_logging();
    let mut session = Session::builder().seed(10).build();
    for _ in 0..4 {
        play_simple_turn(&mut session);
    }
    session.new_game(11);

    assert!(session.log().is_empty());
    assert_eq!(session.seed(), 11);
    assert_eq!(session.state().turn.turn_number, 1);
    for player in PlayerId::all() {
        assert_eq!(*session.state().scores.stats(player), Stats::default());
    }
}

#[test]
fn test_config_from_json() {
    init_logging();
    let config = RulesConfig::from_json_str(r#"{ "winning_score": 10, "hand_limit": 20 }"#).unwrap();
    assert_eq!(config.winning_score, 10);
    assert_eq!(config.hand_limit, config.hand_slots);
    assert_eq!(config.board_rows, 7);

    assert!(RulesConfig::from_json_str("{ not json").is_err());
}
