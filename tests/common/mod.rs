//! Shared fixtures for integration tests.

#![allow(dead_code)]

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use digging_game::board::{BoardState, BuildingId, BuildingKind, TilePos};
use digging_game::cards::{CardName, CardRegistry};
use digging_game::core::{Command, Event, GameRng, GameState, PlayerId, RecordedRandomness, RulesConfig};
use digging_game::error::GameError;
use digging_game::rules::{Phase, TurnController};
use digging_game::session::Session;
use digging_game::zones::{DrawPile, Drawn};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Initialize test logging once per test binary.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then defaults to `warn`.
pub fn init_logging() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// A hand-arranged game: empty 7x7 board with no gold, Player One's pawn
/// at (1,1) and Player Two's at (5,5), empty hands and piles.
pub struct Table {
    pub state: GameState,
    pub config: RulesConfig,
    pub registry: CardRegistry,
    pub rng: GameRng,
}

pub const ONE_PAWN_START: TilePos = TilePos::new(1, 1);
pub const TWO_PAWN_START: TilePos = TilePos::new(5, 5);

impl Table {
    pub fn new() -> Self {
        Self::with_config(RulesConfig::default())
    }

    pub fn with_config(config: RulesConfig) -> Self {
        init_logging();
        let registry = CardRegistry::from_config(&config);
        let mut state = GameState::new(&config, &registry, &mut GameRng::new(0));
        state.board = BoardState::empty(7, 7, &[]);
        state.board.add_pawn(PlayerId::One, ONE_PAWN_START);
        state.board.add_pawn(PlayerId::Two, TWO_PAWN_START);
        Self {
            state,
            config,
            registry,
            rng: GameRng::new(1234),
        }
    }

    /// Move a named card from its draw pile into the player's hand.
    /// Returns the slot it landed in.
    pub fn give(&mut self, player: PlayerId, name: CardName) -> usize {
        let pile = if name.is_gold() { DrawPile::Gold } else { DrawPile::Main };
        let index = self
            .state
            .zones
            .draw_pile(pile)
            .position(|n| n == name)
            .expect("card left in its pile");
        let mut pick = RecordedRandomness::new([index as u32]);
        match self.state.zones.draw(player, pile, &mut pick).unwrap() {
            Drawn::Placed { slot, .. } => slot,
            Drawn::HandFull => panic!("hand full"),
        }
    }

    /// Put a named card straight into the player's in-play area.
    pub fn put_in_play(&mut self, player: PlayerId, name: CardName) {
        let slot = self.give(player, name);
        self.state.zones.put_in_play(player, slot).unwrap();
    }

    /// Place a building directly, keeping the built counters in step.
    pub fn place(&mut self, owner: PlayerId, kind: BuildingKind, pos: TilePos, health: u8) -> BuildingId {
        let id = self
            .state
            .board
            .place_building(owner, kind, pos, health)
            .expect("free tile");
        self.state.scores.record_built(owner, kind);
        id
    }

    pub fn enter(&mut self, phase: Phase) {
        self.state.turn.phase = phase;
    }

    /// Apply a command using the table's own RNG.
    pub fn handle(&mut self, player: PlayerId, command: Command) -> Result<Vec<Event>, GameError> {
        TurnController::new(&mut self.state, &self.config, &self.registry, &mut self.rng)
            .handle(player, &command)
    }

    /// Apply a command with scripted random outcomes.
    pub fn handle_with(
        &mut self,
        player: PlayerId,
        command: Command,
        outcomes: &[u32],
    ) -> Result<Vec<Event>, GameError> {
        let mut rng = RecordedRandomness::new(outcomes.iter().copied());
        TurnController::new(&mut self.state, &self.config, &self.registry, &mut rng)
            .handle(player, &command)
    }

    /// End every remaining phase of the current turn, discarding from the
    /// lowest slot when over the hand limit.
    pub fn finish_turn(&mut self) {
        let player = self.state.turn.current;
        while self.state.turn.current == player {
            let command = if self.state.turn.phase == Phase::End {
                let (slot, _, _) = self.state.zones.hand_cards(player).next().expect("cards to discard");
                Command::Discard { slot }
            } else {
                Command::EndPhase
            };
            self.handle(player, command).unwrap();
        }
    }
}

/// Play one turn through a session: dig with a ticket when possible,
/// otherwise pass, and discard down at the end.
pub fn play_simple_turn(session: &mut Session) {
    let player = session.state().turn.current;
    session.apply(player, Command::EndPhase).unwrap();

    let ticket = session.state().zones.hand_cards(player).next().map(|(slot, _, _)| slot);
    let dig = session
        .state()
        .board
        .pawns_of(player)
        .find_map(|pawn| {
            let targets = session.highlights(pawn.id).ok()?.diggable;
            targets.first().map(|&target| (pawn.id, target))
        });
    match (ticket, dig) {
        (Some(slot), Some((pawn, target))) => {
            session
                .apply(player, Command::Dig { pawn, target, ticket: Some(slot) })
                .unwrap();
        }
        _ => {
            session.apply(player, Command::EndPhase).unwrap();
        }
    }

    session.apply(player, Command::EndPhase).unwrap();
    while session.state().turn.current == player && session.result().is_none() {
        let (slot, _, _) = session.state().zones.hand_cards(player).next().expect("cards to discard");
        session.apply(player, Command::Discard { slot }).unwrap();
    }
}
