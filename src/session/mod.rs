//! A running game: configuration, state, randomness and the action log.
//!
//! The authoritative session rolls its own dice and records every outcome
//! into the `ActionRecord` it logs. A peer builds a session from the same
//! seed and configuration and feeds it those records through
//! [`Session::apply_record`], which replays the recorded outcomes instead
//! of rolling.
//!
//! ## Example
//!
//! ```
//! use digging_game::core::{Command, PlayerId};
//! use digging_game::session::Session;
//!
//! let mut host = Session::builder().seed(7).build();
//! let mut peer = Session::builder().seed(7).build();
//!
//! host.apply(PlayerId::One, Command::EndPhase).unwrap();
//! let record = host.log().back().unwrap().clone();
//! peer.apply_record(&record).unwrap();
//!
//! assert_eq!(host.view(), peer.view());
//! ```

mod view;

pub use view::{Highlights, PlayerView, SessionView};

use im::Vector;
use tracing::{debug, info, warn};

use crate::board::PawnId;
use crate::cards::CardRegistry;
use crate::core::{
    ActionRecord, Command, Event, GameRng, GameState, PlayerId, Randomness, RecordedRandomness,
    RecordingRandomness, RulesConfig,
};
use crate::error::{GameError, Illegal, LogError, Result};
use crate::rules::{GameResult, TurnController};
use crate::zones::{DrawPile, Drawn};

/// Builder for creating a [`Session`].
#[derive(Clone, Debug, Default)]
pub struct SessionBuilder {
    config: RulesConfig,
    seed: u64,
}

impl SessionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: RulesConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn build(self) -> Session {
        Session::new(self.config, self.seed)
    }
}

/// One game between two players.
#[derive(Clone, Debug)]
pub struct Session {
    config: RulesConfig,
    registry: CardRegistry,
    state: GameState,
    rng: GameRng,
    log: Vector<ActionRecord>,
    seed: u64,
}

impl Session {
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Start a game: lay out the board and deal the starting hands.
    ///
    /// Board layout and the opening deal come from `seed`, so two sessions
    /// built from the same seed and configuration start identical.
    #[must_use]
    pub fn new(config: RulesConfig, seed: u64) -> Self {
        let config = config.validated();
        let registry = CardRegistry::from_config(&config);
        let root = GameRng::new(seed);
        let state = GameState::new(&config, &registry, &mut root.for_context("board"));
        let mut session = Self {
            config,
            registry,
            state,
            rng: root.for_context("play"),
            log: Vector::new(),
            seed,
        };
        session.deal();
        info!(seed, "game started");
        session
    }

    fn deal(&mut self) {
        for player in PlayerId::all() {
            for _ in 0..self.config.starting_hand {
                match self.state.zones.draw(player, DrawPile::Main, &mut self.rng) {
                    Ok(Drawn::Placed { .. }) => {}
                    Ok(Drawn::HandFull) => break,
                    Err(err) => {
                        warn!(%player, %err, "starting hand short");
                        break;
                    }
                }
            }
        }
    }

    /// Discard this game and start a new one with the same configuration.
    pub fn new_game(&mut self, seed: u64) {
        *self = Self::new(self.config.clone(), seed);
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &CardRegistry {
        &self.registry
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Every command applied so far, in order.
    #[must_use]
    pub fn log(&self) -> &Vector<ActionRecord> {
        &self.log
    }

    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.state.result(&self.config)
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView::capture(&self.state, &self.config)
    }

    /// Tiles a pawn could move to, dig and build on right now.
    pub fn highlights(&self, pawn: PawnId) -> Result<Highlights> {
        Highlights::for_pawn(&self.state, &self.config, pawn).ok_or_else(|| Illegal::UnknownPawn.into())
    }

    // === Commands ===

    /// Apply a command as the authoritative side, rolling any randomness
    /// it needs and logging the result.
    pub fn apply(&mut self, player: PlayerId, command: Command) -> Result<Vec<Event>> {
        self.ensure_running()?;
        let turn = self.state.turn.turn_number;
        let mut outcomes = Vec::new();
        let events = {
            let mut rng = RecordingRandomness::new(&mut self.rng, &mut outcomes);
            resolve(&mut self.state, &self.config, &self.registry, player, &command, &mut rng)?
        };
        self.record(ActionRecord {
            player,
            command,
            outcomes,
            turn,
            sequence: self.next_sequence(),
        });
        Ok(events)
    }

    /// Apply a record produced by the authoritative side.
    ///
    /// Fails with `ReplayDesync` if the record is out of order or its
    /// outcomes do not fit the command. A desync leaves this session
    /// unusable.
    pub fn apply_record(&mut self, record: &ActionRecord) -> Result<Vec<Event>> {
        self.ensure_running()?;
        if record.sequence != self.next_sequence() {
            return Err(GameError::ReplayDesync);
        }
        let mut rng = RecordedRandomness::new(record.outcomes.iter().copied());
        let events = resolve(
            &mut self.state,
            &self.config,
            &self.registry,
            record.player,
            &record.command,
            &mut rng,
        )?;
        if rng.remaining() != 0 {
            warn!(sequence = record.sequence, unused = rng.remaining(), "replay left outcomes unused");
            return Err(GameError::ReplayDesync);
        }
        self.record(record.clone());
        Ok(events)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.result().is_some() {
            return Err(GameError::GameOver);
        }
        Ok(())
    }

    fn next_sequence(&self) -> u32 {
        u32::try_from(self.log.len()).unwrap_or(u32::MAX)
    }

    fn record(&mut self, record: ActionRecord) {
        debug!(
            player = %record.player,
            command = ?record.command,
            outcomes = ?record.outcomes,
            sequence = record.sequence,
            "command applied"
        );
        self.log.push_back(record);
        if let Some(result) = self.result() {
            info!(?result, "game over");
        }
    }

    // === Log encoding ===

    /// Encode the action log to bytes.
    pub fn encode_log(&self) -> std::result::Result<Vec<u8>, LogError> {
        let records: Vec<&ActionRecord> = self.log.iter().collect();
        Ok(bincode::serialize(&records)?)
    }

    /// Decode bytes produced by [`Session::encode_log`].
    pub fn decode_log(bytes: &[u8]) -> std::result::Result<Vec<ActionRecord>, LogError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Rebuild a session by replaying a log from the start.
    pub fn replay<'r>(
        config: RulesConfig,
        seed: u64,
        records: impl IntoIterator<Item = &'r ActionRecord>,
    ) -> Result<Self> {
        let mut session = Self::new(config, seed);
        for record in records {
            session.apply_record(record)?;
        }
        Ok(session)
    }
}

fn resolve<R: Randomness + ?Sized>(
    state: &mut GameState,
    config: &RulesConfig,
    registry: &CardRegistry,
    player: PlayerId,
    command: &Command,
    rng: &mut R,
) -> Result<Vec<Event>> {
    let result = TurnController::new(state, config, registry, rng).handle(player, command);
    if let Err(err) = &result {
        warn!(%player, ?command, %err, "command rejected");
    }
    result
}
