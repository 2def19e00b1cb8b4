//! Per-player statistics and scores.

use serde::{Deserialize, Serialize};

use crate::board::BuildingKind;
use crate::core::{PlayerId, PlayerMap};
use crate::resources::Suit;

/// Statistics for one player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub score: u32,
    /// Tiles dug, indexed by the suit removed.
    pub tiles_dug: [u32; 4],
    /// Buildings currently standing, indexed by kind.
    pub built: [u32; 6],
    pub buildings_destroyed: u32,
    pub buildings_lost: u32,
    pub repairs: u32,
    pub cards_activated: u32,
    pub damage_dealt: u32,
}

impl Stats {
    #[must_use]
    pub fn built_count(&self, kind: BuildingKind) -> u32 {
        self.built[kind.index()]
    }

    #[must_use]
    pub fn dug_count(&self, suit: Suit) -> u32 {
        self.tiles_dug[suit.index()]
    }
}

/// Scores and statistics for both players.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    stats: PlayerMap<Stats>,
}

impl ScoreTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stats(&self, player: PlayerId) -> &Stats {
        &self.stats[player]
    }

    pub fn stats_mut(&mut self, player: PlayerId) -> &mut Stats {
        &mut self.stats[player]
    }

    #[must_use]
    pub fn score(&self, player: PlayerId) -> u32 {
        self.stats[player].score
    }

    /// Add points and return the new score.
    pub fn award(&mut self, player: PlayerId, points: u32) -> u32 {
        let stats = &mut self.stats[player];
        stats.score = stats.score.saturating_add(points);
        stats.score
    }

    pub fn record_dig(&mut self, player: PlayerId, suit: Suit) {
        self.stats[player].tiles_dug[suit.index()] += 1;
    }

    pub fn record_built(&mut self, player: PlayerId, kind: BuildingKind) {
        self.stats[player].built[kind.index()] += 1;
    }

    /// Book a destroyed building against its owner and the player who
    /// destroyed it.
    pub fn record_destroyed(&mut self, owner: PlayerId, kind: BuildingKind, by: PlayerId) {
        let lost = &mut self.stats[owner];
        lost.built[kind.index()] = lost.built[kind.index()].saturating_sub(1);
        lost.buildings_lost += 1;
        self.stats[by].buildings_destroyed += 1;
    }

    #[must_use]
    pub fn built_count(&self, player: PlayerId, kind: BuildingKind) -> u32 {
        self.stats[player].built_count(kind)
    }

    /// Zero every statistic for a new game.
    pub fn reset(&mut self) {
        self.stats = PlayerMap::with_default();
    }
}
