//! Rules configuration.
//!
//! Every tunable number of the game lives in `RulesConfig`: board size,
//! scoring, hand sizes, draw and activation allowances, damage dice and
//! building costs. All fields have defaults, so a JSON file only needs to
//! name what it changes.
//!
//! ```
//! use digging_game::core::RulesConfig;
//!
//! let config = RulesConfig::from_json_str(r#"{ "winning_score": 10 }"#).unwrap();
//! assert_eq!(config.winning_score, 10);
//! assert_eq!(config.board_rows, 7);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::board::BuildingKind;
use crate::error::ConfigError;
use crate::resources::ResourcePile;

/// Cost of each building kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildCosts {
    pub factory: ResourcePile,
    pub burrow: ResourcePile,
    pub grass_mine: ResourcePile,
    pub dirt_mine: ResourcePile,
    pub stone_mine: ResourcePile,
    pub gold_mine: ResourcePile,
}

impl BuildCosts {
    /// Cost of one building kind.
    #[must_use]
    pub fn get(&self, kind: BuildingKind) -> &ResourcePile {
        match kind {
            BuildingKind::Factory => &self.factory,
            BuildingKind::Burrow => &self.burrow,
            BuildingKind::GrassMine => &self.grass_mine,
            BuildingKind::DirtMine => &self.dirt_mine,
            BuildingKind::StoneMine => &self.stone_mine,
            BuildingKind::GoldMine => &self.gold_mine,
        }
    }
}

impl Default for BuildCosts {
    fn default() -> Self {
        Self {
            factory: ResourcePile::new(1, 1, 1, 0),
            burrow: ResourcePile::new(2, 1, 0, 0),
            grass_mine: ResourcePile::new(2, 0, 0, 0),
            dirt_mine: ResourcePile::new(1, 1, 0, 0),
            stone_mine: ResourcePile::new(0, 1, 1, 0),
            gold_mine: ResourcePile::new(0, 0, 2, 0),
        }
    }
}

/// Pawn ids are a single byte shared by both players.
pub const MAX_PAWNS_PER_PLAYER: u8 = 128;

/// Complete rules configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub board_rows: u8,
    pub board_cols: u8,
    pub pawns_per_player: u8,
    /// Number of tiles hiding gold instead of bedrock.
    pub gold_tiles: u8,

    /// Score that ends the game.
    pub winning_score: u32,
    pub build_points: u32,
    pub gold_reveal_points: u32,

    /// Physical hand slots per player.
    pub hand_slots: usize,
    /// Cards a player may keep when their turn ends.
    pub hand_limit: usize,
    pub starting_hand: usize,
    /// Cards drawn at end of turn before Factory bonuses.
    pub base_draw: u32,
    /// Card activations per turn before Burrow bonuses.
    pub base_activations: u32,

    pub max_building_health: u8,
    pub damage_die_sides: u32,
    pub massive_damage: u8,
    /// Resources each mine yields at the start of its owner's turn.
    pub mine_yield: u32,

    pub starting_resources: ResourcePile,
    pub build_costs: BuildCosts,

    pub main_card_copies: u8,
    pub gold_card_copies: u8,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            board_rows: 7,
            board_cols: 7,
            pawns_per_player: 2,
            gold_tiles: 6,
            winning_score: 18,
            build_points: 1,
            gold_reveal_points: 1,
            hand_slots: 8,
            hand_limit: 5,
            starting_hand: 4,
            base_draw: 1,
            base_activations: 1,
            max_building_health: 2,
            damage_die_sides: 6,
            massive_damage: 3,
            mine_yield: 1,
            starting_resources: ResourcePile::EMPTY,
            build_costs: BuildCosts::default(),
            main_card_copies: 4,
            gold_card_copies: 3,
        }
    }
}

impl RulesConfig {
    /// Parse a configuration from JSON and clamp inconsistent values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RulesConfig = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Clamp values the engine cannot honour, logging each adjustment.
    ///
    /// Bad values degrade to something playable rather than failing.
    #[must_use]
    pub fn validated(mut self) -> Self {
        if self.board_rows < 3 || self.board_cols < 3 {
            warn!(rows = self.board_rows, cols = self.board_cols, "board too small, using 3x3 minimum");
            self.board_rows = self.board_rows.max(3);
            self.board_cols = self.board_cols.max(3);
        }
        let max_pawns = self.board_cols.min(MAX_PAWNS_PER_PLAYER);
        if self.pawns_per_player == 0 || self.pawns_per_player > max_pawns {
            let clamped = self.pawns_per_player.clamp(1, max_pawns);
            warn!(requested = self.pawns_per_player, clamped, "pawns_per_player out of range");
            self.pawns_per_player = clamped;
        }
        let tiles = u16::from(self.board_rows) * u16::from(self.board_cols);
        if u16::from(self.gold_tiles) > tiles {
            warn!(requested = self.gold_tiles, tiles, "more gold tiles than board tiles");
            self.gold_tiles = u8::try_from(tiles).unwrap_or(u8::MAX);
        }
        if self.hand_slots == 0 {
            warn!("hand_slots must be positive, using 1");
            self.hand_slots = 1;
        }
        if self.hand_limit > self.hand_slots {
            warn!(limit = self.hand_limit, slots = self.hand_slots, "hand_limit exceeds hand_slots");
            self.hand_limit = self.hand_slots;
        }
        if self.starting_hand > self.hand_slots {
            warn!(starting = self.starting_hand, slots = self.hand_slots, "starting_hand exceeds hand_slots");
            self.starting_hand = self.hand_slots;
        }
        if self.max_building_health == 0 {
            warn!("max_building_health must be positive, using 1");
            self.max_building_health = 1;
        }
        if self.damage_die_sides < 2 {
            warn!(sides = self.damage_die_sides, "damage die needs at least 2 sides");
            self.damage_die_sides = 2;
        }
        if self.winning_score == 0 {
            warn!("winning_score of 0 would end the game immediately, using 1");
            self.winning_score = 1;
        }
        self
    }

    /// Damage dealt by a die roll: the low half deals 1, the top face deals
    /// massive damage, anything else deals 2.
    #[must_use]
    pub fn damage_for_roll(&self, roll: u32) -> u8 {
        if roll >= self.damage_die_sides {
            self.massive_damage
        } else if roll <= self.damage_die_sides / 2 {
            1
        } else {
            2
        }
    }
}
