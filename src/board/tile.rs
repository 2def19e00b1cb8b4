//! Tiles, positions and material layers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::building::BuildingId;
use super::grid::PawnId;
use crate::resources::Suit;

/// A tile position, 0-based from the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePos {
    pub row: u8,
    pub col: u8,
}

impl TilePos {
    #[must_use]
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Are the two positions 4-directionally adjacent?
    #[must_use]
    pub fn is_adjacent(self, other: TilePos) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The exposed material of a tile.
///
/// Digging walks `Grass -> Dirt -> Stone` and then reveals the tile's bottom
/// layer, which is either `Bedrock` or `Gold`. Both bottom layers are final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Grass,
    Dirt,
    Stone,
    Bedrock,
    Gold,
}

impl Layer {
    /// Depth below the surface, 0 for grass up to [`Layer::MAX_DEPTH`].
    #[must_use]
    pub const fn depth(self) -> u8 {
        match self {
            Layer::Grass => 0,
            Layer::Dirt => 1,
            Layer::Stone => 2,
            Layer::Bedrock | Layer::Gold => 3,
        }
    }

    pub const MAX_DEPTH: u8 = 3;

    /// Suit of the exposed material. Bedrock has none.
    #[must_use]
    pub const fn suit(self) -> Option<Suit> {
        match self {
            Layer::Grass => Some(Suit::Grass),
            Layer::Dirt => Some(Suit::Dirt),
            Layer::Stone => Some(Suit::Stone),
            Layer::Gold => Some(Suit::Gold),
            Layer::Bedrock => None,
        }
    }

    #[must_use]
    pub const fn is_bottom(self) -> bool {
        self.depth() == Self::MAX_DEPTH
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Grass => "grass",
            Layer::Dirt => "dirt",
            Layer::Stone => "stone",
            Layer::Bedrock => "bedrock",
            Layer::Gold => "gold",
        };
        f.write_str(name)
    }
}

/// Result of digging one layer off a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dug {
    /// Suit of the material that was removed.
    pub removed: Suit,
    /// Layer now exposed.
    pub revealed: Layer,
}

/// One board square.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub pos: TilePos,
    pub layer: Layer,
    /// Whether the bottom layer is gold rather than bedrock.
    pub gold_below: bool,
    pub pawn: Option<PawnId>,
    pub building: Option<BuildingId>,
}

impl Tile {
    #[must_use]
    pub fn new(pos: TilePos, gold_below: bool) -> Self {
        Self {
            pos,
            layer: Layer::Grass,
            gold_below,
            pawn: None,
            building: None,
        }
    }

    /// Layer that digging this tile would expose, or `None` at the bottom.
    #[must_use]
    pub fn next_layer(&self) -> Option<Layer> {
        match self.layer {
            Layer::Grass => Some(Layer::Dirt),
            Layer::Dirt => Some(Layer::Stone),
            Layer::Stone if self.gold_below => Some(Layer::Gold),
            Layer::Stone => Some(Layer::Bedrock),
            Layer::Bedrock | Layer::Gold => None,
        }
    }

    /// Remove the exposed layer. Returns `None` when already at the bottom.
    pub fn dig(&mut self) -> Option<Dug> {
        let removed = self.layer.suit()?;
        let revealed = self.next_layer()?;
        self.layer = revealed;
        Some(Dug { removed, revealed })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pawn.is_none() && self.building.is_none()
    }
}
