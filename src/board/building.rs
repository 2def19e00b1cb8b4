//! Buildings: kinds, health and identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::tile::TilePos;
use crate::core::PlayerId;
use crate::resources::Suit;

/// Unique identifier for a placed building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

impl fmt::Display for BuildingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Building({})", self.0)
    }
}

/// The six building types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuildingKind {
    /// Adds one card to the end-of-turn draw.
    Factory,
    /// Adds one card activation per turn.
    Burrow,
    GrassMine,
    DirtMine,
    StoneMine,
    GoldMine,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 6] = [
        BuildingKind::Factory,
        BuildingKind::Burrow,
        BuildingKind::GrassMine,
        BuildingKind::DirtMine,
        BuildingKind::StoneMine,
        BuildingKind::GoldMine,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            BuildingKind::Factory => 0,
            BuildingKind::Burrow => 1,
            BuildingKind::GrassMine => 2,
            BuildingKind::DirtMine => 3,
            BuildingKind::StoneMine => 4,
            BuildingKind::GoldMine => 5,
        }
    }

    /// The suit a mine produces and must be built on. `None` for
    /// Factory and Burrow.
    #[must_use]
    pub const fn mine_suit(self) -> Option<Suit> {
        match self {
            BuildingKind::GrassMine => Some(Suit::Grass),
            BuildingKind::DirtMine => Some(Suit::Dirt),
            BuildingKind::StoneMine => Some(Suit::Stone),
            BuildingKind::GoldMine => Some(Suit::Gold),
            BuildingKind::Factory | BuildingKind::Burrow => None,
        }
    }

    /// Can this kind stand on a tile exposing `suit`?
    #[must_use]
    pub fn fits(self, suit: Suit) -> bool {
        self.mine_suit().map_or(true, |s| s == suit)
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildingKind::Factory => "Factory",
            BuildingKind::Burrow => "Burrow",
            BuildingKind::GrassMine => "Grass Mine",
            BuildingKind::DirtMine => "Dirt Mine",
            BuildingKind::StoneMine => "Stone Mine",
            BuildingKind::GoldMine => "Gold Mine",
        };
        f.write_str(name)
    }
}

/// A building standing on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub owner: PlayerId,
    pub kind: BuildingKind,
    /// Remaining health. The building is removed when this reaches 0.
    pub health: u8,
    /// Suit of the tile the building was placed on.
    pub suit: Suit,
    pub pos: TilePos,
}

impl Building {
    /// Apply `amount` damage. Returns true if the building is destroyed.
    pub fn take_damage(&mut self, amount: u8) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health == 0
    }
}
