//! Board state: the tile grid, pawns and buildings.
//!
//! ## Key Types
//!
//! - `TilePos`, `Tile`, `Layer`: Grid squares and their exposed material
//! - `Pawn`, `PawnId`: Player pieces
//! - `Building`, `BuildingKind`, `BuildingId`: Structures placed on tiles
//! - `BoardState`: Owns all of the above and answers legality queries

pub mod building;
pub mod grid;
pub mod tile;

pub use building::{Building, BuildingId, BuildingKind};
pub use grid::{BoardState, Neighbors, Pawn, PawnId};
pub use tile::{Dug, Layer, Tile, TilePos};
