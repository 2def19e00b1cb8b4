//! Zone system for card locations.
//!
//! ## Key Types
//!
//! - `Zone`: Where a card is (deck, discard, hand slot, in play)
//! - `DrawPile`: Main or gold draw pile
//! - `Drawn`: Outcome of a draw
//! - `ZoneManager`: Card location tracking and movement

pub mod manager;

pub use manager::{DrawPile, Drawn, Zone, ZoneManager};
