//! Resource accounting.
//!
//! ## Key Types
//!
//! - `Suit`: Grass, Dirt, Stone, Gold
//! - `ResourcePile`: Non-negative counts per suit
//! - `ResourceLedger`: One pile per player with all-or-nothing payment

pub mod ledger;

pub use ledger::{ResourceLedger, ResourcePile, Suit};
