//! Card system: definitions and registry.
//!
//! ## Key Types
//!
//! - `CardName`: The closed set of cards
//! - `CardId`: One physical copy of a card
//! - `CardDefinition`: Static card data (suit, cost, flags)
//! - `CardRegistry`: Definition lookup and deck composition
//!
//! Card locations (deck, hand slots, discard, in play) are tracked by
//! [`zones`](crate::zones).

pub mod definition;
pub mod registry;

pub use definition::{CardDefinition, CardId, CardName};
pub use registry::CardRegistry;
