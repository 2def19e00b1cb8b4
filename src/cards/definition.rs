//! Card definitions - static card data.
//!
//! `CardName` is the closed set of cards in the game. `CardDefinition`
//! holds the unchanging properties of a name: suit, cost and flags.
//! Which physical copy sits where is tracked separately by
//! [`ZoneManager`](crate::zones::ZoneManager) through `CardId`s.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::resources::{ResourcePile, Suit};

/// Identifier for one physical card.
///
/// Two copies of "Earthquake" have different `CardId`s and the same
/// `CardName`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Every card in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardName {
    Teleportation,
    Excavation,
    Windfall,
    Earthquake,
    MasterBuilder,
    Fortify,
    Barricade,
    Meteor,
    Retribution,
    GoldRush,
    Jackpot,
}

impl CardName {
    /// Cards shuffled into the main deck.
    pub const MAIN: [CardName; 7] = [
        CardName::Teleportation,
        CardName::Excavation,
        CardName::Windfall,
        CardName::Earthquake,
        CardName::MasterBuilder,
        CardName::Fortify,
        CardName::Barricade,
    ];

    /// Cards only drawn by uncovering gold.
    pub const GOLD: [CardName; 4] = [
        CardName::Meteor,
        CardName::Retribution,
        CardName::GoldRush,
        CardName::Jackpot,
    ];

    /// Static definition of this card.
    #[must_use]
    pub fn definition(self) -> CardDefinition {
        let def = CardDefinition::new(self);
        match self {
            CardName::Teleportation => def.costing(Suit::Stone, 1),
            CardName::Excavation => def.costing(Suit::Dirt, 1),
            CardName::Windfall => def.costing(Suit::Grass, 1),
            CardName::Earthquake => def.costing(Suit::Stone, 2).disaster(),
            CardName::MasterBuilder => def.costing(Suit::Grass, 2).targeted(),
            CardName::Fortify => def.costing(Suit::Dirt, 2).persistent(),
            CardName::Barricade => def.costing(Suit::Stone, 3).persistent(),
            CardName::Meteor => def.costing(Suit::Gold, 1).disaster(),
            CardName::Retribution => def.costing(Suit::Gold, 1).persistent(),
            CardName::GoldRush => def.costing(Suit::Gold, 1),
            CardName::Jackpot => def.costing(Suit::Gold, 2),
        }
    }

    /// Gold cards live in their own deck and discard pile.
    #[must_use]
    pub fn is_gold(self) -> bool {
        Self::GOLD.contains(&self)
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardName::Teleportation => "Teleportation",
            CardName::Excavation => "Excavation",
            CardName::Windfall => "Windfall",
            CardName::Earthquake => "Earthquake",
            CardName::MasterBuilder => "Master Builder",
            CardName::Fortify => "Fortify",
            CardName::Barricade => "Barricade",
            CardName::Meteor => "Meteor",
            CardName::Retribution => "Retribution",
            CardName::GoldRush => "Gold Rush",
            CardName::Jackpot => "Jackpot",
        };
        f.write_str(name)
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use digging_game::cards::CardName;
/// use digging_game::resources::Suit;
///
/// let quake = CardName::Earthquake.definition();
/// assert_eq!(quake.suit, Suit::Stone);
/// assert_eq!(quake.cost.get(Suit::Stone), 2);
/// assert!(quake.disaster && quake.targets_building);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub name: CardName,
    /// Suit the card belongs to and is paid in.
    pub suit: Suit,
    pub cost: ResourcePile,
    /// Stays in play after activation until its effect triggers.
    pub persistent: bool,
    /// Damages a building.
    pub disaster: bool,
    /// Needs a target building when activated.
    pub targets_building: bool,
}

impl CardDefinition {
    fn new(name: CardName) -> Self {
        Self {
            name,
            suit: Suit::Grass,
            cost: ResourcePile::EMPTY,
            persistent: false,
            disaster: false,
            targets_building: false,
        }
    }

    fn costing(mut self, suit: Suit, amount: u32) -> Self {
        self.suit = suit;
        self.cost = ResourcePile::of(suit, amount);
        self
    }

    fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    fn disaster(mut self) -> Self {
        self.disaster = true;
        self.targeted()
    }

    fn targeted(mut self) -> Self {
        self.targets_building = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        assert_eq!(format!("{}", CardId::new(42)), "Card(42)");
    }

    #[test]
    fn test_decks_are_disjoint() {
        for name in CardName::MAIN {
            assert!(!name.is_gold());
        }
        for name in CardName::GOLD {
            assert!(name.is_gold());
            assert_eq!(name.definition().suit, Suit::Gold);
        }
    }

    #[test]
    fn test_definition_flags() {
        let fortify = CardName::Fortify.definition();
        assert!(fortify.persistent);
        assert!(!fortify.targets_building);

        let builder = CardName::MasterBuilder.definition();
        assert!(builder.targets_building);
        assert!(!builder.disaster);

        let meteor = CardName::Meteor.definition();
        assert!(meteor.disaster && meteor.targets_building);
    }

    #[test]
    fn test_definition_serialization() {
        let def = CardName::Barricade.definition();
        let json = serde_json::to_string(&def).unwrap();
        let deserialized: CardDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(def, deserialized);
    }
}
