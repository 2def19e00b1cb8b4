//! Card registry for definition lookup and deck composition.

use rustc_hash::FxHashMap;

use super::definition::{CardDefinition, CardName};
use crate::core::RulesConfig;

/// Registry of card definitions and how many copies of each go in a deck.
///
/// ## Example
///
/// ```
/// use digging_game::cards::{CardName, CardRegistry};
/// use digging_game::core::RulesConfig;
///
/// let registry = CardRegistry::from_config(&RulesConfig::default());
///
/// assert_eq!(registry.get(CardName::Fortify).name, CardName::Fortify);
/// assert_eq!(registry.main_deck().len(), 28);
/// assert_eq!(registry.gold_deck().len(), 12);
/// ```
#[derive(Clone, Debug)]
pub struct CardRegistry {
    cards: FxHashMap<CardName, CardDefinition>,
    main_copies: u8,
    gold_copies: u8,
}

impl CardRegistry {
    /// Registry with every card and the given copy counts.
    #[must_use]
    pub fn new(main_copies: u8, gold_copies: u8) -> Self {
        let cards = CardName::MAIN
            .iter()
            .chain(CardName::GOLD.iter())
            .map(|&name| (name, name.definition()))
            .collect();
        Self {
            cards,
            main_copies,
            gold_copies,
        }
    }

    #[must_use]
    pub fn from_config(config: &RulesConfig) -> Self {
        Self::new(config.main_card_copies, config.gold_card_copies)
    }

    /// Get a card definition.
    #[must_use]
    pub fn get(&self, name: CardName) -> CardDefinition {
        self.cards.get(&name).copied().unwrap_or_else(|| name.definition())
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// Find persistent cards.
    pub fn persistent(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values().filter(|c| c.persistent)
    }

    /// Contents of a fresh main deck, in catalogue order.
    #[must_use]
    pub fn main_deck(&self) -> Vec<CardName> {
        Self::copies(&CardName::MAIN, self.main_copies)
    }

    /// Contents of a fresh gold deck, in catalogue order.
    #[must_use]
    pub fn gold_deck(&self) -> Vec<CardName> {
        Self::copies(&CardName::GOLD, self.gold_copies)
    }

    fn copies(names: &[CardName], copies: u8) -> Vec<CardName> {
        names
            .iter()
            .flat_map(|&name| std::iter::repeat(name).take(usize::from(copies)))
            .collect()
    }
}

impl Default for CardRegistry {
    fn default() -> Self {
        Self::from_config(&RulesConfig::default())
    }
}
