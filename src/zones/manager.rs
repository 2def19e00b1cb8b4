//! Zone manager for card locations and movement.
//!
//! The `ZoneManager` tracks where every physical card is and moves cards
//! between zones:
//! - Draw piles (main and gold) with random draws and reshuffle-on-empty
//! - Discard piles (main and gold)
//! - Per-player hand slots, each open or holding exactly one card
//! - Per-player in-play areas for persistent cards
//!
//! Cards are never created or destroyed after setup, so the total across
//! all zones is constant.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{CardId, CardName, CardRegistry};
use crate::core::{PlayerId, PlayerMap, Randomness};
use crate::error::{GameError, Illegal, Result};

/// Which draw pile to draw from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawPile {
    Main,
    Gold,
}

/// Where a card currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Discard,
    GoldDeck,
    GoldDiscard,
    /// A player's hand, at a slot index.
    Hand(PlayerId, usize),
    /// A player's persistent cards.
    InPlay(PlayerId),
}

/// Outcome of a draw that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Drawn {
    Placed {
        card: CardId,
        name: CardName,
        slot: usize,
    },
    /// No open hand slot; nothing was drawn.
    HandFull,
}

/// Manages card locations across zones.
///
/// ## Usage
///
/// ```
/// use digging_game::cards::CardRegistry;
/// use digging_game::core::{GameRng, PlayerId};
/// use digging_game::zones::{DrawPile, Drawn, ZoneManager};
///
/// let mut zones = ZoneManager::new(&CardRegistry::default(), 8);
/// let mut rng = GameRng::new(1);
///
/// let drawn = zones.draw(PlayerId::One, DrawPile::Main, &mut rng).unwrap();
/// assert!(matches!(drawn, Drawn::Placed { slot: 0, .. }));
/// assert_eq!(zones.hand_count(PlayerId::One), 1);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ZoneManager {
    names: FxHashMap<CardId, CardName>,
    locations: FxHashMap<CardId, Zone>,
    deck: Vec<CardId>,
    discard: Vec<CardId>,
    gold_deck: Vec<CardId>,
    gold_discard: Vec<CardId>,
    hands: PlayerMap<Vec<Option<CardId>>>,
    in_play: PlayerMap<Vec<CardId>>,
}

impl ZoneManager {
    /// Create both decks from the registry, with `hand_slots` open slots
    /// per player.
    #[must_use]
    pub fn new(registry: &CardRegistry, hand_slots: usize) -> Self {
        let mut zones = Self {
            names: FxHashMap::default(),
            locations: FxHashMap::default(),
            deck: Vec::new(),
            discard: Vec::new(),
            gold_deck: Vec::new(),
            gold_discard: Vec::new(),
            hands: PlayerMap::with_value(vec![None; hand_slots]),
            in_play: PlayerMap::with_default(),
        };

        let mut next_id = 0u32;
        for (pile, names) in [
            (DrawPile::Main, registry.main_deck()),
            (DrawPile::Gold, registry.gold_deck()),
        ] {
            for name in names {
                let id = CardId::new(next_id);
                next_id += 1;
                zones.names.insert(id, name);
                match pile {
                    DrawPile::Main => {
                        zones.deck.push(id);
                        zones.locations.insert(id, Zone::Deck);
                    }
                    DrawPile::Gold => {
                        zones.gold_deck.push(id);
                        zones.locations.insert(id, Zone::GoldDeck);
                    }
                }
            }
        }
        zones
    }

    // === Lookup ===

    /// Name of a physical card.
    #[must_use]
    pub fn name(&self, card: CardId) -> Option<CardName> {
        self.names.get(&card).copied()
    }

    /// Current zone of a card.
    #[must_use]
    pub fn zone(&self, card: CardId) -> Option<Zone> {
        self.locations.get(&card).copied()
    }

    /// Get total number of cards tracked.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.names.len()
    }

    /// Number of cards in a pile zone. Hand and in-play zones are counted
    /// per player.
    #[must_use]
    pub fn zone_size(&self, zone: Zone) -> usize {
        match zone {
            Zone::Deck => self.deck.len(),
            Zone::Discard => self.discard.len(),
            Zone::GoldDeck => self.gold_deck.len(),
            Zone::GoldDiscard => self.gold_discard.len(),
            Zone::Hand(player, _) => self.hand_count(player),
            Zone::InPlay(player) => self.in_play[player].len(),
        }
    }

    /// Cards counted zone by zone. Always equals [`total_cards`].
    ///
    /// [`total_cards`]: ZoneManager::total_cards
    #[must_use]
    pub fn counted_cards(&self) -> usize {
        self.deck.len()
            + self.discard.len()
            + self.gold_deck.len()
            + self.gold_discard.len()
            + PlayerId::all()
                .map(|p| self.hand_count(p) + self.in_play[p].len())
                .sum::<usize>()
    }

    /// Cards left in a draw pile, in draw-index order.
    pub fn draw_pile(&self, pile: DrawPile) -> impl Iterator<Item = CardName> + '_ {
        let cards = match pile {
            DrawPile::Main => &self.deck,
            DrawPile::Gold => &self.gold_deck,
        };
        cards.iter().filter_map(move |&c| self.name(c))
    }

    // === Hands ===

    /// A player's hand slots.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[Option<CardId>] {
        &self.hands[player]
    }

    /// Occupied slots as (slot, card, name).
    pub fn hand_cards(&self, player: PlayerId) -> impl Iterator<Item = (usize, CardId, CardName)> + '_ {
        self.hands[player]
            .iter()
            .enumerate()
            .filter_map(move |(slot, card)| {
                let card = (*card)?;
                Some((slot, card, self.name(card)?))
            })
    }

    #[must_use]
    pub fn hand_count(&self, player: PlayerId) -> usize {
        self.hands[player].iter().filter(|c| c.is_some()).count()
    }

    /// First open slot, by linear scan.
    #[must_use]
    pub fn open_slot(&self, player: PlayerId) -> Option<usize> {
        self.hands[player].iter().position(Option::is_none)
    }

    /// The card in a hand slot.
    pub fn card_in_slot(&self, player: PlayerId, slot: usize) -> Result<(CardId, CardName)> {
        let card = self.hands[player]
            .get(slot)
            .copied()
            .flatten()
            .ok_or(Illegal::EmptySlot)?;
        let name = self.name(card).ok_or(Illegal::EmptySlot)?;
        Ok((card, name))
    }

    // === Drawing ===

    /// Draw a random card from `pile` into the first open slot.
    ///
    /// An empty pile is refilled from its discard pile first. Fails with
    /// `NoCardsRemain` if both are empty. With no open slot nothing is
    /// drawn and no randomness is consumed.
    pub fn draw<R: Randomness + ?Sized>(
        &mut self,
        player: PlayerId,
        pile: DrawPile,
        rng: &mut R,
    ) -> Result<Drawn> {
        let Some(slot) = self.open_slot(player) else {
            return Ok(Drawn::HandFull);
        };

        let (deck, discard, deck_zone) = match pile {
            DrawPile::Main => (&mut self.deck, &mut self.discard, Zone::Deck),
            DrawPile::Gold => (&mut self.gold_deck, &mut self.gold_discard, Zone::GoldDeck),
        };
        // Pick before refilling so a failed pick leaves the piles as they were.
        let refill = deck.is_empty();
        let available = if refill { discard.len() } else { deck.len() };
        if available == 0 {
            return Err(GameError::NoCardsRemain);
        }
        let index = rng.pick(available)?;
        if refill {
            deck.append(discard);
            for card in deck.iter() {
                self.locations.insert(*card, deck_zone);
            }
        }

        let card = deck.remove(index);
        self.hands[player][slot] = Some(card);
        self.locations.insert(card, Zone::Hand(player, slot));
        let name = self.name(card).ok_or(GameError::NoCardsRemain)?;
        Ok(Drawn::Placed { card, name, slot })
    }

    // === Moving out of hand ===

    fn take_from_slot(&mut self, player: PlayerId, slot: usize) -> Result<(CardId, CardName)> {
        let found = self.card_in_slot(player, slot)?;
        self.hands[player][slot] = None;
        Ok(found)
    }

    fn to_discard(&mut self, card: CardId, name: CardName) {
        if name.is_gold() {
            self.gold_discard.push(card);
            self.locations.insert(card, Zone::GoldDiscard);
        } else {
            self.discard.push(card);
            self.locations.insert(card, Zone::Discard);
        }
    }

    /// Discard the card in a hand slot, leaving the slot open.
    pub fn discard_from_hand(&mut self, player: PlayerId, slot: usize) -> Result<CardName> {
        let (card, name) = self.take_from_slot(player, slot)?;
        self.to_discard(card, name);
        Ok(name)
    }

    /// Move the card in a hand slot into the player's in-play area.
    pub fn put_in_play(&mut self, player: PlayerId, slot: usize) -> Result<CardName> {
        let (card, name) = self.take_from_slot(player, slot)?;
        self.in_play[player].push(card);
        self.locations.insert(card, Zone::InPlay(player));
        Ok(name)
    }

    // === In play ===

    /// Names of a player's persistent cards, in the order they were played.
    #[must_use]
    pub fn in_play(&self, player: PlayerId) -> Vec<CardName> {
        self.in_play[player].iter().filter_map(|&c| self.name(c)).collect()
    }

    #[must_use]
    pub fn has_in_play(&self, player: PlayerId, name: CardName) -> bool {
        self.in_play[player].iter().any(|&c| self.name(c) == Some(name))
    }

    /// Discard the oldest in-play copy of `name`. Returns false if the
    /// player has none.
    pub fn consume_in_play(&mut self, player: PlayerId, name: CardName) -> bool {
        let Some(index) = self.in_play[player].iter().position(|&c| self.name(c) == Some(name)) else {
            return false;
        };
        let card = self.in_play[player].remove(index);
        self.to_discard(card, name);
        true
    }
}
