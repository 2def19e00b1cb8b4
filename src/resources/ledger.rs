//! Suits, resource piles and the per-player ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{PlayerId, PlayerMap};
use crate::error::{GameError, Result};

/// Material category: the resource kinds and the suits cards are paid in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Grass,
    Dirt,
    Stone,
    Gold,
}

impl Suit {
    /// All suits in pile order.
    pub const ALL: [Suit; 4] = [Suit::Grass, Suit::Dirt, Suit::Stone, Suit::Gold];

    /// Index into a pile's count array.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Suit::Grass => 0,
            Suit::Dirt => 1,
            Suit::Stone => 2,
            Suit::Gold => 3,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suit::Grass => "grass",
            Suit::Dirt => "dirt",
            Suit::Stone => "stone",
            Suit::Gold => "gold",
        };
        f.write_str(name)
    }
}

/// Counts of each resource kind. Counts are unsigned, so a pile can never
/// go negative; subtraction is only available through [`checked_sub`].
///
/// [`checked_sub`]: ResourcePile::checked_sub
///
/// ```
/// use digging_game::resources::{ResourcePile, Suit};
///
/// let pile = ResourcePile::new(2, 1, 0, 0);
/// let cost = ResourcePile::of(Suit::Grass, 2);
///
/// assert!(pile.covers(&cost));
/// assert_eq!(pile.checked_sub(&cost), Some(ResourcePile::new(0, 1, 0, 0)));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourcePile {
    counts: [u32; 4],
}

impl ResourcePile {
    /// An empty pile.
    pub const EMPTY: ResourcePile = ResourcePile { counts: [0; 4] };

    /// Create a pile from grass, dirt, stone and gold counts.
    #[must_use]
    pub const fn new(grass: u32, dirt: u32, stone: u32, gold: u32) -> Self {
        Self {
            counts: [grass, dirt, stone, gold],
        }
    }

    /// A pile holding `amount` of a single suit.
    #[must_use]
    pub fn of(suit: Suit, amount: u32) -> Self {
        let mut counts = [0; 4];
        counts[suit.index()] = amount;
        Self { counts }
    }

    /// Count of one suit.
    #[must_use]
    pub const fn get(&self, suit: Suit) -> u32 {
        self.counts[suit.index()]
    }

    /// Add `amount` of one suit.
    pub fn credit(&mut self, suit: Suit, amount: u32) {
        let slot = &mut self.counts[suit.index()];
        *slot = slot.saturating_add(amount);
    }

    /// Add another pile to this one.
    pub fn add(&mut self, other: &ResourcePile) {
        for suit in Suit::ALL {
            self.credit(suit, other.get(suit));
        }
    }

    /// Does this pile hold at least `cost` of every suit?
    #[must_use]
    pub fn covers(&self, cost: &ResourcePile) -> bool {
        Suit::ALL.iter().all(|&s| self.get(s) >= cost.get(s))
    }

    /// Subtract `cost`, or `None` if any suit would go negative.
    #[must_use]
    pub fn checked_sub(&self, cost: &ResourcePile) -> Option<ResourcePile> {
        let mut counts = [0; 4];
        for suit in Suit::ALL {
            counts[suit.index()] = self.get(suit).checked_sub(cost.get(suit))?;
        }
        Some(ResourcePile { counts })
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl fmt::Display for ResourcePile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("nothing");
        }
        let mut first = true;
        for suit in Suit::ALL {
            let count = self.get(suit);
            if count == 0 {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{count} {suit}")?;
            first = false;
        }
        Ok(())
    }
}

/// Resource piles for both players.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLedger {
    piles: PlayerMap<ResourcePile>,
}

impl ResourceLedger {
    /// Create a ledger where both players start with `starting`.
    #[must_use]
    pub fn new(starting: ResourcePile) -> Self {
        Self {
            piles: PlayerMap::with_value(starting),
        }
    }

    /// A player's current pile.
    #[must_use]
    pub fn pile(&self, player: PlayerId) -> &ResourcePile {
        &self.piles[player]
    }

    /// Credit `amount` of `suit` to a player.
    pub fn credit(&mut self, player: PlayerId, suit: Suit, amount: u32) {
        self.piles[player].credit(suit, amount);
    }

    /// Credit a whole pile to a player.
    pub fn credit_pile(&mut self, player: PlayerId, pile: &ResourcePile) {
        self.piles[player].add(pile);
    }

    /// Fail unless `player` can cover `cost`.
    pub fn ensure_affordable(&self, player: PlayerId, cost: &ResourcePile) -> Result<()> {
        let available = self.piles[player];
        if available.covers(cost) {
            Ok(())
        } else {
            Err(GameError::InsufficientResources {
                needed: *cost,
                available,
            })
        }
    }

    /// Deduct `cost` from a player's pile. All or nothing.
    pub fn pay(&mut self, player: PlayerId, cost: &ResourcePile) -> Result<()> {
        let available = self.piles[player];
        let remaining = available
            .checked_sub(cost)
            .ok_or(GameError::InsufficientResources {
                needed: *cost,
                available,
            })?;
        self.piles[player] = remaining;
        Ok(())
    }
}
