//! The board: tiles, pawns and buildings.
//!
//! `BoardState` owns every tile. Pawns and buildings record the position
//! of the tile they stand on, and each tile records which pawn and which
//! building (if any) stand on it. The two sides are kept in sync by the
//! mutation methods here; nothing else writes them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::building::{Building, BuildingId, BuildingKind};
use super::tile::{Dug, Tile, TilePos};
use crate::core::{GameRng, PlayerId, RulesConfig};
use crate::error::{Illegal, Result};

/// Identifier for a pawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PawnId(pub u8);

/// A player's pawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pawn {
    pub id: PawnId,
    pub owner: PlayerId,
    pub pos: TilePos,
}

/// Neighbour list; a tile has at most four.
pub type Neighbors = SmallVec<[TilePos; 4]>;

/// Grid of tiles with pawn and building occupancy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoardState {
    rows: u8,
    cols: u8,
    tiles: Vec<Tile>,
    pawns: Vec<Pawn>,
    buildings: FxHashMap<BuildingId, Building>,
    next_building_id: u32,
}

impl BoardState {
    /// Create an all-grass board with no pawns.
    ///
    /// `gold` lists the tiles whose bottom layer is gold.
    #[must_use]
    pub fn empty(rows: u8, cols: u8, gold: &[TilePos]) -> Self {
        let mut tiles = Vec::with_capacity(usize::from(rows) * usize::from(cols));
        for row in 0..rows {
            for col in 0..cols {
                let pos = TilePos::new(row, col);
                tiles.push(Tile::new(pos, gold.contains(&pos)));
            }
        }
        Self {
            rows,
            cols,
            tiles,
            pawns: Vec::new(),
            buildings: FxHashMap::default(),
            next_building_id: 0,
        }
    }

    /// Set up the starting board.
    ///
    /// Gold is hidden under `gold_tiles` tiles picked by `rng`. Player One's
    /// pawns start on the top row, Player Two's on the bottom row, spread
    /// evenly across the columns.
    #[must_use]
    pub fn setup(config: &RulesConfig, rng: &mut GameRng) -> Self {
        let mut positions: Vec<TilePos> = (0..config.board_rows)
            .flat_map(|row| (0..config.board_cols).map(move |col| TilePos::new(row, col)))
            .collect();
        rng.shuffle(&mut positions);
        positions.truncate(usize::from(config.gold_tiles));

        let mut board = Self::empty(config.board_rows, config.board_cols, &positions);

        let count = usize::from(config.pawns_per_player);
        let cols = usize::from(config.board_cols);
        let spacing = cols / (count + 1);
        for player in PlayerId::all() {
            let row = match player {
                PlayerId::One => 0,
                PlayerId::Two => config.board_rows.saturating_sub(1),
            };
            for i in 0..count {
                let col = (spacing * (i + 1)).min(cols.saturating_sub(1));
                // Spacing may collapse to 0 on narrow boards, so walk right
                // to the next free column.
                let mut pos = TilePos::new(row, u8::try_from(col).unwrap_or(u8::MAX));
                while board.tile(pos).is_some_and(|t| t.pawn.is_some()) && pos.col + 1 < config.board_cols {
                    pos.col += 1;
                }
                board.add_pawn(player, pos);
            }
        }
        board
    }

    #[must_use]
    pub fn rows(&self) -> u8 {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> u8 {
        self.cols
    }

    #[must_use]
    pub fn in_bounds(&self, pos: TilePos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: TilePos) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| usize::from(pos.row) * usize::from(self.cols) + usize::from(pos.col))
    }

    #[must_use]
    pub fn tile(&self, pos: TilePos) -> Option<&Tile> {
        self.index(pos).map(|i| &self.tiles[i])
    }

    fn tile_mut(&mut self, pos: TilePos) -> Option<&mut Tile> {
        self.index(pos).map(move |i| &mut self.tiles[i])
    }

    /// Look up a tile or report it as off the board.
    pub fn require_tile(&self, pos: TilePos) -> Result<&Tile> {
        self.tile(pos).ok_or_else(|| Illegal::OffBoard.into())
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// 4-directional neighbours inside the board.
    #[must_use]
    pub fn neighbors(&self, pos: TilePos) -> Neighbors {
        let mut out = Neighbors::new();
        if pos.row > 0 {
            out.push(TilePos::new(pos.row - 1, pos.col));
        }
        if pos.col > 0 {
            out.push(TilePos::new(pos.row, pos.col - 1));
        }
        let down = TilePos::new(pos.row + 1, pos.col);
        if self.in_bounds(down) {
            out.push(down);
        }
        let right = TilePos::new(pos.row, pos.col + 1);
        if self.in_bounds(right) {
            out.push(right);
        }
        out
    }

    // === Pawns ===

    /// Place a new pawn. Returns its id.
    pub fn add_pawn(&mut self, owner: PlayerId, pos: TilePos) -> PawnId {
        let id = PawnId(u8::try_from(self.pawns.len()).unwrap_or(u8::MAX));
        self.pawns.push(Pawn { id, owner, pos });
        if let Some(tile) = self.tile_mut(pos) {
            tile.pawn = Some(id);
        }
        id
    }

    #[must_use]
    pub fn pawn(&self, id: PawnId) -> Option<&Pawn> {
        self.pawns.get(usize::from(id.0))
    }

    pub fn pawns(&self) -> impl Iterator<Item = &Pawn> {
        self.pawns.iter()
    }

    pub fn pawns_of(&self, player: PlayerId) -> impl Iterator<Item = &Pawn> {
        self.pawns.iter().filter(move |p| p.owner == player)
    }

    /// Look up a pawn and check that `player` owns it.
    pub fn owned_pawn(&self, player: PlayerId, id: PawnId) -> Result<Pawn> {
        let pawn = *self.pawn(id).ok_or(Illegal::UnknownPawn)?;
        if pawn.owner != player {
            return Err(Illegal::NotYourPawn.into());
        }
        Ok(pawn)
    }

    /// Move a pawn. Callers validate legality first.
    pub fn relocate_pawn(&mut self, id: PawnId, to: TilePos) {
        let Some(from) = self.pawn(id).map(|p| p.pos) else {
            return;
        };
        if let Some(tile) = self.tile_mut(from) {
            tile.pawn = None;
        }
        if let Some(tile) = self.tile_mut(to) {
            tile.pawn = Some(id);
        }
        if let Some(pawn) = self.pawns.get_mut(usize::from(id.0)) {
            pawn.pos = to;
        }
    }

    // === Digging ===

    /// Dig one layer off a tile. Callers validate legality first.
    pub fn dig(&mut self, pos: TilePos) -> Option<Dug> {
        self.tile_mut(pos)?.dig()
    }

    // === Buildings ===

    #[must_use]
    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(&id)
    }

    pub fn building_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.get_mut(&id)
    }

    /// Look up a building or report it as unknown.
    pub fn require_building(&self, id: BuildingId) -> Result<&Building> {
        self.building(id).ok_or_else(|| Illegal::UnknownBuilding.into())
    }

    /// All buildings, ordered by id.
    #[must_use]
    pub fn buildings(&self) -> Vec<&Building> {
        let mut all: Vec<_> = self.buildings.values().collect();
        all.sort_by_key(|b| b.id);
        all
    }

    /// A player's buildings, ordered by id.
    #[must_use]
    pub fn buildings_of(&self, player: PlayerId) -> Vec<&Building> {
        let mut owned: Vec<_> = self.buildings.values().filter(|b| b.owner == player).collect();
        owned.sort_by_key(|b| b.id);
        owned
    }

    /// Place a building at full health. Callers validate legality first.
    ///
    /// Returns `None` if the tile is off the board or has no suit.
    pub fn place_building(
        &mut self,
        owner: PlayerId,
        kind: BuildingKind,
        pos: TilePos,
        health: u8,
    ) -> Option<BuildingId> {
        let suit = self.tile(pos)?.layer.suit()?;
        let id = BuildingId(self.next_building_id);
        self.next_building_id += 1;
        self.buildings.insert(
            id,
            Building {
                id,
                owner,
                kind,
                health,
                suit,
                pos,
            },
        );
        if let Some(tile) = self.tile_mut(pos) {
            tile.building = Some(id);
        }
        Some(id)
    }

    /// Remove a building from the board and return it.
    pub fn remove_building(&mut self, id: BuildingId) -> Option<Building> {
        let building = self.buildings.remove(&id)?;
        if let Some(tile) = self.tile_mut(building.pos) {
            tile.building = None;
        }
        Some(building)
    }

    // === Legal targets ===

    /// Tiles a pawn may move to. `teleport` lifts the adjacency requirement.
    #[must_use]
    pub fn move_targets(&self, pawn: &Pawn, teleport: bool) -> Vec<TilePos> {
        if teleport {
            self.tiles
                .iter()
                .filter(|t| t.pawn.is_none())
                .map(|t| t.pos)
                .collect()
        } else {
            self.neighbors(pawn.pos)
                .into_iter()
                .filter(|&pos| self.tile(pos).is_some_and(|t| t.pawn.is_none()))
                .collect()
        }
    }

    /// Tiles a pawn may dig: adjacent, empty and not at the bottom.
    #[must_use]
    pub fn dig_targets(&self, pawn: &Pawn) -> Vec<TilePos> {
        self.neighbors(pawn.pos)
            .into_iter()
            .filter(|&pos| self.check_dig(pawn, pos).is_ok())
            .collect()
    }

    /// Tiles where a pawn may place a building of `kind`, ignoring cost.
    #[must_use]
    pub fn build_targets(&self, pawn: &Pawn, kind: BuildingKind) -> Vec<TilePos> {
        self.neighbors(pawn.pos)
            .into_iter()
            .filter(|&pos| self.check_build(pawn, pos, kind).is_ok())
            .collect()
    }

    /// Validate a move without applying it.
    pub fn check_move(&self, pawn: &Pawn, to: TilePos, teleport: bool) -> Result<()> {
        let tile = self.require_tile(to)?;
        if !teleport && !pawn.pos.is_adjacent(to) {
            return Err(Illegal::NotAdjacent.into());
        }
        if tile.pawn.is_some() {
            return Err(Illegal::Occupied.into());
        }
        Ok(())
    }

    /// Validate a dig without applying it.
    pub fn check_dig(&self, pawn: &Pawn, target: TilePos) -> Result<()> {
        let tile = self.require_tile(target)?;
        if !pawn.pos.is_adjacent(target) {
            return Err(Illegal::NotAdjacent.into());
        }
        if !tile.is_empty() {
            return Err(Illegal::Occupied.into());
        }
        if tile.next_layer().is_none() {
            return Err(Illegal::MaxDepth.into());
        }
        Ok(())
    }

    /// Validate a building placement without applying it.
    ///
    /// The target and every neighbour must be free of buildings and of
    /// pawns, except the building pawn itself.
    pub fn check_build(&self, pawn: &Pawn, target: TilePos, kind: BuildingKind) -> Result<()> {
        let tile = self.require_tile(target)?;
        if !pawn.pos.is_adjacent(target) {
            return Err(Illegal::NotAdjacent.into());
        }
        if !tile.is_empty() {
            return Err(Illegal::Occupied.into());
        }
        let crowded = self.neighbors(target).into_iter().any(|pos| {
            self.tile(pos).is_some_and(|t| {
                t.building.is_some() || t.pawn.is_some_and(|p| p != pawn.id)
            })
        });
        if crowded {
            return Err(Illegal::Crowded.into());
        }
        match tile.layer.suit() {
            Some(suit) if kind.fits(suit) => Ok(()),
            _ => Err(Illegal::WrongLayer.into()),
        }
    }
}
