//! Tile occupancy grid that keeps ground units from stacking.
//!
//! Each counter holds the number of live, non-flying agents of both sides
//! standing in that tile. Counters only change on insertion, on removal and
//! on a move that crosses a tile boundary.

/// Map extent in sub-tile units along each axis.
pub const MAP_SIZE: i32 = 8192;

/// Edge length of one collision tile.
pub const TILE_SIZE: i32 = 16;

/// Tiles along each axis.
pub const TILES_PER_SIDE: usize = (MAP_SIZE / TILE_SIZE) as usize;

/// A ground agent may not enter a tile already holding this many agents.
pub const MAX_AGENTS_PER_TILE: u16 = (TILE_SIZE / 8) as u16;

/// Whether a position lies on the map.
#[must_use]
pub const fn in_bounds(x: i32, y: i32) -> bool {
    x >= 0 && x < MAP_SIZE && y >= 0 && y < MAP_SIZE
}

/// Flat counter array over the tile lattice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionGrid {
    tiles: Vec<u16>,
}

impl Default for CollisionGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionGrid {
    /// Create an empty grid covering the whole map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tiles: vec![0; TILES_PER_SIDE * TILES_PER_SIDE],
        }
    }

    fn tile_index(x: i32, y: i32) -> usize {
        debug_assert!(in_bounds(x, y), "({x}, {y}) is off the map");
        (y / TILE_SIZE) as usize * TILES_PER_SIDE + (x / TILE_SIZE) as usize
    }

    /// Agents counted in the tile containing `(x, y)`.
    #[must_use]
    pub fn occupancy(&self, x: i32, y: i32) -> u16 {
        self.tiles[Self::tile_index(x, y)]
    }

    /// Count an agent entering the map at `(x, y)`. The tile cap is not
    /// checked here.
    pub fn occupy(&mut self, x: i32, y: i32) {
        let tile = &mut self.tiles[Self::tile_index(x, y)];
        *tile = tile.saturating_add(1);
    }

    /// Release the tile of an agent leaving the map.
    pub fn vacate(&mut self, x: i32, y: i32) {
        let tile = &mut self.tiles[Self::tile_index(x, y)];
        debug_assert!(*tile > 0, "vacating empty tile at ({x}, {y})");
        *tile = tile.saturating_sub(1);
    }

    /// Move an agent between positions, honoring the tile cap.
    ///
    /// Moves within a tile always succeed. Returns false, leaving the
    /// counters untouched, when the destination tile is full.
    pub fn try_move(&mut self, from: (i32, i32), to: (i32, i32)) -> bool {
        let old_tile = Self::tile_index(from.0, from.1);
        let new_tile = Self::tile_index(to.0, to.1);
        if old_tile == new_tile {
            return true;
        }
        if self.tiles[new_tile] >= MAX_AGENTS_PER_TILE {
            return false;
        }
        self.tiles[old_tile] = self.tiles[old_tile].saturating_sub(1);
        self.tiles[new_tile] += 1;
        true
    }

    /// Total agents counted on the whole map.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.tiles.iter().map(|&count| u32::from(count)).sum()
    }

    /// Zero every counter.
    pub fn clear(&mut self) {
        self.tiles.fill(0);
    }
}
