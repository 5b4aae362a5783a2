//! The player's hand of drawn, unplaced tiles

use super::{Tile, TileId};

/// Tiles available to place. Capacity is independent of the board size.
#[derive(Debug, Default)]
pub struct Rack {
    tiles: Vec<Tile>,
}

impl Rack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rack from freshly drawn tiles.
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    /// Put a tile (back) on the rack.
    pub fn push(&mut self, tile: Tile) {
        self.tiles.push(tile);
    }

    /// Put several tiles on the rack.
    pub fn extend(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.tiles.extend(tiles);
    }

    /// Take the tile with `id` off the rack.
    pub fn take(&mut self, id: TileId) -> Option<Tile> {
        let pos = self.tiles.iter().position(|t| t.id() == id)?;
        Some(self.tiles.remove(pos))
    }

    /// Discard the current hand and hold `tiles` instead.
    pub fn replace(&mut self, tiles: Vec<Tile>) -> Vec<Tile> {
        std::mem::replace(&mut self.tiles, tiles)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.tiles.iter().any(|t| t.id() == id)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Display the rack letters as a string.
    pub fn as_string(&self) -> String {
        self.tiles.iter().map(Tile::letter).collect()
    }
}
