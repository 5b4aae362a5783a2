//! Game logic: tiles, tile supply, board, rack, validation, scoring

pub mod board;
pub mod dictionary;
pub mod rack;
pub mod scoring;
pub mod session;
pub mod validation;

use rand::Rng;
use std::fmt;

/// Marker used for the blank tile.
pub const BLANK: char = '_';

/// Point value of every tile symbol. Each draw samples one entry uniformly.
const TILE_VALUES: [(char, u32); 27] = [
    ('A', 1),
    ('B', 3),
    ('C', 3),
    ('D', 2),
    ('E', 1),
    ('F', 4),
    ('G', 2),
    ('H', 4),
    ('I', 1),
    ('J', 8),
    ('K', 5),
    ('L', 1),
    ('M', 3),
    ('N', 1),
    ('O', 1),
    ('P', 3),
    ('Q', 10),
    ('R', 1),
    ('S', 1),
    ('T', 1),
    ('U', 1),
    ('V', 4),
    ('W', 4),
    ('X', 8),
    ('Y', 4),
    ('Z', 10),
    (BLANK, 0),
];

/// Identity of a drawn tile, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

/// A lettered tile.
///
/// Tiles are deliberately not `Clone`: a tile lives in exactly one place
/// (supply, rack or a board cell) and moves between them by value.
#[derive(Debug, PartialEq, Eq)]
pub struct Tile {
    id: TileId,
    letter: char,
    value: u32,
}

impl Tile {
    /// Create a tile with an explicit value.
    pub fn new(id: TileId, letter: char, value: u32) -> Self {
        Self { id, letter, value }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn is_blank(&self) -> bool {
        self.letter == BLANK
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.value)
    }
}

/// Finite pool of undrawn tiles.
#[derive(Debug, Clone)]
pub struct TileSupply {
    remaining: u32,
    capacity: u32,
    next_id: u64,
}

impl TileSupply {
    /// Create a full supply.
    pub fn new(capacity: u32) -> Self {
        Self {
            remaining: capacity,
            capacity,
            next_id: 0,
        }
    }

    /// Draw up to `count` tiles, sampling each letter independently.
    ///
    /// Returns `min(count, remaining)` tiles and consumes exactly that many
    /// units of supply. An exhausted supply yields an empty vec.
    pub fn draw<R: Rng>(&mut self, count: u32, rng: &mut R) -> Vec<Tile> {
        let n = count.min(self.remaining);
        let tiles: Vec<Tile> = (0..n)
            .map(|_| {
                let (letter, value) = TILE_VALUES[rng.random_range(0..TILE_VALUES.len())];
                self.mint(letter, value)
            })
            .collect();
        self.remaining -= n;
        tiles
    }

    /// Refill the supply to `capacity`.
    pub fn reset(&mut self, capacity: u32) {
        self.capacity = capacity;
        self.remaining = capacity;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    fn mint(&mut self, letter: char, value: u32) -> Tile {
        let id = TileId(self.next_id);
        self.next_id += 1;
        Tile::new(id, letter, value)
    }
}
