//! The board: a fixed row of cells, some flagged as bonus cells

use super::Tile;
use thiserror::Error;

/// Why a placement was refused. The tile is handed back to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaceError {
    #[error("cell {index} already holds a tile")]
    CellOccupied { index: usize, tile: Tile },
    #[error("no cell at index {index}")]
    NoSuchCell { index: usize, tile: Tile },
}

impl PlaceError {
    /// Recover the tile that could not be placed.
    pub fn into_tile(self) -> Tile {
        match self {
            PlaceError::CellOccupied { tile, .. } | PlaceError::NoSuchCell { tile, .. } => tile,
        }
    }
}

/// A single board cell.
#[derive(Debug)]
pub struct Cell {
    index: usize,
    is_bonus: bool,
    occupant: Option<Tile>,
}

impl Cell {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_bonus(&self) -> bool {
        self.is_bonus
    }

    pub fn occupant(&self) -> Option<&Tile> {
        self.occupant.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.is_none()
    }
}

/// An ordered row of cells.
#[derive(Debug)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    /// Build an empty board of `len` cells. Indices in `bonus` beyond the
    /// board are ignored.
    pub fn new(len: usize, bonus: &[usize]) -> Self {
        let cells = (0..len)
            .map(|index| Cell {
                index,
                is_bonus: bonus.contains(&index),
                occupant: None,
            })
            .collect();
        Self { cells }
    }

    /// Put `tile` on cell `index`.
    pub fn place_tile(&mut self, index: usize, tile: Tile) -> Result<(), PlaceError> {
        let Some(cell) = self.cells.get_mut(index) else {
            return Err(PlaceError::NoSuchCell { index, tile });
        };
        if cell.occupant.is_some() {
            return Err(PlaceError::CellOccupied { index, tile });
        }
        cell.occupant = Some(tile);
        Ok(())
    }

    /// Take the tile off cell `index`, if any.
    pub fn remove_tile(&mut self, index: usize) -> Option<Tile> {
        self.cells.get_mut(index).and_then(|c| c.occupant.take())
    }

    /// Empty every cell, returning the removed tiles in cell order.
    pub fn clear(&mut self) -> Vec<Tile> {
        self.cells
            .iter_mut()
            .filter_map(|c| c.occupant.take())
            .collect()
    }

    /// Letters of occupied cells in index order. Empty cells are skipped.
    pub fn formed_word(&self) -> String {
        self.occupied().map(|(_, tile)| tile.letter()).collect()
    }

    /// Iterate over occupied cells as `(cell, tile)`.
    pub fn occupied(&self) -> impl Iterator<Item = (&Cell, &Tile)> {
        self.cells
            .iter()
            .filter_map(|c| c.occupant.as_ref().map(|t| (c, t)))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Cell::is_empty)
    }

    pub fn tile_count(&self) -> usize {
        self.occupied().count()
    }
}
