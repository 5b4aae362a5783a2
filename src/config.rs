//! Game configuration, settable from the command line

use crate::game::dictionary::DEFAULT_DICTIONARY_URL;
use crate::game::validation::MIN_WORD_LENGTH;
use clap::Args;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BOARD_SIZE: usize = 7;
pub const DEFAULT_BONUS_CELLS: [usize; 2] = [1, 5];
pub const DEFAULT_TILE_CAPACITY: u32 = 100;
pub const DEFAULT_RACK_SIZE: u32 = 7;
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board must have at least one cell")]
    EmptyBoard,
    #[error("bonus cell {index} is outside a board of {len} cells")]
    BonusOutOfRange { index: usize, len: usize },
    #[error("rack size must be at least 1")]
    EmptyRack,
    #[error("minimum word length must be at least 1")]
    ZeroWordLength,
    #[error("dictionary timeout must be non-zero")]
    ZeroTimeout,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Number of cells on the board
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
    pub board_size: usize,

    /// Indices of double-word bonus cells (comma separated)
    #[arg(long = "bonus", value_delimiter = ',', default_values_t = DEFAULT_BONUS_CELLS)]
    pub bonus_cells: Vec<usize>,

    /// Tiles in a full supply
    #[arg(long = "tiles", default_value_t = DEFAULT_TILE_CAPACITY)]
    pub tile_capacity: u32,

    /// Tiles dealt on each refresh
    #[arg(long, default_value_t = DEFAULT_RACK_SIZE)]
    pub rack_size: u32,

    /// Shortest word accepted for validation
    #[arg(long, default_value_t = MIN_WORD_LENGTH)]
    pub min_word_len: usize,

    /// Remote dictionary endpoint; the word is appended as a path segment
    #[arg(long, default_value = DEFAULT_DICTIONARY_URL)]
    pub dictionary_url: String,

    /// Remote dictionary timeout in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Skip the remote dictionary and use the local list only
    #[arg(long)]
    pub offline: bool,

    /// Seed for tile draws (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            bonus_cells: DEFAULT_BONUS_CELLS.to_vec(),
            tile_capacity: DEFAULT_TILE_CAPACITY,
            rack_size: DEFAULT_RACK_SIZE,
            min_word_len: MIN_WORD_LENGTH,
            dictionary_url: DEFAULT_DICTIONARY_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            offline: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Reject settings the game cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        if let Some(&index) = self.bonus_cells.iter().find(|&&i| i >= self.board_size) {
            return Err(ConfigError::BonusOutOfRange {
                index,
                len: self.board_size,
            });
        }
        if self.rack_size == 0 {
            return Err(ConfigError::EmptyRack);
        }
        if self.min_word_len == 0 {
            return Err(ConfigError::ZeroWordLength);
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
