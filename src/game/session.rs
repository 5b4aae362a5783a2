//! Game session: the single-player state machine
//!
//! Owns the board, rack, tile supply and validator, and applies the
//! player's commands to them. Every command runs to completion; the only
//! split operation is word submission, which may wait on a remote lookup
//! between `begin_submission` and `settle`.

use super::board::{Board, PlaceError};
use super::dictionary::{DictionaryLookup, LookupError};
use super::rack::Rack;
use super::scoring;
use super::validation::{ValidationResult, Validator};
use super::{TileId, TileSupply};
use crate::config::GameConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info};

/// Recoverable command failures. None of them end the session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("This cell already has a tile! The tile was moved back to the rack.")]
    CellOccupied { cell: usize },
    #[error("There is no cell {cell} on the board.")]
    NoSuchCell { cell: usize },
    #[error("That tile is not on the rack.")]
    TileNotInRack { tile: TileId },
    #[error("Cell {cell} has no tile to return.")]
    EmptyCell { cell: usize },
    #[error("No more tiles remaining! You cannot refresh anymore.")]
    NoTilesRemaining,
}

/// How a status message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A human-readable message for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub severity: Severity,
    pub message: String,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl From<&GameError> for Status {
    fn from(err: &GameError) -> Self {
        Status::error(err.to_string())
    }
}

/// A word that scored, with its points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredWord {
    pub word: String,
    pub points: u32,
}

/// Result of a word submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub word: String,
    pub result: ValidationResult,
    /// Points added to the current score (zero unless valid)
    pub points: u32,
}

impl SubmitOutcome {
    pub fn status(&self) -> Status {
        let message = self.result.message(&self.word);
        match self.result {
            ValidationResult::Valid { .. } => {
                Status::success(format!("{} +{} points", message, self.points))
            }
            ValidationResult::AlreadyValidated => Status::info(message),
            ValidationResult::TooShort { .. } | ValidationResult::NotInDictionary => {
                Status::error(message)
            }
        }
    }
}

/// A submitted word waiting on the remote dictionary.
///
/// Captures the word and its score as they stood when submitted, so later
/// board edits cannot change what gets credited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWord {
    word: String,
    points: u32,
    generation: u64,
}

impl PendingWord {
    pub fn word(&self) -> &str {
        &self.word
    }
}

/// First half of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Decided without a lookup (too short or already validated)
    Decided(SubmitOutcome),
    /// Needs the remote dictionary; pass its answer to `settle`
    Lookup(PendingWord),
}

/// Single-player game state.
pub struct GameSession {
    config: GameConfig,
    board: Board,
    rack: Rack,
    supply: TileSupply,
    validator: Validator,
    rng: StdRng,
    current_score: u32,
    highest_score: u32,
    scored_words: Vec<ScoredWord>,
    generation: u64,
}

impl GameSession {
    /// Start a session. Draws are seeded from `config.seed` when given.
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }

    /// Start a session with an explicit random source.
    pub fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let mut session = Self {
            board: Board::new(config.board_size, &config.bonus_cells),
            rack: Rack::new(),
            supply: TileSupply::new(config.tile_capacity),
            validator: Validator::new(config.min_word_len),
            rng,
            current_score: 0,
            highest_score: 0,
            scored_words: Vec::new(),
            generation: 0,
            config,
        };
        session.deal_rack();
        session
    }

    /// Seed the highest score, e.g. from stored history.
    pub fn with_highest_score(mut self, highest: u32) -> Self {
        self.highest_score = highest;
        self
    }

    /// Move a tile from the rack to a board cell.
    ///
    /// If the cell is taken (or does not exist) the tile stays on the rack.
    pub fn place_tile(&mut self, tile: TileId, cell: usize) -> Result<(), GameError> {
        let t = self
            .rack
            .take(tile)
            .ok_or(GameError::TileNotInRack { tile })?;
        match self.board.place_tile(cell, t) {
            Ok(()) => {
                debug!(?tile, cell, "tile placed");
                Ok(())
            }
            Err(e) => {
                let err = match &e {
                    PlaceError::CellOccupied { index, .. } => GameError::CellOccupied { cell: *index },
                    PlaceError::NoSuchCell { index, .. } => GameError::NoSuchCell { cell: *index },
                };
                self.rack.push(e.into_tile());
                debug!(?tile, cell, "placement refused, tile back on rack");
                Err(err)
            }
        }
    }

    /// Move the tile on `cell` back to the rack.
    pub fn return_tile(&mut self, cell: usize) -> Result<TileId, GameError> {
        if cell >= self.board.len() {
            return Err(GameError::NoSuchCell { cell });
        }
        let tile = self
            .board
            .remove_tile(cell)
            .ok_or(GameError::EmptyCell { cell })?;
        let id = tile.id();
        self.rack.push(tile);
        debug!(?id, cell, "tile returned to rack");
        Ok(id)
    }

    /// Read the board and decide what the submission needs.
    pub fn begin_submission(&self) -> Submission {
        let word = self.board.formed_word();
        match self.validator.precheck(&word) {
            Some(result) => Submission::Decided(SubmitOutcome {
                word,
                result,
                points: 0,
            }),
            None => Submission::Lookup(PendingWord {
                points: scoring::score(&self.board),
                word,
                generation: self.generation,
            }),
        }
    }

    /// Apply the remote lookup's answer to a pending word.
    ///
    /// Returns `None` if a new game started since the word was submitted.
    pub fn settle(
        &mut self,
        pending: PendingWord,
        remote: Result<(), LookupError>,
    ) -> Option<SubmitOutcome> {
        if pending.generation != self.generation {
            info!(word = %pending.word, "discarding lookup from a previous game");
            return None;
        }
        Some(self.apply(pending, remote))
    }

    fn apply(&mut self, pending: PendingWord, remote: Result<(), LookupError>) -> SubmitOutcome {
        let result = self.validator.settle(&pending.word, remote);
        let points = if result.is_valid() { pending.points } else { 0 };
        if result.is_valid() {
            self.current_score = self.current_score.saturating_add(points);
            self.scored_words.push(ScoredWord {
                word: pending.word.clone(),
                points,
            });
        }
        info!(
            word = %pending.word,
            ?result,
            points,
            score = self.current_score,
            validated = self.validator.validated_count(),
            "word submitted"
        );
        SubmitOutcome {
            word: pending.word,
            result,
            points,
        }
    }

    /// Submit the formed word, blocking on the dictionary.
    pub fn submit_word(&mut self, dictionary: &dyn DictionaryLookup) -> SubmitOutcome {
        match self.begin_submission() {
            Submission::Decided(outcome) => {
                info!(word = %outcome.word, result = ?outcome.result, "word submitted");
                outcome
            }
            Submission::Lookup(pending) => {
                let remote = dictionary.lookup(pending.word());
                self.apply(pending, remote)
            }
        }
    }

    /// Clear the board, forget validated words, and deal a fresh rack.
    ///
    /// Rejected without any change when the supply is exhausted. Returns
    /// the number of tiles dealt.
    pub fn refresh_tiles(&mut self) -> Result<usize, GameError> {
        if self.supply.is_empty() {
            return Err(GameError::NoTilesRemaining);
        }
        let returned = self.board.clear();
        self.rack.extend(returned);
        self.validator.clear();
        let drawn = self.supply.draw(self.config.rack_size, &mut self.rng);
        let dealt = drawn.len();
        let discarded = self.rack.replace(drawn);
        info!(
            dealt,
            rack = %self.rack.as_string(),
            discarded = discarded.len(),
            remaining = self.supply.remaining(),
            "tiles refreshed"
        );
        Ok(dealt)
    }

    /// Move every board tile back to the rack. Returns how many moved.
    pub fn clear_board(&mut self) -> usize {
        let tiles = self.board.clear();
        let moved = tiles.len();
        self.rack.extend(tiles);
        debug!(moved, "board cleared");
        moved
    }

    /// Bank the score and start over with a full supply.
    pub fn new_game(&mut self) {
        self.highest_score = self.highest_score.max(self.current_score);
        self.current_score = 0;
        self.validator.clear();
        self.scored_words.clear();
        self.board = Board::new(self.config.board_size, &self.config.bonus_cells);
        self.generation += 1;
        // A new game's opening rack is free: the supply reads full after it.
        self.supply.reset(self.config.tile_capacity);
        self.deal_rack();
        self.supply.reset(self.config.tile_capacity);
        info!(highest = self.highest_score, "new game started");
    }

    fn deal_rack(&mut self) {
        let tiles = self.supply.draw(self.config.rack_size, &mut self.rng);
        self.rack.replace(tiles);
        debug!(rack = %self.rack.as_string(), remaining = self.supply.remaining(), "rack dealt");
    }

    pub fn formed_word(&self) -> String {
        self.board.formed_word()
    }

    pub fn current_score(&self) -> u32 {
        self.current_score
    }

    pub fn highest_score(&self) -> u32 {
        self.highest_score
    }

    pub fn remaining_tiles(&self) -> u32 {
        self.supply.remaining()
    }

    pub fn tile_capacity(&self) -> u32 {
        self.supply.capacity()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rack(&self) -> &Rack {
        &self.rack
    }

    pub fn scored_words(&self) -> &[ScoredWord] {
        &self.scored_words
    }

    pub fn is_validated(&self, word: &str) -> bool {
        self.validator.is_validated(word)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::dictionary::OfflineDictionary;
    use crate::game::validation::Source;
    use crate::game::Tile;

    struct AlwaysFound;

    impl DictionaryLookup for AlwaysFound {
        fn lookup(&self, _word: &str) -> Result<(), LookupError> {
            Ok(())
        }
    }

    fn session() -> GameSession {
        GameSession::with_rng(GameConfig::default(), StdRng::seed_from_u64(5))
    }

    /// Put a known tile on the rack and return its id.
    fn give(session: &mut GameSession, id: u64, letter: char, value: u32) -> TileId {
        let id = TileId(10_000 + id);
        session.rack.push(Tile::new(id, letter, value));
        id
    }

    fn spell(session: &mut GameSession, placements: &[(char, u32, usize)]) {
        for (i, (letter, value, cell)) in placements.iter().enumerate() {
            let id = give(session, i as u64, *letter, *value);
            session.place_tile(id, *cell).unwrap();
        }
    }

    #[test]
    fn test_new_session_opening_rack_draws_from_supply() {
        let s = session();
        assert_eq!(s.rack().len(), 7);
        assert_eq!(s.remaining_tiles(), 93);
        assert_eq!(s.tile_capacity(), 100);
        assert!(s.board().is_empty());
        assert_eq!(s.current_score(), 0);
    }

    #[test]
    fn test_opening_rack_capped_by_small_supply() {
        let config = GameConfig {
            tile_capacity: 3,
            ..GameConfig::default()
        };
        let s = GameSession::with_rng(config, StdRng::seed_from_u64(2));
        assert_eq!(s.rack().len(), 3);
        assert_eq!(s.remaining_tiles(), 0);
    }

    #[test]
    fn test_place_tile_moves_from_rack_to_board() {
        let mut s = session();
        let id = s.rack().tiles()[0].id();
        s.place_tile(id, 3).unwrap();
        assert!(!s.rack().contains(id));
        assert_eq!(s.board().cell(3).unwrap().occupant().unwrap().id(), id);
        assert_eq!(s.rack().len(), 6);
    }

    #[test]
    fn test_place_on_occupied_cell_returns_tile_to_rack() {
        let mut s = session();
        let first = s.rack().tiles()[0].id();
        let second = s.rack().tiles()[1].id();
        s.place_tile(first, 2).unwrap();
        assert_eq!(s.place_tile(second, 2), Err(GameError::CellOccupied { cell: 2 }));
        assert!(s.rack().contains(second));
        assert_eq!(s.board().tile_count(), 1);
        assert_eq!(s.rack().len() + s.board().tile_count(), 7);
    }

    #[test]
    fn test_place_unknown_tile_or_cell() {
        let mut s = session();
        assert_eq!(
            s.place_tile(TileId(99_999), 0),
            Err(GameError::TileNotInRack { tile: TileId(99_999) })
        );
        let id = s.rack().tiles()[0].id();
        assert_eq!(s.place_tile(id, 7), Err(GameError::NoSuchCell { cell: 7 }));
        assert!(s.rack().contains(id));
    }

    #[test]
    fn test_return_tile() {
        let mut s = session();
        let id = s.rack().tiles()[0].id();
        s.place_tile(id, 0).unwrap();
        assert_eq!(s.return_tile(0), Ok(id));
        assert!(s.rack().contains(id));
        assert_eq!(s.return_tile(0), Err(GameError::EmptyCell { cell: 0 }));
        assert_eq!(s.return_tile(12), Err(GameError::NoSuchCell { cell: 12 }));
    }

    #[test]
    fn test_submit_scores_with_bonus() {
        let mut s = session();
        // Q on a bonus cell, I on a plain one: (10 + 1) * 2
        spell(&mut s, &[('Q', 10, 1), ('I', 1, 2)]);
        let outcome = s.submit_word(&OfflineDictionary);
        assert_eq!(outcome.word, "QI");
        assert_eq!(outcome.result, ValidationResult::Valid { source: Source::LocalList });
        assert_eq!(outcome.points, 22);
        assert_eq!(s.current_score(), 22);
        assert_eq!(outcome.status().severity, Severity::Success);
    }

    #[test]
    fn test_resubmit_is_already_validated() {
        let mut s = session();
        spell(&mut s, &[('Z', 10, 0), ('A', 1, 1)]);
        assert!(s.submit_word(&AlwaysFound).result.is_valid());
        let score = s.current_score();

        let again = s.submit_word(&AlwaysFound);
        assert_eq!(again.result, ValidationResult::AlreadyValidated);
        assert_eq!(again.points, 0);
        assert_eq!(s.current_score(), score);
        assert_eq!(again.status().severity, Severity::Info);
    }

    #[test]
    fn test_too_short_not_scored() {
        let mut s = session();
        spell(&mut s, &[('A', 1, 1)]);
        let outcome = s.submit_word(&AlwaysFound);
        assert!(matches!(outcome.result, ValidationResult::TooShort { length: 1, .. }));
        assert_eq!(s.current_score(), 0);
        assert_eq!(outcome.status().severity, Severity::Error);
    }

    #[test]
    fn test_invalid_word_not_scored() {
        let mut s = session();
        spell(&mut s, &[('Z', 10, 0), ('Z', 10, 1)]);
        let outcome = s.submit_word(&OfflineDictionary);
        assert_eq!(outcome.result, ValidationResult::NotInDictionary);
        assert_eq!(s.current_score(), 0);
        assert!(s.scored_words().is_empty());
    }

    #[test]
    fn test_pending_word_uses_submission_snapshot() {
        let mut s = session();
        spell(&mut s, &[('H', 4, 0), ('I', 1, 1)]);
        let Submission::Lookup(pending) = s.begin_submission() else {
            panic!("expected a lookup");
        };
        // Board changes while the lookup is in flight.
        s.clear_board();
        let outcome = s.settle(pending, Ok(())).unwrap();
        assert_eq!(outcome.word, "HI");
        assert_eq!(outcome.points, 10);
        assert_eq!(s.current_score(), 10);
    }

    #[test]
    fn test_settle_after_new_game_is_discarded() {
        let mut s = session();
        spell(&mut s, &[('H', 4, 0), ('I', 1, 1)]);
        let Submission::Lookup(pending) = s.begin_submission() else {
            panic!("expected a lookup");
        };
        s.new_game();
        assert_eq!(s.settle(pending, Ok(())), None);
        assert_eq!(s.current_score(), 0);
        assert!(!s.is_validated("HI"));
    }

    #[test]
    fn test_refresh_draws_what_remains_then_rejects() {
        let config = GameConfig {
            tile_capacity: 10,
            ..GameConfig::default()
        };
        let mut s = GameSession::with_rng(config, StdRng::seed_from_u64(1));
        assert_eq!(s.remaining_tiles(), 3);

        assert_eq!(s.refresh_tiles(), Ok(3));
        assert_eq!(s.rack().len(), 3);
        assert_eq!(s.remaining_tiles(), 0);

        let id = s.rack().tiles()[0].id();
        s.place_tile(id, 4).unwrap();
        assert_eq!(s.refresh_tiles(), Err(GameError::NoTilesRemaining));
        // Nothing moved
        assert_eq!(s.rack().len(), 2);
        assert_eq!(s.board().tile_count(), 1);
        assert_eq!(s.remaining_tiles(), 0);
    }

    #[test]
    fn test_refresh_clears_board_and_validated_words() {
        let mut s = session();
        spell(&mut s, &[('O', 1, 0), ('X', 8, 1)]);
        assert!(s.submit_word(&OfflineDictionary).result.is_valid());
        let score = s.current_score();

        assert_eq!(s.refresh_tiles(), Ok(7));
        assert!(s.board().is_empty());
        assert!(!s.is_validated("OX"));
        assert_eq!(s.rack().len(), 7);
        assert_eq!(s.remaining_tiles(), 86);
        assert_eq!(s.current_score(), score);
    }

    #[test]
    fn test_clear_board_keeps_score_and_memo() {
        let mut s = session();
        spell(&mut s, &[('O', 1, 0), ('X', 8, 1)]);
        s.submit_word(&OfflineDictionary);
        let score = s.current_score();
        let rack_before = s.rack().len();

        assert_eq!(s.clear_board(), 2);
        assert!(s.board().is_empty());
        assert_eq!(s.rack().len(), rack_before + 2);
        assert_eq!(s.current_score(), score);
        assert!(s.is_validated("OX"));
    }

    #[test]
    fn test_new_game_banks_highest_score() {
        let mut s = session();
        s.current_score = 42;
        s.highest_score = 10;
        s.refresh_tiles().unwrap();
        let id = s.rack().tiles()[0].id();
        s.place_tile(id, 0).unwrap();

        s.new_game();
        assert_eq!(s.highest_score(), 42);
        assert_eq!(s.current_score(), 0);
        assert_eq!(s.remaining_tiles(), 100);
        assert!(s.board().is_empty());
        assert_eq!(s.rack().len(), 7);
    }

    #[test]
    fn test_wide_all_bonus_board_scores_without_overflow() {
        let config = GameConfig {
            board_size: 40,
            bonus_cells: (0..40).collect(),
            rack_size: 40,
            ..GameConfig::default()
        };
        let mut s = GameSession::with_rng(config, StdRng::seed_from_u64(9));
        s.current_score = 5;
        let placements: Vec<(char, u32, usize)> = (0..40).map(|cell| ('A', 1, cell)).collect();
        spell(&mut s, &placements);

        let outcome = s.submit_word(&AlwaysFound);
        assert!(outcome.result.is_valid());
        assert_eq!(outcome.points, u32::MAX);
        assert_eq!(s.current_score(), u32::MAX);
    }

    #[test]
    fn test_new_game_keeps_higher_record() {
        let mut s = session().with_highest_score(50);
        s.current_score = 20;
        s.new_game();
        assert_eq!(s.highest_score(), 50);
    }
}
