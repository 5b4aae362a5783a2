//! Application state: the game session plus what the terminal needs
//!
//! Key presses become session commands here. Dictionary lookups run on a
//! worker thread and are collected on `tick`, so the board stays usable
//! while a word is being checked.

use crate::game::dictionary::{DictionaryLookup, LookupError};
use crate::game::session::{GameSession, PendingWord, Status, Submission};
use crate::storage::{GameRecord, Storage};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

/// Finished games shown on screen.
pub const RECENT_GAMES: usize = 5;

/// Which row the cursor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Rack,
    Board,
}

/// A submitted word whose lookup has not come back yet.
struct InFlight {
    pending: PendingWord,
    rx: Receiver<Result<(), LookupError>>,
}

/// Main application state
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,
    /// Row the cursor is on
    pub focus: Focus,
    /// Selected rack tile
    pub rack_cursor: usize,
    /// Selected board cell
    pub board_cursor: usize,
    session: GameSession,
    dictionary: Arc<dyn DictionaryLookup>,
    storage: Option<Storage>,
    history: Vec<GameRecord>,
    status: Option<Status>,
    in_flight: Option<InFlight>,
}

impl App {
    pub fn new(
        session: GameSession,
        dictionary: Arc<dyn DictionaryLookup>,
        storage: Option<Storage>,
    ) -> Self {
        let history = storage
            .as_ref()
            .map(|s| {
                s.recent_games(RECENT_GAMES).unwrap_or_else(|e| {
                    warn!(error = %e, "could not load recent games");
                    Vec::new()
                })
            })
            .unwrap_or_default();
        Self {
            should_quit: false,
            focus: Focus::Rack,
            rack_cursor: 0,
            board_cursor: 0,
            session,
            dictionary,
            storage,
            history,
            status: None,
            in_flight: None,
        }
    }

    /// Signal the application to quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Recently finished games, newest first
    pub fn history(&self) -> &[GameRecord] {
        &self.history
    }

    /// Word currently being checked, if any
    pub fn checking(&self) -> Option<&str> {
        self.in_flight.as_ref().map(|f| f.pending.word())
    }

    /// Switch the cursor between rack and board
    pub fn on_toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Rack => Focus::Board,
            Focus::Board => Focus::Rack,
        };
    }

    pub fn on_left(&mut self) {
        match self.focus {
            Focus::Rack => self.rack_cursor = self.rack_cursor.saturating_sub(1),
            Focus::Board => self.board_cursor = self.board_cursor.saturating_sub(1),
        }
    }

    pub fn on_right(&mut self) {
        match self.focus {
            Focus::Rack => {
                if self.rack_cursor + 1 < self.session.rack().len() {
                    self.rack_cursor += 1;
                }
            }
            Focus::Board => {
                if self.board_cursor + 1 < self.session.board().len() {
                    self.board_cursor += 1;
                }
            }
        }
    }

    /// Enter: drop the selected rack tile on the selected cell, or pick the
    /// selected cell's tile back up.
    pub fn on_enter(&mut self) {
        match self.focus {
            Focus::Rack => self.place_selected(self.board_cursor),
            Focus::Board => self.on_return(),
        }
    }

    /// Drop the selected rack tile straight onto `cell`.
    pub fn on_place_at(&mut self, cell: usize) {
        self.place_selected(cell);
    }

    /// Move the tile under the board cursor back to the rack
    pub fn on_return(&mut self) {
        match self.session.return_tile(self.board_cursor) {
            Ok(_) => self.status = None,
            Err(e) => self.status = Some(Status::from(&e)),
        }
    }

    /// Submit the formed word for validation
    pub fn on_submit(&mut self) {
        if let Some(word) = self.checking().map(str::to_string) {
            self.status = Some(Status::info(format!("Still checking \"{}\"...", word)));
            return;
        }
        match self.session.begin_submission() {
            Submission::Decided(outcome) => self.status = Some(outcome.status()),
            Submission::Lookup(pending) => {
                let (tx, rx) = channel();
                let dictionary = Arc::clone(&self.dictionary);
                let word = pending.word().to_string();
                thread::spawn(move || {
                    let _ = tx.send(dictionary.lookup(&word));
                });
                debug!(word = pending.word(), "lookup started");
                self.status = Some(Status::info(format!("Checking \"{}\"...", pending.word())));
                self.in_flight = Some(InFlight { pending, rx });
            }
        }
    }

    /// Clear the board and deal fresh tiles
    pub fn on_refresh(&mut self) {
        match self.session.refresh_tiles() {
            Ok(dealt) => {
                self.rack_cursor = 0;
                self.status = Some(Status::info(format!(
                    "Letters refreshed and board cleared. {} new tiles.",
                    dealt
                )));
            }
            Err(e) => self.status = Some(Status::from(&e)),
        }
    }

    /// Move all board tiles back to the rack
    pub fn on_clear(&mut self) {
        self.session.clear_board();
        self.status = Some(Status::info(
            "Board cleared. All tiles have been moved back to the rack.",
        ));
    }

    /// Record the finished game and start another
    pub fn on_new_game(&mut self) {
        self.record_game();
        self.session.new_game();
        self.rack_cursor = 0;
        self.board_cursor = 0;
        self.focus = Focus::Rack;
        self.status = Some(Status::info(format!(
            "New game started. Highest Score: {}",
            self.session.highest_score()
        )));
    }

    /// Collect a finished lookup, if there is one
    pub fn tick(&mut self) {
        let Some(flight) = self.in_flight.take() else {
            return;
        };
        let remote = match flight.rx.try_recv() {
            Ok(remote) => remote,
            Err(TryRecvError::Empty) => {
                self.in_flight = Some(flight);
                return;
            }
            Err(TryRecvError::Disconnected) => {
                Err(LookupError::Transport("lookup worker stopped".to_string()))
            }
        };
        self.finish_lookup(flight.pending, remote);
    }

    /// Save the current game before exiting
    pub fn shutdown(&mut self) {
        self.record_game();
    }

    fn finish_lookup(&mut self, pending: PendingWord, remote: Result<(), LookupError>) {
        self.status = Some(match self.session.settle(pending, remote) {
            Some(outcome) => outcome.status(),
            None => Status::info("That word belonged to a previous game."),
        });
    }

    fn place_selected(&mut self, cell: usize) {
        let Some(tile) = self.session.rack().tiles().get(self.rack_cursor) else {
            self.status = Some(Status::info("The rack is empty."));
            return;
        };
        let id = tile.id();
        match self.session.place_tile(id, cell) {
            Ok(()) => {
                self.status = None;
                self.board_cursor = cell;
                self.clamp_rack_cursor();
            }
            Err(e) => self.status = Some(Status::from(&e)),
        }
    }

    fn clamp_rack_cursor(&mut self) {
        let len = self.session.rack().len();
        if self.rack_cursor >= len {
            self.rack_cursor = len.saturating_sub(1);
        }
    }

    fn record_game(&mut self) {
        if self.session.scored_words().is_empty() {
            return;
        }
        let score = self.session.current_score();
        let words = self.session.scored_words().len() as u32;
        let Some(storage) = &self.storage else {
            return;
        };
        match storage.record_game(score, words) {
            Ok(record) => {
                self.history.insert(0, record);
                self.history.truncate(RECENT_GAMES);
            }
            Err(e) => warn!(error = %e, "could not record game"),
        }
    }

    /// Block until the in-flight lookup settles.
    #[cfg(test)]
    fn wait_for_lookup(&mut self) {
        use std::time::Duration;
        if let Some(flight) = self.in_flight.take() {
            let remote = flight
                .rx
                .recv_timeout(Duration::from_secs(5))
                .unwrap_or_else(|_| Err(LookupError::Transport("timed out".to_string())));
            self.finish_lookup(flight.pending, remote);
        }
    }
}
