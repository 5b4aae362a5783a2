//! WORDSLOT - a single-player word tile game
//!
//! The `game` module holds the board/tile state machine and scoring; `app`
//! and `tui` are the terminal front end; `storage` keeps game history.

pub mod app;
pub mod config;
pub mod game;
pub mod storage;
pub mod tui;
