//! WORDSLOT - a single-player word tile game for the terminal
//!
//! Move tiles from the rack onto the board, validate the word, score points.

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::fs::File;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wordslot::app::App;
use wordslot::config::GameConfig;
use wordslot::game::dictionary::{
    fallback_word_count, DictionaryLookup, HttpDictionary, OfflineDictionary,
};
use wordslot::game::session::GameSession;
use wordslot::storage::Storage;
use wordslot::tui::{self, Tui};

const LOG_FILE: &str = "wordslot.log";

#[derive(Parser, Debug)]
#[command(name = "wordslot", version, about = "Single-player word tile game")]
struct Cli {
    #[command(flatten)]
    game: GameConfig,

    /// Do not read or write game history
    #[arg(long)]
    no_save: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    cli.game.validate()?;
    init_logging();

    let dictionary: Arc<dyn DictionaryLookup> = if cli.game.offline {
        Arc::new(OfflineDictionary)
    } else {
        Arc::new(HttpDictionary::new(
            cli.game.dictionary_url.clone(),
            cli.game.lookup_timeout(),
        )?)
    };

    let storage = if cli.no_save {
        None
    } else {
        Storage::open()
            .map_err(|e| warn!(error = %e, "game history unavailable"))
            .ok()
    };
    let best = storage
        .as_ref()
        .and_then(|s| s.best_score().ok())
        .unwrap_or(0);

    info!(
        config = ?cli.game,
        best,
        fallback_words = fallback_word_count(),
        "starting"
    );
    let session = GameSession::new(cli.game).with_highest_score(best);
    let mut app = App::new(session, dictionary, storage);

    run(&mut app)?;
    app.shutdown();
    Ok(())
}

/// Main event loop
fn run(app: &mut App) -> io::Result<()> {
    let mut terminal = Tui::new()?;
    terminal.enter()?;

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| tui::render(frame, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') => app.quit(),
                        KeyCode::Left => app.on_left(),
                        KeyCode::Right => app.on_right(),
                        KeyCode::Tab | KeyCode::Up | KeyCode::Down => app.on_toggle_focus(),
                        KeyCode::Enter => app.on_enter(),
                        KeyCode::Backspace | KeyCode::Delete => app.on_return(),
                        KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                            let cell = c.to_digit(10).unwrap_or(1) as usize - 1;
                            app.on_place_at(cell);
                        }
                        KeyCode::Char(c) => match c.to_ascii_lowercase() {
                            'v' | ' ' => app.on_submit(),
                            'r' => app.on_refresh(),
                            'c' => app.on_clear(),
                            'n' => app.on_new_game(),
                            _ => {}
                        },
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    // Terminal cleanup happens automatically via Tui::drop
    Ok(())
}

/// Log to a file in the data directory; the terminal belongs to the UI.
fn init_logging() {
    let Ok(dir) = Storage::data_dir() else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = File::create(dir.join(LOG_FILE)) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}
