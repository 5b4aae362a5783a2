//! UI rendering using ratatui
//!
//! One screen: header with scores, the board row, the rack row, the
//! formed word, a status line, the words scored this game and recently
//! finished games.

use crate::app::{App, Focus};
use crate::game::board::Cell;
use crate::game::session::Severity;
use crate::game::Tile;
use crate::storage::GameRecord;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

/// Render the game screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with scores, remaining tiles
            Constraint::Length(3), // Board
            Constraint::Length(3), // Rack
            Constraint::Length(1), // Formed word
            Constraint::Length(1), // Status
            Constraint::Min(3),    // Scored words, recent games
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, layout[0], app);
    render_board(frame, layout[1], app);
    render_rack(frame, layout[2], app);
    render_word(frame, layout[3], app);
    render_status(frame, layout[4], app);
    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(layout[5]);
    render_scored_words(frame, lists[0], app);
    render_history(frame, lists[1], app);

    let footer = Paragraph::new(
        "←→ Move  Tab Rack/Board  Enter Place/Return  1-9 Drop on cell  V Validate  R Refresh  C Clear  N New game  Esc Quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(footer, layout[6]);
}

/// Render the header: title, score, highest score, remaining tiles
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12), // Title
            Constraint::Min(20),    // Scores
            Constraint::Length(16), // Remaining
        ])
        .split(inner);

    let title = Paragraph::new("WORDSLOT")
        .style(Style::default().fg(Color::Yellow).bold())
        .alignment(Alignment::Left);
    frame.render_widget(title, header_layout[0]);

    let session = app.session();
    let scores = Paragraph::new(format!(
        "Score: {}   Highest: {}",
        session.current_score(),
        session.highest_score()
    ))
    .style(Style::default().fg(Color::Magenta).bold())
    .alignment(Alignment::Center);
    frame.render_widget(scores, header_layout[1]);

    let remaining = session.remaining_tiles();
    let remaining_color = if remaining == 0 {
        Color::Red
    } else if remaining < session.config().rack_size {
        Color::Yellow
    } else {
        Color::Green
    };
    let tiles = Paragraph::new(format!("Tiles: {}/{}", remaining, session.tile_capacity()))
        .style(Style::default().fg(remaining_color))
        .alignment(Alignment::Right);
    frame.render_widget(tiles, header_layout[2]);
}

/// Render the board row
fn render_board(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Board;
    let spans: Vec<Span> = app
        .session()
        .board()
        .cells()
        .iter()
        .flat_map(|cell| {
            let selected = cell.index() == app.board_cursor;
            [board_cell_span(cell, selected, focused), Span::raw(" ")]
        })
        .collect();

    let board = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(titled_block("Board (2W = double word)", focused));
    frame.render_widget(board, area);
}

/// Render the rack row
fn render_rack(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Rack;
    let rack = app.session().rack();
    let line = if rack.is_empty() {
        Line::from(Span::styled("(empty)", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(
            rack.tiles()
                .iter()
                .enumerate()
                .flat_map(|(i, tile)| {
                    let selected = focused && i == app.rack_cursor;
                    let style = if selected {
                        Style::default().fg(Color::Black).bg(Color::Yellow).bold()
                    } else {
                        Style::default().fg(Color::Cyan).bold()
                    };
                    [Span::styled(format_tile(tile), style), Span::raw(" ")]
                })
                .collect::<Vec<_>>(),
        )
    };

    let widget = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(titled_block("Rack", focused));
    frame.render_widget(widget, area);
}

fn render_word(frame: &mut Frame, area: Rect, app: &App) {
    let word = app.session().formed_word();
    let text = match app.checking() {
        Some(pending) => format!("Word: {}   (checking {}...)", word, pending),
        None => format!("Word: {}", word),
    };
    let widget = Paragraph::new(text)
        .style(Style::default().fg(Color::White).bold())
        .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let Some(status) = app.status() else {
        return;
    };
    let widget = Paragraph::new(status.message.as_str())
        .style(Style::default().fg(severity_color(status.severity)))
        .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

/// Render the words scored this game, newest first
fn render_scored_words(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .session()
        .scored_words()
        .iter()
        .rev()
        .map(|w| {
            ListItem::new(format!("{} +{}", w.word, w.points))
                .style(Style::default().fg(Color::Green))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Scored words"),
    );
    frame.render_widget(list, area);
}

/// Render recently finished games from the history database
fn render_history(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .history()
        .iter()
        .map(|game| ListItem::new(format_game(game)).style(Style::default().fg(Color::Gray)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title("Recent games"),
    );
    frame.render_widget(list, area);
}

fn format_game(game: &GameRecord) -> String {
    let noun = if game.words == 1 { "word" } else { "words" };
    format!("#{}  {} pts, {} {}", game.id, game.score, game.words, noun)
}

fn titled_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

fn board_cell_span(cell: &Cell, selected: bool, focused: bool) -> Span<'static> {
    let text = match cell.occupant() {
        Some(tile) => format_tile(tile),
        None if cell.is_bonus() => String::from("[2W]"),
        None => String::from("[  ]"),
    };
    let mut style = if cell.is_bonus() {
        Style::default().fg(Color::LightRed)
    } else {
        Style::default().fg(Color::White)
    };
    if cell.occupant().is_some() {
        style = style.bold();
    }
    if selected {
        style = if focused {
            style.bg(Color::Yellow).fg(Color::Black)
        } else {
            style.underlined()
        };
    }
    Span::styled(text, style)
}

/// Format a tile as `[Q10]`: letter, then value
fn format_tile(tile: &Tile) -> String {
    format!("[{}{}]", tile.letter(), tile.value())
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::White,
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::TileId;

    #[test]
    fn test_format_tile() {
        assert_eq!(format_tile(&Tile::new(TileId(0), 'Q', 10)), "[Q10]");
        assert_eq!(format_tile(&Tile::new(TileId(1), '_', 0)), "[_0]");
    }

    #[test]
    fn test_format_game() {
        let game = GameRecord {
            id: 3,
            finished_at: 0,
            score: 42,
            words: 1,
        };
        assert_eq!(format_game(&game), "#3  42 pts, 1 word");
        let game = GameRecord { words: 4, ..game };
        assert_eq!(format_game(&game), "#3  42 pts, 4 words");
    }

    #[test]
    fn test_severity_colors() {
        assert_eq!(severity_color(Severity::Success), Color::Green);
        assert_eq!(severity_color(Severity::Error), Color::Red);
    }
}
