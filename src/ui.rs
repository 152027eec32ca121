//! Terminal UI rendering with ratatui

use crate::field::{Cell, Snapshot};
use crate::game::GameState;
use crate::settings::Settings;
use crate::tetromino::TileColor;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";

/// Total width needed: board(22) + side panel(18) = 40
const GAME_WIDTH: u16 = 40;
/// Total height needed: board(20) + 2 for borders = 22
const GAME_HEIGHT: u16 = 22;

/// Counters shown beside the board
#[derive(Debug, Clone, Copy)]
pub struct Hud {
    pub pieces_locked: u32,
    pub rows_cleared: u32,
    pub state: GameState,
}

/// Map a tile color onto the terminal palette
fn tile_color(color: TileColor) -> Color {
    match color {
        TileColor::Aqua => Color::Cyan,
        TileColor::Yellow => Color::Yellow,
        TileColor::Purple => Color::Magenta,
        TileColor::Green => Color::Green,
        TileColor::Red => Color::Red,
        TileColor::Blue => Color::Blue,
        TileColor::Orange => Color::Rgb(255, 165, 0),
    }
}

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, snapshot: &Snapshot, hud: &Hud, settings: &Settings) {
    let area = frame.area();
    let block_char = settings.visual.block_chars();

    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // board | stats + controls
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(snapshot.width as u16 * 2 + 2),
            Constraint::Length(18),
        ])
        .split(game_area);

    render_board(frame, main_layout[0], snapshot, block_char);
    render_stats(frame, main_layout[1], hud);

    if hud.state == GameState::GameOver || snapshot.overfilled {
        render_overlay(frame, area, "GAME OVER", "Press any key");
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Board rows from top to bottom, the active figure drawn over the grid
fn board_lines(snapshot: &Snapshot, block_char: &'static str) -> Vec<Line<'static>> {
    let figure_style = Style::default().fg(tile_color(snapshot.figure_color));
    let mut lines = Vec::with_capacity(snapshot.height);

    for y in (0..snapshot.height as i32).rev() {
        let spans: Vec<Span> = (0..snapshot.width as i32)
            .map(|x| {
                if snapshot.figure_cells.iter().any(|c| c.x == x && c.y == y) {
                    Span::styled(block_char, figure_style)
                } else {
                    match snapshot.color(x, y) {
                        Cell::Settled(color) => {
                            Span::styled(block_char, Style::default().fg(tile_color(color)))
                        }
                        Cell::Empty => Span::raw(EMPTY),
                    }
                }
            })
            .collect();
        lines.push(Line::from(spans));
    }

    lines
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot, block_char: &'static str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    frame.render_widget(Paragraph::new(board_lines(snapshot, block_char)), inner);
}

/// Render stats and controls panel
fn render_stats(frame: &mut Frame, area: Rect, hud: &Hud) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::Yellow).bold();
    let hint = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::styled("ROWS", label),
        Line::styled(hud.rows_cleared.to_string(), value),
        Line::raw(""),
        Line::styled("PIECES", label),
        Line::styled(hud.pieces_locked.to_string(), value),
        Line::raw(""),
        Line::styled("←→  shift", hint),
        Line::styled("↑   rotate", hint),
        Line::styled("↓   boost", hint),
        Line::styled("Esc quit", hint),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render an overlay (for game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 24u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::GameField;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(snapshot: &Snapshot, state: GameState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 26)).unwrap();
        let hud = Hud {
            pieces_locked: 3,
            rows_cleared: 7,
            state,
        };
        let settings = Settings::default();
        terminal
            .draw(|frame| render_game(frame, snapshot, &hud, &settings))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_board_lines_top_row_first() {
        let mut field = GameField::new(0);
        field.set(0, 0, Cell::Settled(TileColor::Red));
        let snapshot = field.snapshot();
        let lines = board_lines(&snapshot, "[]");

        assert_eq!(lines.len(), snapshot.height);
        let bottom = lines.last().unwrap();
        assert_eq!(bottom.spans[0].content, "[]");
        assert_eq!(bottom.spans[0].style.fg, Some(Color::Red));
        assert_eq!(bottom.spans[1].content, EMPTY);

        // The spawned figure always covers its anchor on the top row
        let top = &lines[0];
        assert_eq!(top.spans[4].content, "[]");
    }

    #[test]
    fn test_render_shows_counters() {
        let screen = draw(&GameField::new(0).snapshot(), GameState::Running);
        assert!(screen.contains("ROWS"));
        assert!(screen.contains('7'));
        assert!(!screen.contains("GAME OVER"));
    }

    #[test]
    fn test_render_game_over_overlay() {
        let screen = draw(&GameField::new(0).snapshot(), GameState::GameOver);
        assert!(screen.contains("GAME OVER"));
    }
}
