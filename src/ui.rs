//! Terminal UI rendering with ratatui

use crate::settings::VisualSettings;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};
use tetris_engine::grid::{GRID_COLS, GRID_ROWS};
use tetris_engine::{Game, Position, Rotation, TetrominoKind};

const EMPTY: &str = "  ";

/// Total width needed: hold(12) + grid(22) + next/stats(18) = 52
const GAME_WIDTH: u16 = 52;
/// Total height needed: grid(20) + 2 for borders
const GAME_HEIGHT: u16 = 22;

/// How long a lock announcement stays up
pub const BANNER_DURATION: Duration = Duration::from_secs(3);

pub fn kind_color(kind: TetrominoKind) -> Color {
    match kind {
        TetrominoKind::O => Color::Yellow,
        TetrominoKind::I => Color::Cyan,
        TetrominoKind::S => Color::Green,
        TetrominoKind::Z => Color::Red,
        TetrominoKind::L => Color::Rgb(255, 165, 0),
        TetrominoKind::J => Color::Blue,
        TetrominoKind::T => Color::Magenta,
    }
}

/// Display state that lives outside the game: visual options and the
/// lock announcement banner
#[derive(Debug, Clone)]
pub struct Hud {
    visual: VisualSettings,
    banner: Option<(String, Instant)>,
    seen_locks: u64,
}

impl Hud {
    pub fn new(visual: VisualSettings) -> Self {
        Self {
            visual,
            banner: None,
            seen_locks: 0,
        }
    }

    pub fn toggle_ghost(&mut self) {
        self.visual.show_ghost = !self.visual.show_ghost;
    }

    pub fn show_ghost(&self) -> bool {
        self.visual.show_ghost
    }

    /// Pick up a new lock report, if one arrived since the last frame
    pub fn observe(&mut self, game: &Game, now: Instant) {
        if game.pieces_locked() == self.seen_locks {
            return;
        }
        self.seen_locks = game.pieces_locked();
        if let Some(text) = game.last_lock().and_then(|report| report.describe()) {
            self.banner = Some((text, now));
        }
    }

    /// Banner text while it is still fresh
    pub fn banner(&self, now: Instant) -> Option<&str> {
        self.banner
            .as_ref()
            .filter(|(_, shown_at)| now.saturating_duration_since(*shown_at) < BANNER_DURATION)
            .map(|(text, _)| text.as_str())
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
    }
}

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, game: &Game, hud: &Hud, now: Instant) {
    let area = frame.area();
    let (block_char, ghost_char) = hud.visual.block_chars();

    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // hold | grid | next + stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Length(GRID_COLS as u16 * 2 + 2),
            Constraint::Length(18),
        ])
        .split(game_area);

    render_preview(frame, main_layout[0], " HOLD ", game.held().map(|b| b.kind()), block_char);

    let ghost = hud.show_ghost().then(|| game.ghost_cells());
    render_grid(frame, main_layout[1], game, ghost, block_char, ghost_char);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(8)])
        .split(main_layout[2]);

    render_preview(frame, right_layout[0], " NEXT ", Some(game.next().kind()), block_char);
    render_stats(frame, right_layout[1], game, hud.banner(now));

    if game.is_game_over() {
        render_overlay(
            frame,
            area,
            "GAME OVER",
            &format!("Score {}  -  any key", game.points()),
        );
    }
}

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

/// Boxed single-piece preview (hold and next)
fn render_preview(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    kind: Option<TetrominoKind>,
    block_char: &str,
) {
    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(kind) = kind {
        frame.render_widget(
            Paragraph::new(mini_piece(kind, block_char)).alignment(Alignment::Center),
            inner,
        );
    }
}

/// Spawn layout trimmed to its bounding box, 2 rows by 4 columns
fn mini_piece(kind: TetrominoKind, block_char: &str) -> Vec<Line<'static>> {
    let cells = kind.cells(Rotation::North);
    let min_row = cells.iter().map(|c| c.row).min().unwrap_or(0);
    let min_col = cells.iter().map(|c| c.col).min().unwrap_or(0);
    let style = Style::default().fg(kind_color(kind));

    (0..2)
        .map(|row| {
            let spans: Vec<Span> = (0..4)
                .map(|col| {
                    if cells.contains(&Position::new(min_row + row, min_col + col)) {
                        Span::styled(block_char.to_string(), style)
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn render_grid(
    frame: &mut Frame,
    area: Rect,
    game: &Game,
    ghost: Option<[Position; 4]>,
    block_char: &str,
    ghost_char: &str,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let current = game.current();
    let current_cells = current.cell_positions();
    let current_style = Style::default().fg(kind_color(current.kind()));

    // Row 0 is the top of the grid
    let lines: Vec<Line> = (0..GRID_ROWS as i32)
        .map(|row| {
            let spans: Vec<Span> = (0..GRID_COLS as i32)
                .map(|col| {
                    let pos = Position::new(row, col);
                    if current_cells.contains(&pos) {
                        Span::styled(block_char, current_style)
                    } else if let Some(kind) = game.grid().kind_at(row, col) {
                        Span::styled(block_char, Style::default().fg(kind_color(kind)))
                    } else if ghost.is_some_and(|cells| cells.contains(&pos)) {
                        Span::styled(ghost_char, current_style.dim())
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn stat(lines: &mut Vec<Line>, label: &'static str, value: String, color: Color) {
    lines.push(Line::from(Span::styled(label, Style::default().fg(Color::Gray))));
    lines.push(Line::from(Span::styled(value, Style::default().fg(color).bold())));
}

fn render_stats(frame: &mut Frame, area: Rect, game: &Game, banner: Option<&str>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    stat(&mut lines, "SCORE", game.points().to_string(), Color::Yellow);
    stat(&mut lines, "LEVEL", game.level().to_string(), Color::Cyan);
    stat(&mut lines, "LINES", game.lines_cleared().to_string(), Color::Green);
    if game.combo() > 0 {
        stat(&mut lines, "COMBO", game.combo().to_string(), Color::Red);
    }

    if let Some(text) = banner {
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            text.to_string(),
            Style::default().fg(Color::Magenta).bold(),
        ));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_area = center_rect(area, 28, 5);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title.to_string(), Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle.to_string(), Style::default().fg(Color::Gray)),
    ];

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_distinct_color() {
        let colors: Vec<Color> = TetrominoKind::all().into_iter().map(kind_color).collect();
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_mini_piece_shapes() {
        let rows: Vec<String> = mini_piece(TetrominoKind::T, "[]")
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(rows, vec!["  []    ", "[][][]  "]);

        let i_rows = mini_piece(TetrominoKind::I, "[]");
        let top: String = i_rows[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(top, "[][][][]");
    }

    #[test]
    fn test_banner_follows_locks() {
        let start = Instant::now();
        let mut hud = Hud::new(VisualSettings::default());
        let mut game = Game::with_seed(5);

        hud.observe(&game, start);
        assert_eq!(hud.banner(start), None);

        // Hard-dropping onto an empty floor clears nothing
        game.hard_drop();
        hud.observe(&game, start);
        assert_eq!(hud.banner(start), None);
    }

    #[test]
    fn test_banner_expires() {
        let start = Instant::now();
        let mut hud = Hud::new(VisualSettings::default());
        hud.banner = Some(("Tetris".to_string(), start));

        assert_eq!(hud.banner(start + Duration::from_secs(2)), Some("Tetris"));
        assert_eq!(hud.banner(start + BANNER_DURATION), None);
        hud.clear_banner();
        assert_eq!(hud.banner(start), None);
    }

    #[test]
    fn test_toggle_ghost() {
        let mut hud = Hud::new(VisualSettings::default());
        assert!(hud.show_ghost());
        hud.toggle_ghost();
        assert!(!hud.show_ghost());
    }
}
