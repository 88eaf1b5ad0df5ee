//! Terminal UI rendering with ratatui

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, EMPTY};
use crate::game::{GameState, Model};
use crate::settings::Settings;
use crate::tetromino::color_of;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Board (10*2 + 2 for borders) + stats panel
const GAME_WIDTH: u16 = 40;
/// Board rows + 2 for borders
const GAME_HEIGHT: u16 = BOARD_HEIGHT as u16 + 2;

/// Short label for the state tag
pub fn state_label(state: GameState) -> &'static str {
    match state {
        GameState::Falling => "Falling",
        GameState::Landing => "Landing",
        GameState::GameOver => "Game Over",
    }
}

/// Color for one board cell. Occupied cells go gray once the game is over.
pub fn cell_color(id: u8, state: GameState) -> Color {
    match (id, state) {
        (EMPTY, _) => Color::Reset,
        (_, GameState::GameOver) => Color::DarkGray,
        (id, _) => color_of(id),
    }
}

/// Render the whole game screen
pub fn render_game(frame: &mut Frame, model: &Model, settings: &Settings) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_WIDTH as u16 * 2 + 2),
            Constraint::Min(16),
        ])
        .split(game_area);

    render_board(frame, layout[0], model, settings);
    render_stats(frame, layout[1], model, settings);

    if model.state == GameState::GameOver {
        let subtitle = format!("Press {} for a new game", settings.keys.new_game);
        render_overlay(frame, area, "GAME OVER", &subtitle);
    }
}

fn render_board(frame: &mut Frame, area: Rect, model: &Model, settings: &Settings) {
    let (block_char, empty_char) = settings.display.block_chars();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // The active piece is already written into the board
    let lines: Vec<Line> = model
        .board
        .rows()
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|&id| {
                    if id == EMPTY {
                        Span::styled(empty_char, Style::default().fg(Color::DarkGray))
                    } else {
                        Span::styled(block_char, Style::default().fg(cell_color(id, model.state)))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_stats(frame: &mut Frame, area: Rect, model: &Model, settings: &Settings) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let stat = |label: &'static str, value: String, color: Color| {
        [
            Line::from(Span::styled(label, Style::default().fg(Color::Gray))),
            Line::from(Span::styled(value, Style::default().fg(color).bold())),
            Line::raw(""),
        ]
    };

    let mut lines = Vec::new();
    lines.extend(stat("SCORE", model.score.to_string(), Color::Yellow));
    lines.extend(stat("LEVEL", model.level().to_string(), Color::Cyan));
    lines.extend(stat("LINES", model.lines.to_string(), Color::Green));
    lines.extend(stat("PIECES", model.pieces.to_string(), Color::White));
    lines.extend(stat(
        "STATE",
        state_label(model.state).to_string(),
        Color::Magenta,
    ));

    lines.push(Line::styled("a/s rotate", Style::default().fg(Color::DarkGray)));
    lines.push(Line::styled("j/k move", Style::default().fg(Color::DarkGray)));
    lines.push(Line::styled(
        format!("{} new  {} quit", settings.keys.new_game, settings.keys.quit),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_area = center_rect(area, 30, 5);

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
