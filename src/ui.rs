//! Layout and drawing: board with sliding tiles, score sidebar, win banner,
//! game-over overlay.

use crate::app::Screen;
use crate::game::GameSession;
use crate::grid::GRID_SIZE;
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::time::{Duration, Instant};
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Cell stride in terminal cells; tiles are drawn one smaller to leave a gap.
const CELL_W: u16 = 9;
const CELL_H: u16 = 4;
const TILE_W: u16 = 8;
const TILE_H: u16 = 3;

const SIDEBAR_WIDTH: u16 = 22;

/// How long a merged tile stays highlighted after the slide lands.
const MERGE_POP_MS: u64 = 150;
/// How long the "+N" score delta stays visible in the sidebar.
const DELTA_POPUP_MS: u64 = 1200;
/// Board fade on game over (TachyonFX).
const GAME_OVER_FADE_MS: u32 = 600;

/// Board size in terminal cells including the border.
fn board_pixel_size() -> (u16, u16) {
    let w = GRID_SIZE as u16 * CELL_W - 1;
    let h = GRID_SIZE as u16 * CELL_H - 1;
    (w + 2, h + 2)
}

/// Board (outer, with border) and sidebar rects, centered in `area`.
fn layout(area: Rect) -> (Rect, Rect) {
    let (bw, bh) = board_pixel_size();
    let total_w = bw + 1 + SIDEBAR_WIDTH;
    let x = area.x + area.width.saturating_sub(total_w) / 2;
    let y = area.y + area.height.saturating_sub(bh) / 2;
    let board = Rect {
        x,
        y,
        width: bw.min(area.width),
        height: bh.min(area.height),
    };
    let sidebar = Rect {
        x: (board.x + bw + 1).min(area.x + area.width),
        y,
        width: SIDEBAR_WIDTH.min(area.width.saturating_sub(bw + 1)),
        height: bh.min(area.height),
    };
    (board, sidebar)
}

/// Draw current screen. `last_move_at` drives the slide interpolation;
/// `slide_ms` matches the session's spawn delay so tiles land exactly when
/// the new tile appears. The game-over fade state lives in the caller.
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    session: &GameSession,
    theme: &Theme,
    last_move_at: Option<Instant>,
    now: Instant,
    slide_ms: u64,
    no_animation: bool,
    game_over_effect: &mut Option<Effect>,
    game_over_effect_time: &mut Option<Instant>,
    area: Rect,
) {
    let (board, sidebar) = layout(area);

    let progress = if no_animation || slide_ms == 0 {
        1.0
    } else {
        last_move_at.map_or(1.0, |start| {
            let elapsed = now.saturating_duration_since(start).as_millis() as f32;
            (elapsed / slide_ms as f32).min(1.0)
        })
    };

    draw_board(frame, session, theme, board, progress, last_move_at, now, slide_ms);
    draw_sidebar(frame, session, theme, sidebar, last_move_at, now);

    if screen == Screen::GameOver {
        if no_animation {
            frame.render_widget(
                Block::default().style(Style::default().bg(theme.board_bg)),
                board,
            );
        } else {
            apply_game_over_fade(frame, theme, board, game_over_effect, game_over_effect_time, now);
        }
        draw_game_over_overlay(frame, session, theme, board);
    }
}

fn draw_board(
    frame: &mut Frame,
    session: &GameSession,
    theme: &Theme,
    board: Rect,
    progress: f32,
    last_move_at: Option<Instant>,
    now: Instant,
    slide_ms: u64,
) {
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.main_fg))
            .style(Style::default().bg(theme.board_bg)),
        board,
    );
    let inner = Rect {
        x: board.x + 1,
        y: board.y + 1,
        width: board.width.saturating_sub(2),
        height: board.height.saturating_sub(2),
    };

    // Empty cell backdrop.
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let rect = cell_rect(inner, row as f32, col as f32);
            frame.render_widget(
                Block::default().style(Style::default().bg(theme.empty_cell)),
                rect,
            );
        }
    }

    // Merged and new tiles on top of sliding neighbours.
    let mut tiles: Vec<_> = session.grid.tiles().collect();
    tiles.sort_by_key(|t| (t.is_merged, t.is_new));

    let since_move = last_move_at.map(|start| now.saturating_duration_since(start));
    for tile in tiles {
        let row = lerp(tile.prev_row as f32, tile.row as f32, progress);
        let col = lerp(tile.prev_col as f32, tile.col as f32, progress);
        let rect = cell_rect(inner, row, col);

        let mut style = Style::default()
            .bg(theme.tile_color(tile.value))
            .fg(theme.tile_fg)
            .add_modifier(Modifier::BOLD);
        // Brief pop once a merge lands / a spawn appears.
        let pop_window = Duration::from_millis(slide_ms + MERGE_POP_MS);
        let landed = progress >= 1.0;
        if let Some(elapsed) = since_move {
            if elapsed < pop_window && ((tile.is_merged && landed) || tile.is_new) {
                style = style.add_modifier(Modifier::REVERSED);
            }
        }

        frame.render_widget(Block::default().style(style), rect);
        let text_rect = Rect {
            x: rect.x,
            y: rect.y + TILE_H / 2,
            width: rect.width,
            height: 1,
        }
        .intersection(rect);
        frame.render_widget(
            Paragraph::new(tile.value.to_string())
                .alignment(Alignment::Center)
                .style(style),
            text_rect,
        );
    }
}

/// Rect for a (possibly fractional, mid-slide) cell position, clipped to
/// the board interior so nothing is drawn outside a small terminal.
fn cell_rect(inner: Rect, row: f32, col: f32) -> Rect {
    let rect = Rect {
        x: inner.x + (col * CELL_W as f32).round() as u16,
        y: inner.y + (row * CELL_H as f32).round() as u16,
        width: TILE_W,
        height: TILE_H,
    };
    rect.intersection(inner)
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

fn draw_sidebar(
    frame: &mut Frame,
    session: &GameSession,
    theme: &Theme,
    sidebar: Rect,
    last_move_at: Option<Instant>,
    now: Instant,
) {
    if sidebar.width == 0 {
        return;
    }
    let delta_visible = session.score_delta > 0
        && last_move_at.is_some_and(|start| {
            now.saturating_duration_since(start) < Duration::from_millis(DELTA_POPUP_MS)
        });

    let title_style = Style::default().fg(theme.title).add_modifier(Modifier::BOLD);
    let label_style = Style::default().fg(theme.main_fg).add_modifier(Modifier::DIM);
    let value_style = Style::default().fg(theme.main_fg).add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled("2048", title_style)),
        Line::default(),
        Line::from(Span::styled("SCORE", label_style)),
        Line::from(vec![
            Span::styled(session.score.to_string(), value_style),
            if delta_visible {
                Span::styled(format!("  +{}", session.score_delta), title_style)
            } else {
                Span::raw("")
            },
        ]),
        Line::default(),
        Line::from(Span::styled("BEST", label_style)),
        Line::from(Span::styled(session.high_score.to_string(), value_style)),
        Line::default(),
    ];
    if session.has_won {
        lines.push(Line::from(Span::styled("YOU WIN!", title_style)));
        lines.push(Line::from(Span::styled("keep going", label_style)));
        lines.push(Line::default());
    }
    lines.push(Line::from(Span::styled("arrows/hjkl  move", label_style)));
    lines.push(Line::from(Span::styled("r  new game", label_style)));
    lines.push(Line::from(Span::styled("q  quit", label_style)));

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.main_fg)),
        ),
        sidebar,
    );
}

/// Create or update the game-over fade and process it (TachyonFX: fade the
/// board to its background colour, then keep it dimmed).
fn apply_game_over_fade(
    frame: &mut Frame,
    theme: &Theme,
    board: Rect,
    effect: &mut Option<Effect>,
    process_time: &mut Option<Instant>,
    now: Instant,
) {
    let delta = process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *process_time = Some(now);

    let bg = theme.board_bg;
    let effect = effect.get_or_insert_with(|| {
        fx::fade_to(bg, bg, (GAME_OVER_FADE_MS, Interpolation::Linear)).with_area(board)
    });
    if effect.done() {
        frame.render_widget(Block::default().style(Style::default().bg(bg)), board);
    } else {
        frame.render_effect(effect, board, TfxDuration::from_millis(delta_ms));
    }
}

fn draw_game_over_overlay(frame: &mut Frame, session: &GameSession, theme: &Theme, board: Rect) {
    let width = 24.min(board.width);
    let height = 7.min(board.height);
    let rect = Rect {
        x: board.x + board.width.saturating_sub(width) / 2,
        y: board.y + board.height.saturating_sub(height) / 2,
        width,
        height,
    };
    frame.render_widget(Clear, rect);

    let title_style = Style::default().fg(theme.title).add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(theme.main_fg);
    let lines = vec![
        Line::from(Span::styled("GAME OVER", title_style)),
        Line::default(),
        Line::from(Span::styled(format!("score  {}", session.score), text_style)),
        Line::from(Span::styled(format!("best   {}", session.high_score), text_style)),
        Line::default(),
        Line::from(Span::styled("r  new game   q  quit", text_style)),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(theme.board_bg))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.title)),
            ),
        rect,
    );
}
