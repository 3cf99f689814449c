//! Per-frame render pass
//!
//! Reads the game state and issues draw requests; never mutates anything.

use glam::Vec2;

use super::{Canvas, TextAnchor};
use crate::color::Color;
use crate::sim::{Edge, Field, GameMode, GamePhase, GameState, Rect, Side};

const DIVIDER_WIDTH: f32 = 5.0;
const SCORE_SIZE: f32 = 100.0;
/// Score distance from the field's movement-axis origin
const SCORE_OFFSET: f32 = 150.0;
const PADDLE_CORNER: f32 = 10.0;
const PADDLE_GLOW: f32 = 20.0;
const BALL_GLOW: f32 = 15.0;
const PARTICLE_RADIUS: f32 = 5.0;
const BANNER_SIZE: f32 = 150.0;
const HINT_SIZE: f32 = 60.0;
/// Pause button edge as a fraction of the shorter field side
const PAUSE_BUTTON_FRACTION: f32 = 0.1;

/// Hit area of the on-screen pause button (top-right corner)
pub fn pause_button(field: &Field) -> Rect {
    let size = field.width().min(field.height()) * PAUSE_BUTTON_FRACTION;
    let margin = size * 0.25;
    let origin = Vec2::new(field.width() - size - margin, margin);
    Rect::from_origin_size(origin, Vec2::splat(size))
}

/// Color a side's paddle is drawn in
pub fn paddle_color(side: Side) -> Color {
    match side {
        Side::Home => Color::MAGENTA,
        Side::Away => Color::CYAN,
    }
}

/// Draw one frame. Skips everything if the canvas has no surface.
pub fn render_frame<C: Canvas + ?Sized>(state: &GameState, canvas: &mut C) {
    if !canvas.begin_frame() {
        return;
    }

    let field = &state.field;
    canvas.clear(Color::BLACK);
    draw_divider(field, canvas);
    draw_scores(state, canvas);

    for side in [Side::Home, Side::Away] {
        let paddle = state.paddle(side);
        canvas.fill_round_rect(paddle.rect(), PADDLE_CORNER, paddle_color(side), PADDLE_GLOW);
    }
    canvas.fill_ellipse(state.ball.rect(), Color::GREEN, BALL_GLOW);

    for p in state.particles.iter().filter(|p| p.alive) {
        canvas.fill_circle(p.pos, PARTICLE_RADIUS, p.color, p.alpha);
    }

    draw_pause_button(field, canvas);

    let center = field.center();
    match state.phase() {
        GamePhase::Paused => {
            canvas.text("PAUSED", center, TextAnchor::Center, BANNER_SIZE, Color::WHITE);
        }
        GamePhase::GameOver => {
            if let Some(winner) = state.matches.winner() {
                let banner = winner_banner(state.mode, winner);
                canvas.text(banner, center, TextAnchor::Center, BANNER_SIZE, Color::WHITE);
            }
            let hint_at = center + Vec2::new(0.0, BANNER_SIZE);
            canvas.text("Tap to Restart", hint_at, TextAnchor::Center, HINT_SIZE, Color::WHITE);
        }
        GamePhase::Playing | GamePhase::ScoringDelay => {}
    }

    canvas.end_frame();
}

/// Line across the middle of the field, parallel to the paddles
fn draw_divider<C: Canvas + ?Sized>(field: &Field, canvas: &mut C) {
    let axis = field.movement_axis();
    let mid = field.approach_extent() * 0.5;
    let from = axis.compose(0.0, mid);
    let to = axis.compose(field.movement_extent(), mid);
    canvas.line(from, to, DIVIDER_WIDTH, Color::DARK_GRAY);
}

/// Each score sits in the middle of its own half
fn draw_scores<C: Canvas + ?Sized>(state: &GameState, canvas: &mut C) {
    let field = &state.field;
    let axis = field.movement_axis();
    for side in [Side::Home, Side::Away] {
        let quarter = match field.edge_of(side) {
            Edge::Min => 0.25,
            Edge::Max => 0.75,
        };
        let at = axis.compose(SCORE_OFFSET, field.approach_extent() * quarter);
        let score = state.matches.score(side).to_string();
        canvas.text(&score, at, TextAnchor::Center, SCORE_SIZE, Color::WHITE);
    }
}

fn draw_pause_button<C: Canvas + ?Sized>(field: &Field, canvas: &mut C) {
    let button = pause_button(field);
    let size = button.width();
    canvas.fill_round_rect(&button, size * 0.2, Color::DARK_GRAY, 0.0);
    let baseline = button.center() + Vec2::new(0.0, size * 0.2);
    canvas.text("II", baseline, TextAnchor::Center, size * 0.6, Color::WHITE);
}

fn winner_banner(mode: GameMode, winner: Side) -> &'static str {
    match (mode, winner) {
        (GameMode::LocalTwoPlayer, Side::Home) => "PLAYER 1 WINS",
        (GameMode::LocalTwoPlayer, Side::Away) => "PLAYER 2 WINS",
        (_, Side::Home) => "YOU WIN",
        (_, Side::Away) => "AI WINS",
    }
}
