//! Rendering boundary
//!
//! The core never touches pixels. Each frame it issues draw requests against
//! a [`Canvas`]; a platform backend (or the [`CommandRecorder`] in headless
//! runs) decides what to do with them.

pub mod draw;
pub mod recorder;

pub use draw::{pause_button, render_frame};
pub use recorder::{CommandRecorder, DrawCommand};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::sim::Rect;

/// Horizontal anchoring of a text run relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    Left,
    Center,
    Right,
}

/// An abstract 2D drawing surface
pub trait Canvas {
    /// Acquire the surface for a new frame. Returns false when no surface is
    /// available (minimised window, lost context); the frame is skipped.
    fn begin_frame(&mut self) -> bool;

    /// Present the frame started by `begin_frame`
    fn end_frame(&mut self);

    /// Fill the whole surface
    fn clear(&mut self, color: Color);

    /// Rounded rectangle with an outer glow of radius `glow`
    fn fill_round_rect(&mut self, rect: &Rect, corner: f32, color: Color, glow: f32);

    /// Ellipse inscribed in `rect`, with an outer glow of radius `glow`
    fn fill_ellipse(&mut self, rect: &Rect, color: Color, glow: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: u8);

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color);

    /// Text with its baseline at `at.y`
    fn text(&mut self, text: &str, at: Vec2, anchor: TextAnchor, size: f32, color: Color);
}
