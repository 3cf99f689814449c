//! Canvas that records draw calls instead of rasterising them

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{Canvas, TextAnchor};
use crate::color::Color;
use crate::sim::Rect;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Clear(Color),
    RoundRect {
        rect: Rect,
        corner: f32,
        color: Color,
        glow: f32,
    },
    Ellipse {
        rect: Rect,
        color: Color,
        glow: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        alpha: u8,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
    Text {
        text: String,
        at: Vec2,
        anchor: TextAnchor,
        size: f32,
        color: Color,
    },
}

/// Keeps the commands of the most recent completed frame
#[derive(Debug, Default)]
pub struct CommandRecorder {
    current: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    frames: u64,
    /// When false `begin_frame` refuses, simulating a lost surface
    available: bool,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self {
            available: true,
            ..Default::default()
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Commands of the last presented frame
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    /// Number of frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Text runs in the last frame, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.last_frame
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for CommandRecorder {
    fn begin_frame(&mut self) -> bool {
        if !self.available {
            return false;
        }
        self.current.clear();
        true
    }

    fn end_frame(&mut self) {
        std::mem::swap(&mut self.current, &mut self.last_frame);
        self.current.clear();
        self.frames += 1;
    }

    fn clear(&mut self, color: Color) {
        self.current.push(DrawCommand::Clear(color));
    }

    fn fill_round_rect(&mut self, rect: &Rect, corner: f32, color: Color, glow: f32) {
        self.current.push(DrawCommand::RoundRect {
            rect: *rect,
            corner,
            color,
            glow,
        });
    }

    fn fill_ellipse(&mut self, rect: &Rect, color: Color, glow: f32) {
        self.current.push(DrawCommand::Ellipse {
            rect: *rect,
            color,
            glow,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: u8) {
        self.current.push(DrawCommand::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        self.current.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn text(&mut self, text: &str, at: Vec2, anchor: TextAnchor, size: f32, color: Color) {
        self.current.push(DrawCommand::Text {
            text: text.to_owned(),
            at,
            anchor,
            size,
            color,
        });
    }
}
