//! Play field and layout orientation

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Axis, Rect};
use crate::error::GameError;

/// Which way the paddles face each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Paddles at top and bottom, sliding horizontally; player at the bottom
    #[default]
    Portrait,
    /// Paddles at left and right, sliding vertically; player on the left
    Landscape,
}

/// One end of an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Min,
    Max,
}

/// The two halves of the field. Home is the local player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// The rectangular play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    width: f32,
    height: f32,
    orientation: Orientation,
}

impl Field {
    /// Dimensions must be finite and strictly positive; anything else is a
    /// precondition violation and never silently clamped.
    pub fn new(width: f32, height: f32, orientation: Orientation) -> Result<Self, GameError> {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(GameError::InvalidField { width, height });
        }
        Ok(Self {
            width,
            height,
            orientation,
        })
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn extent(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Axis the ball travels along between the paddles
    pub fn approach_axis(&self) -> Axis {
        match self.orientation {
            Orientation::Portrait => Axis::Y,
            Orientation::Landscape => Axis::X,
        }
    }

    /// Axis the paddles slide along (the ball's cross axis)
    pub fn movement_axis(&self) -> Axis {
        self.approach_axis().other()
    }

    pub fn approach_extent(&self) -> f32 {
        self.extent(self.approach_axis())
    }

    pub fn movement_extent(&self) -> f32 {
        self.extent(self.movement_axis())
    }

    /// Approach-axis edge a side defends
    pub fn edge_of(&self, side: Side) -> Edge {
        match (self.orientation, side) {
            (Orientation::Portrait, Side::Home) | (Orientation::Landscape, Side::Away) => Edge::Max,
            (Orientation::Portrait, Side::Away) | (Orientation::Landscape, Side::Home) => Edge::Min,
        }
    }

    /// Side defending an approach-axis edge
    pub fn side_at_edge(&self, edge: Edge) -> Side {
        if self.edge_of(Side::Home) == edge {
            Side::Home
        } else {
            Side::Away
        }
    }

    /// Which half of the field a point lies in
    pub fn side_of(&self, point: Vec2) -> Side {
        let axis = self.approach_axis();
        let edge = if axis.of(point) < self.approach_extent() * 0.5 {
            Edge::Min
        } else {
            Edge::Max
        };
        self.side_at_edge(edge)
    }
}
