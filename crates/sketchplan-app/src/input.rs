//! Pointer input for drawing tools
//!
//! Maps device-level pointer input to sketch events, with optional grid
//! snapping of every reported position.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use sketchplan_engine::{SketchEvent, SketchPoint};

use crate::config::InputConfig;

/// Pointer input in scene map coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerInput {
    /// Pointer moved
    Move { x: f32, y: f32 },
    /// Primary click
    Click { x: f32, y: f32 },
    /// Primary double click: commit the vertex and finish
    DoubleClick { x: f32, y: f32 },
    /// Secondary click: cancel the sketch in progress
    RightClick,
    /// Undo the last vertex
    RemoveVertex,
    /// Finish the sketch in progress
    Finish,
    /// Cancel the sketch in progress
    Escape,
}

/// Translates pointer input into sketch events
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputAdapter {
    pub snap_to_grid: bool,
    pub grid_spacing: f32,
}

impl Default for InputAdapter {
    fn default() -> Self {
        Self::from_config(&InputConfig::default())
    }
}

impl InputAdapter {
    pub fn from_config(config: &InputConfig) -> Self {
        Self {
            snap_to_grid: config.snap_to_grid,
            grid_spacing: config.grid_spacing,
        }
    }

    /// Apply grid snapping to a position
    pub fn snap(&self, position: Vec2) -> Vec2 {
        if self.snap_to_grid && self.grid_spacing > 0.0 {
            Vec2::new(
                (position.x / self.grid_spacing).round() * self.grid_spacing,
                (position.y / self.grid_spacing).round() * self.grid_spacing,
            )
        } else {
            position
        }
    }

    fn point(&self, x: f32, y: f32) -> SketchPoint {
        SketchPoint::from(self.snap(Vec2::new(x, y)))
    }

    /// Sketch events for one pointer input, in delivery order
    pub fn translate(&self, input: PointerInput) -> Vec<SketchEvent> {
        match input {
            PointerInput::Move { x, y } => vec![SketchEvent::CursorUpdate(self.point(x, y))],
            PointerInput::Click { x, y } => vec![SketchEvent::VertexAdd(self.point(x, y))],
            PointerInput::DoubleClick { x, y } => {
                vec![SketchEvent::VertexAdd(self.point(x, y)), SketchEvent::Finish]
            }
            PointerInput::RemoveVertex => vec![SketchEvent::VertexRemove],
            PointerInput::Finish => vec![SketchEvent::Finish],
            PointerInput::RightClick | PointerInput::Escape => vec![SketchEvent::Cancel],
        }
    }
}
