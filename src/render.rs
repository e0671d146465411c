//! Drawing surface abstraction
//!
//! The simulation never touches a real canvas. Hosts implement `Canvas` over
//! whatever backend they have; `RecordingCanvas` captures the draw calls for
//! headless runs and tests.

use glam::Vec2;

use crate::sim::color::Rgb;

/// Minimal 2D drawing interface the entities render through
pub trait Canvas {
    /// Fill the whole surface
    fn clear(&mut self, color: Rgb);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb);
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgb);
    /// Centered text; `alpha` in [0, 1]
    fn draw_text(&mut self, text: &str, position: Vec2, size: f32, color: Rgb, alpha: f32);
    /// Named sprite (animation frame set) centered at `position`
    fn draw_sprite(&mut self, name: &str, position: Vec2, rotation: f32, size: f32);
}

/// One captured draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgb),
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgb,
    },
    Polygon {
        points: Vec<Vec2>,
        color: Rgb,
    },
    Text {
        text: String,
        position: Vec2,
        alpha: f32,
    },
    Sprite {
        name: String,
        position: Vec2,
        rotation: f32,
    },
}

/// Canvas that stores every call in order
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Rgb) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgb) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
        });
    }

    fn draw_text(&mut self, text: &str, position: Vec2, _size: f32, _color: Rgb, alpha: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            alpha,
        });
    }

    fn draw_sprite(&mut self, name: &str, position: Vec2, rotation: f32, _size: f32) {
        self.commands.push(DrawCommand::Sprite {
            name: name.to_string(),
            position,
            rotation,
        });
    }
}
