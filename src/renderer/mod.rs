//! Rendering module
//!
//! The game never talks to a graphics API directly. It composes each frame
//! onto a `Surface`, a minimal 2D drawing target the host implements (canvas,
//! GPU batcher, terminal, or the recorder used in tests).

pub mod scene;

pub use scene::render_frame;

use glam::Vec2;

/// RGBA, each channel 0..=1
pub type Color = [f32; 4];

pub mod palette {
    use super::Color;

    pub const SPACE: Color = [0.02, 0.02, 0.06, 1.0];
    pub const STAR: Color = [0.85, 0.85, 1.0, 1.0];
    pub const HERO: Color = [0.3, 0.9, 1.0, 1.0];
    pub const ENEMY: Color = [1.0, 0.35, 0.3, 1.0];
    pub const HERO_SHOT: Color = [0.6, 1.0, 0.6, 1.0];
    pub const ENEMY_SHOT: Color = [1.0, 0.6, 0.2, 1.0];
    pub const MOTE: Color = [0.9, 0.8, 0.5, 1.0];
    pub const STATION: Color = [0.7, 0.7, 0.8, 1.0];
    pub const STATION_VISITED: Color = [0.4, 0.4, 0.45, 1.0];
    pub const MAGWAVE: Color = [0.4, 0.6, 1.0, 0.35];
    pub const TEXT: Color = [1.0, 1.0, 1.0, 1.0];
    pub const DIM: Color = [0.0, 0.0, 0.0, 0.6];
    pub const WARP_BAR: Color = [0.9, 0.5, 1.0, 1.0];
    pub const MAGWAVE_BAR: Color = [0.4, 0.7, 1.0, 1.0];
    pub const XP_BAR: Color = [1.0, 0.85, 0.3, 1.0];

    pub const WALL: Color = [0.35, 0.35, 0.4, 1.0];
    pub const FLOOR: Color = [0.12, 0.12, 0.15, 1.0];
    pub const CORRIDOR: Color = [0.1, 0.1, 0.12, 1.0];
    pub const DOOR: Color = [0.55, 0.4, 0.2, 1.0];
    pub const DOCK: Color = [0.2, 0.6, 0.3, 1.0];
    pub const BRIDGE: Color = [0.2, 0.3, 0.6, 1.0];
    pub const ENGINE: Color = [0.6, 0.25, 0.2, 1.0];
    pub const STORAGE: Color = [0.45, 0.4, 0.2, 1.0];
    pub const WALKER: Color = [0.3, 0.9, 1.0, 1.0];
    pub const NPC: Color = [0.95, 0.75, 0.6, 1.0];

    /// Particle tints by index: hero debris, enemy debris
    pub const PARTICLES: [Color; 2] = [[0.3, 0.9, 1.0, 1.0], [1.0, 0.6, 0.3, 1.0]];
}

/// Scale a colour's alpha
pub fn fade(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Minimal 2D drawing target
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color);
    /// Polyline through `points`; `closed` joins the last point to the first
    fn stroke_path(&mut self, points: &[Vec2], closed: bool, width: f32, color: Color);
    /// Filled circle sector from `start` to `end` radians
    fn fill_arc(&mut self, center: Vec2, radius: f32, start: f32, end: f32, color: Color);
    fn text(&mut self, pos: Vec2, size: f32, text: &str, color: Color);
}

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Rect { pos: Vec2, size: Vec2, color: Color },
    Path { points: Vec<Vec2>, closed: bool, color: Color },
    Arc { center: Vec2, radius: f32, color: Color },
    Text { pos: Vec2, text: String },
}

/// Surface that stores commands instead of drawing. Used headless and in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        // A clear wipes everything before it
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::Rect { pos, size, color });
    }

    fn stroke_path(&mut self, points: &[Vec2], closed: bool, _width: f32, color: Color) {
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            closed,
            color,
        });
    }

    fn fill_arc(&mut self, center: Vec2, radius: f32, _start: f32, _end: f32, color: Color) {
        self.commands.push(DrawCommand::Arc {
            center,
            radius,
            color,
        });
    }

    fn text(&mut self, pos: Vec2, _size: f32, text: &str, _color: Color) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
        });
    }
}
