//! The drawing surface effects paint onto.
//!
//! Effects only ever see `&mut dyn Surface`. The host decides how the
//! primitives end up on screen; [`DrawList`] records them so a host can
//! rasterize later and tests can inspect what was drawn.

use crate::color::Rgba;
use crate::geom::Vec2;

/// Immediate-mode 2D drawing primitives in surface coordinates
/// (origin top-left, y grows downward).
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Erase everything drawn this frame.
    fn clear(&mut self);
    /// Cover the whole surface with a colour.
    fn fill(&mut self, color: Rgba);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
    /// Text horizontally and vertically centred on `at`.
    fn text(&mut self, at: Vec2, text: &str, size: f32, color: Rgba);
    /// Radial gradient disc from `inner` at the centre to `outer` at `radius`.
    fn glow(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba);

    /// Connected line segments through `points`.
    fn polyline(&mut self, points: &[Vec2], width: f32, color: Rgba) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], width, color);
        }
    }

    fn area(&self) -> f32 {
        self.width() * self.height()
    }
}

/// One recorded drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill(Rgba),
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
    Text {
        at: Vec2,
        text: String,
        size: f32,
        color: Rgba,
    },
    Glow {
        center: Vec2,
        radius: f32,
        inner: Rgba,
        outer: Rgba,
    },
}

/// A surface that records commands in paint order.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Surface for DrawList {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn fill(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Fill(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            width,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn text(&mut self, at: Vec2, text: &str, size: f32, color: Rgba) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            size,
            color,
        });
    }

    fn glow(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        self.commands.push(DrawCommand::Glow {
            center,
            radius,
            inner,
            outer,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_list_records_in_order() {
        let mut list = DrawList::new(100.0, 50.0);
        list.fill(Rgba::BLACK);
        list.polyline(
            &[Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)],
            1.0,
            Rgba::WHITE,
        );
        assert_eq!(list.commands().len(), 3);
        assert_eq!(list.commands()[0], DrawCommand::Fill(Rgba::BLACK));
        assert_eq!(list.area(), 5000.0);
        list.clear();
        assert!(list.is_empty());
    }
}
