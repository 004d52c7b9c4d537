//! Pointer and keyboard input shared by every effect.

use crate::geom::Vec2;

/// Keys the effects care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Shift,
    Char(char),
}

/// Normalized platform events delivered to an effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to a surface position.
    Move(Vec2),
    /// Pointer left the surface.
    Leave,
    /// Primary click (or tap) at a surface position.
    Click(Vec2),
    /// Primary button pressed.
    Press(Vec2),
    /// Primary button released.
    Release,
    KeyDown(Key),
    KeyUp(Key),
    /// Surface resized to the given dimensions.
    Resize { width: f32, height: f32 },
}

/// Whether pointer proximity pulls entities in or pushes them away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Repel,
    Attract,
}

/// How a move event sets the pointer intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntensitySource {
    /// `min(1, moved_distance / scale)`.
    Velocity { scale: f32 },
    /// Every move sets intensity to 1.
    Constant,
}

impl Default for IntensitySource {
    fn default() -> Self {
        IntensitySource::Velocity { scale: 8.0 }
    }
}

/// Latest pointer state for one effect instance.
#[derive(Debug, Clone, Default)]
pub struct Pointer {
    position: Option<Vec2>,
    last: Option<Vec2>,
    intensity: f32,
    mode: InteractionMode,
    dragging: bool,
    source: IntensitySource,
}

impl Pointer {
    pub fn new(source: IntensitySource) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    /// Current position, or `None` while the pointer is off the surface.
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Record a move and derive intensity from it.
    pub fn move_to(&mut self, position: Vec2) {
        self.intensity = match self.source {
            IntensitySource::Velocity { scale } => {
                let moved = self.last.map_or(position.length(), |l| l.distance(position));
                (moved / scale.max(f32::EPSILON)).clamp(0.0, 1.0)
            }
            IntensitySource::Constant => 1.0,
        };
        self.position = Some(position);
        self.last = Some(position);
    }

    pub fn leave(&mut self) {
        self.position = None;
    }

    /// Multiply intensity by `factor`; called once per tick.
    pub fn decay(&mut self, factor: f32) {
        self.intensity *= factor;
    }

    /// Apply a pointer or key event. Clicks and resizes are left to the effect.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Move(pos) => self.move_to(pos),
            InputEvent::Leave => self.leave(),
            InputEvent::Press(pos) => {
                self.dragging = true;
                self.position = Some(pos);
            }
            InputEvent::Release => self.dragging = false,
            InputEvent::KeyDown(Key::Shift) => self.mode = InteractionMode::Attract,
            InputEvent::KeyUp(Key::Shift) => self.mode = InteractionMode::Repel,
            InputEvent::Click(pos) => self.position = Some(pos),
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) | InputEvent::Resize { .. } => {}
        }
    }
}
