//! Click ripples: transient rings that grow and fade, then disappear.

use crate::geom::Vec2;

/// How a ripple ages each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RippleDecay {
    /// Radius grows by `growth`, opacity drops by `fade`.
    /// The ripple is gone once opacity reaches zero.
    Fading { growth: f32, fade: f32 },
    /// Radius grows by `growth`, opacity is `1 - radius / max_radius`.
    /// The ripple is gone once the radius reaches `max_radius`.
    Bounded { growth: f32, max_radius: f32 },
}

/// A single transient ring. `P` is the origin type (2D or 3D).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple<P = Vec2> {
    pub center: P,
    pub radius: f32,
    pub opacity: f32,
    decay: RippleDecay,
}

impl<P> Ripple<P> {
    pub fn new(center: P, radius: f32, opacity: f32, decay: RippleDecay) -> Self {
        Self {
            center,
            radius,
            opacity,
            decay,
        }
    }

    /// Age by one tick. Returns `false` once the ripple has expired.
    pub fn step(&mut self) -> bool {
        match self.decay {
            RippleDecay::Fading { growth, fade } => {
                self.radius += growth;
                self.opacity = (self.opacity - fade).min(self.opacity);
                self.opacity > 0.0
            }
            RippleDecay::Bounded { growth, max_radius } => {
                self.radius += growth;
                let next = 1.0 - self.radius / max_radius;
                self.opacity = next.min(self.opacity);
                self.radius < max_radius
            }
        }
    }
}

/// All live ripples of one effect, spawned with a shared decay law.
#[derive(Debug, Clone)]
pub struct RippleField<P = Vec2> {
    ripples: Vec<Ripple<P>>,
    decay: RippleDecay,
    initial_radius: f32,
    initial_opacity: f32,
}

impl<P: Copy> RippleField<P> {
    pub fn new(decay: RippleDecay, initial_opacity: f32) -> Self {
        Self {
            ripples: Vec::new(),
            decay,
            initial_radius: 0.0,
            initial_opacity,
        }
    }

    /// Start new ripples at `radius` instead of zero.
    pub fn with_initial_radius(mut self, radius: f32) -> Self {
        self.initial_radius = radius;
        self
    }

    pub fn spawn(&mut self, center: P) {
        self.ripples.push(Ripple::new(
            center,
            self.initial_radius,
            self.initial_opacity,
            self.decay,
        ));
    }

    /// Age every ripple and drop the expired ones.
    pub fn step(&mut self) {
        self.ripples.retain_mut(Ripple::step);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ripple<P>> {
        self.ripples.iter()
    }

    pub fn len(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }

    pub fn clear(&mut self) {
        self.ripples.clear();
    }
}
