//! Wispy smoke: particles that drift, flee the pointer and leave fading streaks.

use backdrop_core::{
    Boundary, BoundaryOutcome, Effect, EffectKind, InputEvent, Pointer, Rgba, Surface, Trail,
    Vec2, radial_force,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::random::{between, spread};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    pub count: usize,
    pub mouse_radius: f32,
    pub repulsion: f32,
    pub friction: f32,
    /// Streak length in ticks.
    pub trail_length: usize,
    /// Opacity kept by each streak point per tick.
    pub trail_fade: f32,
    pub particle_color: String,
    pub line_width: f32,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            count: 300,
            mouse_radius: 100.0,
            repulsion: 0.3,
            friction: 0.96,
            trail_length: 20,
            trail_fade: 0.92,
            particle_color: "rgba(255, 255, 255, 0.15)".to_string(),
            line_width: 1.0,
        }
    }
}

impl SmokeConfig {
    pub fn clamped(mut self) -> Self {
        self.count = self.count.min(5000);
        self.mouse_radius = self.mouse_radius.max(0.0);
        self.friction = self.friction.clamp(0.0, 1.0);
        self.trail_length = self.trail_length.clamp(2, 200);
        self.trail_fade = self.trail_fade.clamp(0.0, 1.0);
        self.line_width = self.line_width.max(0.1);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Wisp {
    pub position: Vec2,
    pub velocity: Vec2,
    trail: Trail,
}

impl Wisp {
    pub fn trail(&self) -> &Trail {
        &self.trail
    }
}

pub struct Smoke {
    config: SmokeConfig,
    color: Rgba,
    rng: StdRng,
    width: f32,
    height: f32,
    wisps: Vec<Wisp>,
    pointer: Pointer,
}

impl Smoke {
    pub fn new(config: SmokeConfig, seed: u64) -> Self {
        let config = config.clamped();
        let color = Rgba::parse_or(&config.particle_color, Rgba::WHITE.with_alpha(0.15));
        Self {
            config,
            color,
            rng: StdRng::seed_from_u64(seed),
            width: 0.0,
            height: 0.0,
            wisps: Vec::new(),
            pointer: Pointer::default(),
        }
    }

    pub fn wisps(&self) -> &[Wisp] {
        &self.wisps
    }
}

impl Effect for Smoke {
    fn kind(&self) -> EffectKind {
        EffectKind::Smoke
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        if width * height <= 0.0 {
            self.wisps.clear();
            return;
        }
        let rng = &mut self.rng;
        let trail_length = self.config.trail_length;
        self.wisps = (0..self.config.count)
            .map(|_| {
                let position = Vec2::new(between(rng, 0.0, width), between(rng, 0.0, height));
                let mut trail = Trail::new(trail_length);
                trail.push(position);
                Wisp {
                    position,
                    velocity: Vec2::new(spread(rng, 0.25), spread(rng, 0.25)),
                    trail,
                }
            })
            .collect();
        tracing::debug!(wisps = self.wisps.len(), "smoke initialized");
    }

    fn handle_event(&mut self, event: &InputEvent) {
        self.pointer.apply(event);
        if let InputEvent::Resize { width, height } = *event {
            self.resize(width, height);
        }
    }

    fn step(&mut self) {
        if self.width * self.height <= 0.0 {
            return;
        }
        let cfg = &self.config;
        let wrap = Boundary::Wrap { margin: 0.0 };
        for wisp in &mut self.wisps {
            if let Some(mouse) = self.pointer.position() {
                if let Some(force) = radial_force(wisp.position, mouse, cfg.mouse_radius) {
                    wisp.velocity += force.repel(cfg.repulsion);
                }
            }
            wisp.velocity *= cfg.friction;
            wisp.position += wisp.velocity;
            wisp.trail.fade(cfg.trail_fade);
            let outcome = wrap.apply(&mut wisp.position, &mut wisp.velocity, self.width, self.height);
            if outcome == BoundaryOutcome::Wrapped {
                // no streak across the surface
                wisp.trail.clear();
            }
            wisp.trail.push(wisp.position);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        for wisp in &self.wisps {
            let points: Vec<_> = wisp.trail.iter().collect();
            for pair in points.windows(2) {
                let alpha = self.color.a * pair[0].opacity;
                surface.line(
                    pair[0].position,
                    pair[1].position,
                    self.config.line_width,
                    self.color.with_alpha(alpha),
                );
            }
        }
    }

    fn entity_count(&self) -> usize {
        self.wisps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::DrawList;

    fn smoke() -> Smoke {
        let mut effect = Smoke::new(SmokeConfig::default(), 8);
        effect.resize(640.0, 480.0);
        effect
    }

    #[test]
    fn test_fixed_population() {
        let effect = smoke();
        assert_eq!(effect.entity_count(), 300);
        assert!(effect.wisps().iter().all(|w| w.velocity.x.abs() < 0.25));
    }

    #[test]
    fn test_pointer_pushes_wisps_away() {
        let mut effect = smoke();
        effect.wisps.truncate(1);
        effect.wisps[0].position = Vec2::new(300.0, 200.0);
        effect.wisps[0].velocity = Vec2::ZERO;
        effect.handle_event(&InputEvent::Move(Vec2::new(250.0, 200.0)));
        effect.step();
        // force 0.5 * 0.3 then friction 0.96
        assert!((effect.wisps[0].velocity.x - 0.144).abs() < 1e-5);
        assert!(effect.wisps[0].position.x > 300.0);
    }

    #[test]
    fn test_streaks_are_bounded_and_fade() {
        let mut effect = smoke();
        for _ in 0..100 {
            effect.step();
        }
        for wisp in effect.wisps() {
            assert!(wisp.trail().len() <= 20);
            if let Some(oldest) = wisp.trail().oldest() {
                assert!(oldest.opacity <= 1.0);
            }
            assert!((0.0..=640.0).contains(&wisp.position.x));
        }
        let mut list = DrawList::new(640.0, 480.0);
        effect.render(&mut list);
        assert!(!list.is_empty());
    }

    #[test]
    fn test_wrap_breaks_streak() {
        let mut effect = smoke();
        effect.wisps.truncate(1);
        effect.wisps[0].position = Vec2::new(639.9, 10.0);
        effect.wisps[0].velocity = Vec2::new(1.0, 0.0);
        effect.step();
        assert_eq!(effect.wisps[0].position.x, 0.0);
        assert_eq!(effect.wisps[0].trail().len(), 1);
    }
}
