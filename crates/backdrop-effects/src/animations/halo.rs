//! Pulsing pastel halos with a slowly cycling hue. Not interactive.

use std::f32::consts::TAU;

use backdrop_core::{Effect, EffectKind, FrameClock, InputEvent, Rgba, Surface, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::random::between;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HaloConfig {
    pub count: usize,
    /// Hue in degrees of the first halo.
    pub base_hue: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    /// Radius swing of the pulse.
    pub pulse: f32,
    /// Wash the whole surface in translucent white on top.
    pub overlay: bool,
    pub overlay_opacity: f32,
}

impl Default for HaloConfig {
    fn default() -> Self {
        Self {
            count: 20,
            base_hue: 280.0,
            radius_min: 50.0,
            radius_max: 150.0,
            pulse: 20.0,
            overlay: false,
            overlay_opacity: 0.3,
        }
    }
}

impl HaloConfig {
    pub fn clamped(mut self) -> Self {
        self.count = self.count.min(500);
        self.base_hue = self.base_hue.rem_euclid(360.0);
        self.radius_min = self.radius_min.max(0.0);
        self.radius_max = self.radius_max.max(self.radius_min);
        self.overlay_opacity = self.overlay_opacity.clamp(0.0, 1.0);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HaloRing {
    pub center: Vec2,
    pub radius: f32,
    pub phase: f32,
}

pub struct Halo {
    config: HaloConfig,
    rng: StdRng,
    clock: FrameClock,
    width: f32,
    height: f32,
    halos: Vec<HaloRing>,
}

impl Halo {
    pub fn new(config: HaloConfig, seed: u64) -> Self {
        Self {
            config: config.clamped(),
            rng: StdRng::seed_from_u64(seed),
            clock: FrameClock::new(),
            width: 0.0,
            height: 0.0,
            halos: Vec::new(),
        }
    }

    pub fn halos(&self) -> &[HaloRing] {
        &self.halos
    }

    /// Hue and pulsed radius of halo `index` at time `t` in seconds.
    fn appearance(&self, index: usize, halo: &HaloRing, t: f32) -> (f32, f32) {
        let hue = (self.config.base_hue + index as f32 * 10.0 + t * 10.0).rem_euclid(360.0);
        let radius = (halo.radius + (t + halo.phase).sin() * self.config.pulse).max(0.0);
        (hue, radius)
    }
}

impl Effect for Halo {
    fn kind(&self) -> EffectKind {
        EffectKind::Halo
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        if width * height <= 0.0 {
            self.halos.clear();
            return;
        }
        let rng = &mut self.rng;
        let cfg = &self.config;
        self.halos = (0..cfg.count)
            .map(|_| HaloRing {
                center: Vec2::new(between(rng, 0.0, width), between(rng, 0.0, height)),
                radius: between(rng, cfg.radius_min, cfg.radius_max),
                phase: between(rng, 0.0, TAU),
            })
            .collect();
        tracing::debug!(halos = self.halos.len(), "halos placed");
    }

    fn handle_event(&mut self, event: &InputEvent) {
        if let InputEvent::Resize { width, height } = *event {
            self.resize(width, height);
        }
    }

    fn step(&mut self) {
        if self.width * self.height > 0.0 {
            self.clock.tick();
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        let t = self.clock.elapsed_secs();
        for (index, halo) in self.halos.iter().enumerate() {
            let (hue, radius) = self.appearance(index, halo, t);
            let color = Rgba::from_hsla(hue, 1.0, 0.85, 0.25);
            surface.glow(halo.center, radius, color, color.with_alpha(0.0));
        }
        if self.config.overlay {
            surface.fill(Rgba::WHITE.with_alpha(self.config.overlay_opacity));
        }
    }

    fn entity_count(&self) -> usize {
        self.halos.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::{DrawCommand, DrawList};

    #[test]
    fn test_regenerated_on_resize() {
        let mut effect = Halo::new(HaloConfig::default(), 5);
        effect.resize(500.0, 500.0);
        assert_eq!(effect.entity_count(), 20);
        let first = effect.halos().to_vec();
        effect.handle_event(&InputEvent::Resize {
            width: 300.0,
            height: 200.0,
        });
        assert_ne!(first, effect.halos());
        for halo in effect.halos() {
            assert!((0.0..300.0).contains(&halo.center.x));
            assert!((50.0..150.0).contains(&halo.radius));
        }
    }

    #[test]
    fn test_hue_and_pulse() {
        let mut effect = Halo::new(HaloConfig::default(), 5);
        effect.resize(500.0, 500.0);
        let ring = HaloRing {
            center: Vec2::ZERO,
            radius: 100.0,
            phase: 0.0,
        };
        let (hue, radius) = effect.appearance(3, &ring, 0.0);
        assert_eq!(hue, 310.0);
        assert_eq!(radius, 100.0);
        let (hue, _) = effect.appearance(10, &ring, 0.0);
        assert_eq!(hue, 20.0);
        let (_, radius) = effect.appearance(0, &ring, std::f32::consts::FRAC_PI_2);
        assert!((radius - 120.0).abs() < 1e-4);
    }

    #[test]
    fn test_overlay_is_painted_last() {
        let config = HaloConfig {
            overlay: true,
            ..HaloConfig::default()
        };
        let mut effect = Halo::new(config, 5);
        effect.resize(500.0, 500.0);
        effect.step();
        let mut list = DrawList::new(500.0, 500.0);
        effect.render(&mut list);
        assert_eq!(list.commands().len(), 21);
        assert!(matches!(list.commands().last(), Some(DrawCommand::Fill(c)) if (c.a - 0.3).abs() < 1e-6));
    }
}
