//! Layered hue-cycling aurora waves that bend away from the pointer.

use backdrop_core::{
    Effect, EffectKind, FrameClock, InputEvent, Pointer, Rgba, RippleDecay, RippleField, Surface,
    Vec2,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuroraConfig {
    pub layers: usize,
    /// Horizontal distance between wave sample points.
    pub sample_spacing: f32,
    pub mouse_radius: f32,
    /// Maximum upward bend at the pointer.
    pub distortion: f32,
    pub ripple_growth: f32,
    pub ripple_max_radius: f32,
    pub ripple_color: String,
}

impl Default for AuroraConfig {
    fn default() -> Self {
        Self {
            layers: 5,
            sample_spacing: 10.0,
            mouse_radius: 150.0,
            distortion: 20.0,
            ripple_growth: 3.0,
            ripple_max_radius: 120.0,
            ripple_color: "rgba(255, 255, 255, 0.2)".to_string(),
        }
    }
}

impl AuroraConfig {
    pub fn clamped(mut self) -> Self {
        self.layers = self.layers.clamp(1, 32);
        self.sample_spacing = self.sample_spacing.max(1.0);
        self.mouse_radius = self.mouse_radius.max(0.0);
        self.ripple_growth = self.ripple_growth.max(0.01);
        self.ripple_max_radius = self.ripple_max_radius.max(1.0);
        self
    }
}

/// One stroked wave.
#[derive(Debug, Clone, PartialEq)]
pub struct AuroraLayer {
    pub points: Vec<Vec2>,
    pub color: Rgba,
    pub line_width: f32,
}

pub struct Aurora {
    config: AuroraConfig,
    ripple_color: Rgba,
    clock: FrameClock,
    width: f32,
    height: f32,
    layers: Vec<AuroraLayer>,
    ripples: RippleField,
    pointer: Pointer,
}

impl Aurora {
    pub fn new(config: AuroraConfig) -> Self {
        let config = config.clamped();
        let ripple_color = Rgba::parse_or(&config.ripple_color, Rgba::WHITE.with_alpha(0.2));
        let ripples = RippleField::new(
            RippleDecay::Bounded {
                growth: config.ripple_growth,
                max_radius: config.ripple_max_radius,
            },
            1.0,
        );
        Self {
            config,
            ripple_color,
            clock: FrameClock::new(),
            width: 0.0,
            height: 0.0,
            layers: Vec::new(),
            ripples,
            pointer: Pointer::default(),
        }
    }

    pub fn layers(&self) -> &[AuroraLayer] {
        &self.layers
    }

    /// Recompute every layer's polyline for time `t` in seconds.
    fn trace(&mut self, t: f32) {
        let cfg = &self.config;
        let mouse = self.pointer.position();
        let samples = (self.width / cfg.sample_spacing).floor() as usize + 1;
        self.layers = (0..cfg.layers)
            .map(|layer| {
                let l = layer as f32;
                let wave_height = 30.0 + l * 10.0;
                let offset = t * 0.5 + l * 50.0;
                let hue = (t * 10.0 + l * 50.0).rem_euclid(360.0);
                let points = (0..samples)
                    .map(|i| {
                        let x = i as f32 * cfg.sample_spacing;
                        let y = self.height / 2.0
                            + (x * 0.01 + offset).sin() * wave_height
                            + (x * 0.02 + offset * 1.3).sin() * wave_height / 2.0;
                        let bend = mouse.map_or(0.0, |m| {
                            let d = m.distance(Vec2::new(x, y));
                            if d < cfg.mouse_radius {
                                (cfg.mouse_radius - d) / cfg.mouse_radius * cfg.distortion
                            } else {
                                0.0
                            }
                        });
                        Vec2::new(x, y - bend)
                    })
                    .collect();
                AuroraLayer {
                    points,
                    color: Rgba::from_hsla(hue, 1.0, 0.7, 0.05 + l * 0.05),
                    line_width: 2.0 + l * 1.5,
                }
            })
            .collect();
    }
}

impl Effect for Aurora {
    fn kind(&self) -> EffectKind {
        EffectKind::Aurora
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.ripples.clear();
        self.layers.clear();
        if width * height > 0.0 {
            self.trace(self.clock.elapsed_secs());
        }
    }

    fn handle_event(&mut self, event: &InputEvent) {
        self.pointer.apply(event);
        match *event {
            InputEvent::Click(pos) => self.ripples.spawn(pos),
            InputEvent::Resize { width, height } => self.resize(width, height),
            _ => {}
        }
    }

    fn step(&mut self) {
        if self.width * self.height <= 0.0 {
            return;
        }
        self.clock.tick();
        self.trace(self.clock.elapsed_secs());
        self.ripples.step();
    }

    fn render(&self, surface: &mut dyn Surface) {
        for layer in &self.layers {
            surface.polyline(&layer.points, layer.line_width, layer.color);
        }
        for ripple in self.ripples.iter() {
            surface.stroke_circle(
                ripple.center,
                ripple.radius,
                2.0,
                self.ripple_color.with_alpha(ripple.opacity * 0.8),
            );
        }
    }

    fn entity_count(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aurora() -> Aurora {
        let mut effect = Aurora::new(AuroraConfig::default());
        effect.resize(400.0, 300.0);
        effect
    }

    #[test]
    fn test_layer_styles() {
        let effect = aurora();
        let layers = effect.layers();
        assert_eq!(layers.len(), 5);
        assert_eq!(layers[0].points.len(), 41);
        assert_eq!(layers[4].line_width, 8.0);
        assert!((layers[0].color.a - 0.05).abs() < 1e-6);
        assert!((layers[4].color.a - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_waves_centre_on_midline() {
        let effect = aurora();
        // at t = 0 and x = 0 the first layer sits exactly on the midline
        assert!((effect.layers()[0].points[0].y - 150.0).abs() < 1e-4);
        for layer in effect.layers() {
            for p in &layer.points {
                assert!((p.y - 150.0).abs() <= 1.5 * 70.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_pointer_bends_nearby_samples_up() {
        let mut calm = aurora();
        let mut bent = aurora();
        let sample = calm.layers()[0].points[20];
        bent.handle_event(&InputEvent::Move(sample));
        calm.step();
        bent.step();
        let (a, b) = (calm.layers()[0].points[20], bent.layers()[0].points[20]);
        assert!(a.y - b.y > 19.0);
        let (far_a, far_b) = (calm.layers()[0].points[0], bent.layers()[0].points[0]);
        assert_eq!(far_a, far_b);
    }

    #[test]
    fn test_ripple_bounded_by_max_radius() {
        let mut effect = aurora();
        effect.handle_event(&InputEvent::Click(Vec2::new(10.0, 10.0)));
        for _ in 0..39 {
            effect.step();
        }
        assert_eq!(effect.ripples.len(), 1);
        effect.step();
        assert!(effect.ripples.is_empty());
    }
}
