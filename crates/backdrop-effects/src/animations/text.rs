//! Text drawn as a cloud of particles that scatter from the pointer and
//! spring back into the letters.

use backdrop_core::{Effect, EffectKind, InputEvent, Pointer, Rgba, Surface, Vec2, radial_force};
use backdrop_fonts::{TextMask, text_mask};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::random::spread;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextParticlesConfig {
    pub text: String,
    /// Cap height of the rendered text.
    pub font_size: f32,
    /// Sampling step in surface units; one particle per filled sample.
    pub density: f32,
    /// Upper bound on the particle count.
    pub max_particles: usize,
    /// Initial random offset from the target, per axis.
    pub jitter: f32,
    pub particle_size: f32,
    pub mouse_radius: f32,
    pub push: f32,
    pub spring: f32,
    pub friction: f32,
    pub color: String,
}

impl Default for TextParticlesConfig {
    fn default() -> Self {
        Self {
            text: "BACKDROP".to_string(),
            font_size: 120.0,
            density: 4.0,
            max_particles: 20_000,
            jitter: 5.0,
            particle_size: 1.5,
            mouse_radius: 80.0,
            push: 0.5,
            spring: 0.01,
            friction: 0.9,
            color: "rgba(255, 255, 255, 0.9)".to_string(),
        }
    }
}

impl TextParticlesConfig {
    pub fn clamped(mut self) -> Self {
        self.font_size = self.font_size.max(1.0);
        self.density = self.density.max(1.0);
        self.jitter = self.jitter.max(0.0);
        self.particle_size = self.particle_size.max(0.1);
        self.mouse_radius = self.mouse_radius.max(0.0);
        self.spring = self.spring.clamp(0.0, 1.0);
        self.friction = self.friction.clamp(0.0, 1.0);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextParticle {
    pub position: Vec2,
    /// Resting place inside a letter.
    pub target: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub opacity: f32,
}

pub struct TextParticles {
    config: TextParticlesConfig,
    color: Rgba,
    mask: TextMask,
    rng: StdRng,
    width: f32,
    height: f32,
    particles: Vec<TextParticle>,
    pointer: Pointer,
}

impl TextParticles {
    pub fn new(config: TextParticlesConfig, seed: u64) -> Self {
        let config = config.clamped();
        let color = Rgba::parse_or(&config.color, Rgba::WHITE.with_alpha(0.9));
        let mask = text_mask(&config.text);
        Self {
            config,
            color,
            mask,
            rng: StdRng::seed_from_u64(seed),
            width: 0.0,
            height: 0.0,
            particles: Vec::new(),
            pointer: Pointer::default(),
        }
    }

    pub fn particles(&self) -> &[TextParticle] {
        &self.particles
    }

    /// Sample points of the surface that fall inside the centred text.
    fn targets(&self) -> Vec<Vec2> {
        let mask = &self.mask;
        if mask.width() == 0 {
            return Vec::new();
        }
        let cell = (self.config.font_size / mask.height() as f32)
            .min(self.width * 0.9 / mask.width() as f32);
        if cell <= 0.0 {
            return Vec::new();
        }
        let (text_w, text_h) = (cell * mask.width() as f32, cell * mask.height() as f32);
        let left = (self.width - text_w) / 2.0;
        let top = (self.height - text_h) / 2.0;
        let step = self.config.density;

        let mut targets = Vec::new();
        let mut y = (top / step).ceil() * step;
        while y < top + text_h {
            let mut x = (left / step).ceil() * step;
            while x < left + text_w {
                let col = ((x - left) / cell).floor() as usize;
                let row = ((y - top) / cell).floor() as usize;
                if mask.is_set(col, row) {
                    targets.push(Vec2::new(x, y));
                }
                x += step;
            }
            y += step;
        }
        targets
    }

    fn init(&mut self) {
        let mut targets = self.targets();
        if targets.len() > self.config.max_particles {
            tracing::warn!(
                samples = targets.len(),
                max = self.config.max_particles,
                "text sample count capped"
            );
            targets.truncate(self.config.max_particles);
        }
        let rng = &mut self.rng;
        let cfg = &self.config;
        self.particles = targets
            .into_iter()
            .map(|target| TextParticle {
                position: target + Vec2::new(spread(rng, cfg.jitter), spread(rng, cfg.jitter)),
                target,
                velocity: Vec2::ZERO,
                size: cfg.particle_size,
                opacity: 1.0,
            })
            .collect();
        tracing::debug!(particles = self.particles.len(), text = %cfg.text, "text particles initialized");
    }
}

impl Effect for TextParticles {
    fn kind(&self) -> EffectKind {
        EffectKind::TextParticles
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        if width * height <= 0.0 {
            self.particles.clear();
            return;
        }
        self.init();
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
        let mouse = self.pointer.position();
        for p in &mut self.particles {
            if let Some(mouse) = mouse {
                if let Some(force) = radial_force(p.position, mouse, cfg.mouse_radius) {
                    let strength = cfg.mouse_radius / force.distance.max(1.0);
                    p.velocity += force.direction * (strength * cfg.push);
                }
            }
            p.velocity += (p.target - p.position) * cfg.spring;
            p.velocity *= cfg.friction;
            p.position += p.velocity;
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        for p in &self.particles {
            surface.fill_circle(p.position, p.size, self.color.with_alpha(self.color.a * p.opacity));
        }
    }

    fn entity_count(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter_i() -> TextParticles {
        let config = TextParticlesConfig {
            text: "I".to_string(),
            font_size: 70.0,
            density: 5.0,
            ..TextParticlesConfig::default()
        };
        let mut effect = TextParticles::new(config, 4);
        effect.resize(400.0, 300.0);
        effect
    }

    #[test]
    fn test_targets_sample_the_letters() {
        let effect = letter_i();
        // 15 filled cells of 10 px, four samples each
        assert_eq!(effect.entity_count(), 60);
        for p in effect.particles() {
            assert!((175.0..225.0).contains(&p.target.x));
            assert!((115.0..185.0).contains(&p.target.y));
            assert!(p.position.distance(p.target) <= 5.0 * std::f32::consts::SQRT_2 + 1e-4);
        }
    }

    #[test]
    fn test_wide_text_is_scaled_to_fit() {
        let config = TextParticlesConfig {
            density: 1.0,
            ..TextParticlesConfig::default()
        };
        let mut effect = TextParticles::new(config, 4);
        effect.resize(200.0, 200.0);
        assert!(effect.entity_count() > 0);
        for p in effect.particles() {
            assert!(p.target.x >= 9.99 && p.target.x <= 190.01);
        }
    }

    #[test]
    fn test_pointer_scatters_particles() {
        let mut effect = letter_i();
        effect.particles.truncate(1);
        let p = &mut effect.particles[0];
        p.position = p.target;
        let start = p.position;
        effect.handle_event(&InputEvent::Move(start + Vec2::new(10.0, 0.0)));
        effect.step();
        // 80 / 10 * 0.5 away, then friction
        assert!((effect.particles[0].velocity.x + 3.6).abs() < 1e-4);
        assert!(effect.particles[0].position.x < start.x);
    }

    #[test]
    fn test_particles_spring_back() {
        let mut effect = letter_i();
        let first_target = effect.particles()[0].target;
        effect.handle_event(&InputEvent::Move(first_target));
        for _ in 0..10 {
            effect.step();
        }
        assert!(effect.particles()[0].position.distance(first_target) > 1.0);
        effect.handle_event(&InputEvent::Leave);
        for _ in 0..400 {
            effect.step();
        }
        for p in effect.particles() {
            assert!(p.position.distance(p.target) < 0.5);
        }
    }

    #[test]
    fn test_zero_area_keeps_no_particles() {
        let mut effect = letter_i();
        effect.resize(0.0, 300.0);
        assert_eq!(effect.entity_count(), 0);
        effect.step();
    }
}
