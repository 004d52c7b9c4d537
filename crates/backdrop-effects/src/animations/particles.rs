//! Drifting particle field with proximity links and click ripples.

use backdrop_core::{
    Boundary, Connection, ConnectionScan, Effect, EffectKind, FrameClock, InputEvent, Pointer,
    Rgba, RippleDecay, RippleField, Surface, Vec2, radial_force,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::random::{angle, between, chance, population, spread};

/// Tuning for [`Particles`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticlesConfig {
    /// Fixed particle count. Derived from the surface area when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Surface area per particle when `count` is unset.
    pub area_per_particle: f32,
    /// Upper bound on the derived count.
    pub max_count: usize,
    /// Probability that a particle is a fast streaking shooter.
    pub shooter_chance: f32,
    /// Pointer attraction radius.
    pub mouse_radius: f32,
    pub attraction: f32,
    pub damping: f32,
    /// Velocity kept (and inverted) on an edge bounce.
    pub restitution: f32,
    /// Particles further than `center_radius * min(w, h)` from the centre drift back.
    pub center_radius: f32,
    pub center_pull: f32,
    pub connection_distance: f32,
    pub connection_opacity: f32,
    pub ripple_growth: f32,
    pub ripple_max_radius: f32,
    /// Half-width of the ring that pushes particles outward.
    pub ripple_band: f32,
    pub ripple_push: f32,
    /// Static background dots per particle.
    pub background_ratio: f32,
    pub particle_color: String,
    pub connection_color: String,
    pub ripple_color: String,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            count: None,
            area_per_particle: 8000.0,
            max_count: 1000,
            shooter_chance: 0.05,
            mouse_radius: 150.0,
            attraction: 0.008,
            damping: 0.985,
            restitution: 0.3,
            center_radius: 0.4,
            center_pull: 0.001,
            connection_distance: 120.0,
            connection_opacity: 0.3,
            ripple_growth: 3.0,
            ripple_max_radius: 150.0,
            ripple_band: 20.0,
            ripple_push: 0.8,
            background_ratio: 0.3,
            particle_color: "rgba(255, 255, 255, 0.8)".to_string(),
            connection_color: "rgba(255, 255, 255, 0.1)".to_string(),
            ripple_color: "rgba(255, 255, 255, 0.8)".to_string(),
        }
    }
}

impl ParticlesConfig {
    /// Clamp every parameter into its valid range.
    pub fn clamped(mut self) -> Self {
        self.area_per_particle = self.area_per_particle.max(1.0);
        self.shooter_chance = self.shooter_chance.clamp(0.0, 1.0);
        self.mouse_radius = self.mouse_radius.max(0.0);
        self.damping = self.damping.clamp(0.0, 1.0);
        self.restitution = self.restitution.clamp(0.0, 1.0);
        self.center_radius = self.center_radius.max(0.0);
        self.connection_distance = self.connection_distance.max(0.0);
        self.connection_opacity = self.connection_opacity.clamp(0.0, 1.0);
        self.ripple_growth = self.ripple_growth.max(0.01);
        self.ripple_max_radius = self.ripple_max_radius.max(1.0);
        self.ripple_band = self.ripple_band.max(0.0);
        self.background_ratio = self.background_ratio.clamp(0.0, 4.0);
        self
    }
}

/// A simulated particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub opacity: f32,
    /// Frequency of the noise wobble.
    pub noise_speed: f32,
    /// Heading of the slow drift.
    pub drift_direction: f32,
    /// Phase offset for noise and flicker.
    pub noise_offset: f32,
    /// Fast particle drawn with a streak behind it.
    pub shooter: bool,
}

/// A static dot in the parallax layer.
#[derive(Debug, Clone, PartialEq)]
struct BackgroundDot {
    position: Vec2,
    radius: f32,
    opacity: f32,
}

#[derive(Debug, Clone)]
struct Palette {
    particle: Rgba,
    connection: Rgba,
    ripple: Rgba,
}

pub struct Particles {
    config: ParticlesConfig,
    palette: Palette,
    rng: StdRng,
    clock: FrameClock,
    width: f32,
    height: f32,
    particles: Vec<Particle>,
    background: Vec<BackgroundDot>,
    ripples: RippleField,
    pointer: Pointer,
    scan: ConnectionScan,
    links: Vec<Connection>,
}

impl Particles {
    pub fn new(config: ParticlesConfig, seed: u64) -> Self {
        let config = config.clamped();
        let palette = Palette {
            particle: Rgba::parse_or(&config.particle_color, Rgba::WHITE.with_alpha(0.8)),
            connection: Rgba::parse_or(&config.connection_color, Rgba::WHITE.with_alpha(0.1)),
            ripple: Rgba::parse_or(&config.ripple_color, Rgba::WHITE.with_alpha(0.8)),
        };
        let ripples = RippleField::new(
            RippleDecay::Bounded {
                growth: config.ripple_growth,
                max_radius: config.ripple_max_radius,
            },
            1.0,
        );
        let scan = ConnectionScan::new(config.connection_distance, config.connection_opacity);
        Self {
            config,
            palette,
            rng: StdRng::seed_from_u64(seed),
            clock: FrameClock::new(),
            width: 0.0,
            height: 0.0,
            particles: Vec::new(),
            background: Vec::new(),
            ripples,
            pointer: Pointer::default(),
            scan,
            links: Vec::new(),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Links found during the last step.
    pub fn connections(&self) -> &[Connection] {
        &self.links
    }

    fn init(&mut self) {
        let count = self.config.count.unwrap_or_else(|| {
            population(
                self.width,
                self.height,
                self.config.area_per_particle,
                self.config.max_count,
            )
        });
        let rng = &mut self.rng;

        self.particles = (0..count)
            .map(|_| {
                let shooter = chance(rng, self.config.shooter_chance);
                let (radius, speed) = if shooter {
                    (0.5, 1.0)
                } else {
                    (between(rng, 1.0, 3.0), 0.25)
                };
                Particle {
                    position: Vec2::new(between(rng, 0.0, self.width), between(rng, 0.0, self.height)),
                    velocity: Vec2::new(spread(rng, speed), spread(rng, speed)),
                    radius,
                    opacity: between(rng, 0.3, 0.8),
                    noise_speed: between(rng, 0.2, 0.7),
                    drift_direction: angle(rng),
                    noise_offset: between(rng, 0.0, 1000.0),
                    shooter,
                }
            })
            .collect();

        let dots = (count as f32 * self.config.background_ratio).ceil() as usize;
        self.background = (0..dots)
            .map(|_| BackgroundDot {
                position: Vec2::new(between(rng, 0.0, self.width), between(rng, 0.0, self.height)),
                radius: between(rng, 0.0, 1.2),
                opacity: between(rng, 0.0, 0.3),
            })
            .collect();

        self.links.clear();
        tracing::debug!(
            particles = self.particles.len(),
            background = self.background.len(),
            "particles initialized"
        );
    }
}

impl Effect for Particles {
    fn kind(&self) -> EffectKind {
        EffectKind::Particles
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.ripples.clear();
        if width * height <= 0.0 {
            self.particles.clear();
            self.background.clear();
            self.links.clear();
            return;
        }
        self.init();
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
        let t = self.clock.elapsed_secs();
        let cfg = &self.config;
        let center = Vec2::new(self.width / 2.0, self.height / 2.0);
        let max_center_distance = self.width.min(self.height) * cfg.center_radius;
        let bounce = Boundary::Bounce {
            restitution: cfg.restitution,
        };

        for p in &mut self.particles {
            let noise = Vec2::new(
                (t * p.noise_speed + p.noise_offset).sin() * 20.0,
                (t * p.noise_speed * 0.8 + p.noise_offset).cos() * 15.0,
            );
            let drift = Vec2::from_angle(p.drift_direction + t * 0.1) * 0.3;
            p.velocity += drift * 0.01 + noise * 0.001;

            if let Some(mouse) = self.pointer.position() {
                if let Some(force) = radial_force(p.position, mouse, cfg.mouse_radius) {
                    p.velocity += (mouse - p.position) * (force.magnitude * cfg.attraction);
                }
            }

            for ripple in self.ripples.iter() {
                let offset = p.position - ripple.center;
                let distance = offset.length();
                if distance > f32::EPSILON && (distance - ripple.radius).abs() < cfg.ripple_band {
                    p.velocity += offset * (ripple.opacity * cfg.ripple_push / distance);
                }
            }

            p.position += p.velocity;
            p.velocity *= cfg.damping;
            bounce.apply(&mut p.position, &mut p.velocity, self.width, self.height);

            let center_distance = p.position.distance(center);
            if center_distance > max_center_distance && center_distance > f32::EPSILON {
                let pull = (center_distance - max_center_distance) / center_distance * cfg.center_pull;
                p.velocity += (center - p.position) * pull;
            }

            p.opacity = (p.opacity + (t * 2.0 + p.noise_offset).sin() * 0.002).clamp(0.1, 0.8);
        }

        self.ripples.step();

        let positions: Vec<Vec2> = self.particles.iter().map(|p| p.position).collect();
        self.scan.scan_into(&positions, &mut self.links);
    }

    fn render(&self, surface: &mut dyn Surface) {
        for dot in &self.background {
            surface.fill_circle(
                dot.position,
                dot.radius,
                self.palette.particle.with_alpha(dot.opacity * 0.5),
            );
        }

        for link in &self.links {
            let (a, b) = (&self.particles[link.a], &self.particles[link.b]);
            surface.line(
                a.position,
                b.position,
                1.0,
                self.palette.connection.with_alpha(link.opacity),
            );
        }

        for p in self.particles.iter().filter(|p| p.shooter) {
            let tail = p.position - p.velocity * 8.0;
            surface.line(tail, p.position, 1.0, self.palette.particle.with_alpha(p.opacity));
        }

        for ripple in self.ripples.iter() {
            surface.stroke_circle(
                ripple.center,
                ripple.radius,
                2.0,
                self.palette.ripple.with_alpha(ripple.opacity * 0.8),
            );
        }

        for p in &self.particles {
            surface.fill_circle(p.position, p.radius, self.palette.particle.with_alpha(p.opacity));
        }
    }

    fn entity_count(&self) -> usize {
        self.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::{DrawCommand, DrawList};

    fn still_particle(x: f32, y: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            radius: 1.0,
            opacity: 0.5,
            noise_speed: 0.0,
            drift_direction: 0.0,
            noise_offset: 0.0,
            shooter: false,
        }
    }

    #[test]
    fn test_population_from_area() {
        let mut effect = Particles::new(ParticlesConfig::default(), 7);
        effect.resize(800.0, 600.0);
        assert_eq!(effect.entity_count(), 60);
        assert_eq!(effect.background.len(), 18);
        for p in effect.particles() {
            assert!((0.0..=800.0).contains(&p.position.x));
            assert!((0.3..0.8).contains(&p.opacity));
            if p.shooter {
                assert_eq!(p.radius, 0.5);
            } else {
                assert!((1.0..3.0).contains(&p.radius));
            }
        }
    }

    #[test]
    fn test_same_seed_same_population() {
        let mut a = Particles::new(ParticlesConfig::default(), 42);
        let mut b = Particles::new(ParticlesConfig::default(), 42);
        a.resize(640.0, 480.0);
        b.resize(640.0, 480.0);
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.background, b.background);
    }

    #[test]
    fn test_zero_area_skips_init() {
        let mut effect = Particles::new(ParticlesConfig::default(), 1);
        effect.resize(0.0, 600.0);
        assert_eq!(effect.entity_count(), 0);
        effect.step();
        let mut list = DrawList::new(0.0, 600.0);
        effect.render(&mut list);
        assert!(list.is_empty());
    }

    #[test]
    fn test_two_particles_link_at_half_opacity() {
        let config = ParticlesConfig {
            count: Some(0),
            connection_distance: 100.0,
            ..ParticlesConfig::default()
        };
        let mut effect = Particles::new(config, 3);
        effect.resize(400.0, 400.0);
        effect.particles = vec![still_particle(0.0, 0.0), still_particle(50.0, 0.0)];
        effect.step();
        let links = effect.connections();
        assert_eq!(links.len(), 1);
        assert!((links[0].opacity - 0.5 * 0.3).abs() < 0.01);
    }

    #[test]
    fn test_click_ripple_grows_and_expires() {
        let mut effect = Particles::new(ParticlesConfig::default(), 9);
        effect.resize(400.0, 300.0);
        effect.handle_event(&InputEvent::Click(Vec2::new(100.0, 100.0)));
        assert_eq!(effect.ripples.len(), 1);
        for _ in 0..49 {
            effect.step();
        }
        assert_eq!(effect.ripples.len(), 1);
        effect.step();
        assert!(effect.ripples.is_empty());
    }

    #[test]
    fn test_positions_stay_on_surface() {
        let mut effect = Particles::new(ParticlesConfig::default(), 11);
        effect.resize(320.0, 240.0);
        effect.handle_event(&InputEvent::Move(Vec2::new(160.0, 120.0)));
        effect.handle_event(&InputEvent::Click(Vec2::new(50.0, 50.0)));
        for _ in 0..300 {
            effect.step();
            for p in effect.particles() {
                assert!((0.0..=320.0).contains(&p.position.x));
                assert!((0.0..=240.0).contains(&p.position.y));
                assert!((0.1..=0.8).contains(&p.opacity));
            }
        }
    }

    #[test]
    fn test_render_paints_background_before_particles() {
        let mut effect = Particles::new(ParticlesConfig::default(), 5);
        effect.resize(400.0, 400.0);
        effect.step();
        let mut list = DrawList::new(400.0, 400.0);
        effect.render(&mut list);
        let circles = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count();
        assert_eq!(circles, effect.background.len() + effect.entity_count());
    }
}
