//! Star field with proximity links, drag trails, shooting stars and
//! fading constellation labels.

use backdrop_core::{
    Boundary, Connection, ConnectionScan, Effect, EffectKind, FrameClock, InputEvent, Pointer,
    Rgba, Surface, Trail, Vec2, radial_force,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::chars::CONSTELLATION_NAMES;
use crate::random::{between, chance, pick, spread};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstellationConfig {
    pub count: usize,
    pub max_distance: f32,
    /// Link opacity at zero distance.
    pub connection_opacity: f32,
    /// Initial velocity range per axis (`-speed..speed`).
    pub speed: f32,
    pub radius_min: f32,
    pub radius_max: f32,
    pub push_radius: f32,
    /// Constant push away from the pointer inside `push_radius`.
    pub push: f32,
    /// Positions kept per star while dragging.
    pub trail_length: usize,
    /// Spawn probability per tick.
    pub shooting_star_chance: f32,
    /// Life lost per tick.
    pub shooting_star_fade: f32,
    pub label_chance: f32,
    pub label_fade: f32,
    pub label_size: f32,
    pub labels: Vec<String>,
    /// Animation time advanced per simulated millisecond.
    pub time_scale: f32,
    pub particle_color: String,
    pub connection_color: String,
    pub shooting_star_color: String,
    pub label_color: String,
}

impl Default for ConstellationConfig {
    fn default() -> Self {
        Self {
            count: 120,
            max_distance: 120.0,
            connection_opacity: 1.0,
            speed: 0.3,
            radius_min: 0.5,
            radius_max: 1.7,
            push_radius: 80.0,
            push: 0.1,
            trail_length: 20,
            shooting_star_chance: 0.01,
            shooting_star_fade: 0.01,
            label_chance: 0.002,
            label_fade: 0.003,
            label_size: 19.0,
            labels: CONSTELLATION_NAMES.iter().map(|s| s.to_string()).collect(),
            time_scale: 0.002,
            particle_color: "rgba(255, 255, 255, 0.7)".to_string(),
            connection_color: "rgba(255, 255, 255, 0.2)".to_string(),
            shooting_star_color: "rgba(255, 255, 255, 0.5)".to_string(),
            label_color: "white".to_string(),
        }
    }
}

impl ConstellationConfig {
    pub fn clamped(mut self) -> Self {
        self.count = self.count.min(2000);
        self.max_distance = self.max_distance.max(0.0);
        self.connection_opacity = self.connection_opacity.clamp(0.0, 1.0);
        self.radius_max = self.radius_max.max(self.radius_min);
        self.push_radius = self.push_radius.max(0.0);
        self.shooting_star_chance = self.shooting_star_chance.clamp(0.0, 1.0);
        self.shooting_star_fade = self.shooting_star_fade.max(0.001);
        self.label_chance = self.label_chance.clamp(0.0, 1.0);
        self.label_fade = self.label_fade.max(0.0001);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Phase of the radius pulse.
    pub pulse: f32,
}

#[derive(Debug, Clone, PartialEq)]
struct ShootingStar {
    position: Vec2,
    velocity: Vec2,
    length: f32,
    /// Starts at 1, removed once it reaches zero.
    life: f32,
}

#[derive(Debug, Clone, PartialEq)]
struct Label {
    position: Vec2,
    text: String,
    opacity: f32,
}

#[derive(Debug, Clone)]
struct Palette {
    star: Rgba,
    connection: Rgba,
    shooting_star: Rgba,
    label: Rgba,
}

pub struct Constellation {
    config: ConstellationConfig,
    palette: Palette,
    rng: StdRng,
    clock: FrameClock,
    width: f32,
    height: f32,
    stars: Vec<Star>,
    trails: Vec<Trail>,
    shooting_stars: Vec<ShootingStar>,
    labels: Vec<Label>,
    pointer: Pointer,
    scan: ConnectionScan,
    links: Vec<Connection>,
}

impl Constellation {
    pub fn new(config: ConstellationConfig, seed: u64) -> Self {
        let config = config.clamped();
        let palette = Palette {
            star: Rgba::parse_or(&config.particle_color, Rgba::WHITE.with_alpha(0.7)),
            connection: Rgba::parse_or(&config.connection_color, Rgba::WHITE.with_alpha(0.2)),
            shooting_star: Rgba::parse_or(&config.shooting_star_color, Rgba::WHITE.with_alpha(0.5)),
            label: Rgba::parse_or(&config.label_color, Rgba::WHITE),
        };
        let scan = ConnectionScan::new(config.max_distance, config.connection_opacity);
        Self {
            config,
            palette,
            rng: StdRng::seed_from_u64(seed),
            clock: FrameClock::new(),
            width: 0.0,
            height: 0.0,
            stars: Vec::new(),
            trails: Vec::new(),
            shooting_stars: Vec::new(),
            labels: Vec::new(),
            pointer: Pointer::default(),
            scan,
            links: Vec::new(),
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    fn init(&mut self) {
        let rng = &mut self.rng;
        let cfg = &self.config;
        self.stars = (0..cfg.count)
            .map(|_| Star {
                position: Vec2::new(between(rng, 0.0, self.width), between(rng, 0.0, self.height)),
                velocity: Vec2::new(spread(rng, cfg.speed), spread(rng, cfg.speed)),
                radius: between(rng, cfg.radius_min, cfg.radius_max),
                pulse: between(rng, 0.5, 2.0),
            })
            .collect();
        self.trails = vec![Trail::new(cfg.trail_length); cfg.count];
        self.shooting_stars.clear();
        self.labels.clear();
        self.links.clear();
        tracing::debug!(stars = self.stars.len(), "constellation initialized");
    }

    fn update_stars(&mut self) {
        let bounce = Boundary::Bounce { restitution: 1.0 };
        let dragging = self.pointer.is_dragging();
        for (star, trail) in self.stars.iter_mut().zip(self.trails.iter_mut()) {
            star.position += star.velocity;
            bounce.apply(&mut star.position, &mut star.velocity, self.width, self.height);

            if let Some(mouse) = self.pointer.position() {
                if let Some(force) = radial_force(star.position, mouse, self.config.push_radius) {
                    star.velocity += force.direction * self.config.push;
                }
            }

            if dragging {
                trail.push(star.position);
            } else {
                trail.clear();
            }
        }
    }

    fn update_shooting_stars(&mut self) {
        if chance(&mut self.rng, self.config.shooting_star_chance) {
            let rng = &mut self.rng;
            self.shooting_stars.push(ShootingStar {
                position: Vec2::new(between(rng, 0.0, self.width), between(rng, 0.0, self.height * 0.5)),
                velocity: Vec2::new(-between(rng, 2.0, 6.0), between(rng, 0.0, 2.0)),
                length: between(rng, 40.0, 100.0),
                life: 1.0,
            });
        }
        let fade = self.config.shooting_star_fade;
        self.shooting_stars.retain_mut(|s| {
            s.position += s.velocity;
            s.life -= fade;
            s.life > 0.0
        });
    }

    fn update_labels(&mut self) {
        if chance(&mut self.rng, self.config.label_chance) {
            if let Some(text) = pick(&mut self.rng, &self.config.labels).cloned() {
                let position = Vec2::new(
                    between(&mut self.rng, 0.0, self.width),
                    between(&mut self.rng, 0.0, self.height * 0.8) + 50.0,
                );
                self.labels.push(Label {
                    position,
                    text,
                    opacity: 1.0,
                });
            }
        }
        let fade = self.config.label_fade;
        self.labels.retain_mut(|label| {
            label.opacity -= fade;
            label.opacity > 0.0
        });
    }
}

impl Effect for Constellation {
    fn kind(&self) -> EffectKind {
        EffectKind::Constellation
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        if width * height <= 0.0 {
            self.stars.clear();
            self.trails.clear();
            self.shooting_stars.clear();
            self.labels.clear();
            self.links.clear();
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
        self.clock.tick();
        self.update_stars();
        self.update_shooting_stars();
        self.update_labels();
        let positions: Vec<Vec2> = self.stars.iter().map(|s| s.position).collect();
        self.scan.scan_into(&positions, &mut self.links);
    }

    fn render(&self, surface: &mut dyn Surface) {
        let t = self.clock.elapsed_ms() * self.config.time_scale;

        for link in &self.links {
            surface.line(
                self.stars[link.a].position,
                self.stars[link.b].position,
                1.0,
                self.palette.connection.with_alpha(link.opacity),
            );
        }

        let trail_color = self.palette.star.with_alpha(0.1);
        for trail in self.trails.iter().filter(|t| t.len() > 1) {
            surface.polyline(&trail.positions(), 1.0, trail_color);
        }

        for s in &self.shooting_stars {
            let tail = s.position + Vec2::new(s.length, s.length * 0.2);
            surface.line(s.position, tail, 2.0, self.palette.shooting_star);
        }

        for star in &self.stars {
            let radius = (star.radius + (t + star.pulse).sin() * 0.5).max(0.0);
            surface.fill_circle(star.position, radius, self.palette.star);
        }

        for label in &self.labels {
            surface.text(
                label.position,
                &label.text,
                self.config.label_size,
                self.palette.label.scale_alpha(label.opacity),
            );
        }
    }

    fn entity_count(&self) -> usize {
        self.stars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Constellation {
        let mut effect = Constellation::new(ConstellationConfig::default(), 21);
        effect.resize(640.0, 480.0);
        effect
    }

    #[test]
    fn test_fixed_star_count() {
        let effect = field();
        assert_eq!(effect.entity_count(), 120);
        for star in effect.stars() {
            assert!((-0.3..0.3).contains(&star.velocity.x));
            assert!((0.5..1.7).contains(&star.radius));
        }
    }

    #[test]
    fn test_drag_trails_bounded_and_cleared() {
        let mut effect = field();
        effect.handle_event(&InputEvent::Press(Vec2::new(10.0, 10.0)));
        for _ in 0..40 {
            effect.step();
        }
        assert!(effect.trails.iter().all(|t| t.len() == 20));
        effect.handle_event(&InputEvent::Release);
        effect.step();
        assert!(effect.trails.iter().all(Trail::is_empty));
    }

    #[test]
    fn test_shooting_star_removed_when_life_runs_out() {
        let config = ConstellationConfig {
            shooting_star_chance: 0.0,
            ..ConstellationConfig::default()
        };
        let mut effect = Constellation::new(config, 4);
        effect.resize(640.0, 480.0);
        effect.shooting_stars.push(ShootingStar {
            position: Vec2::new(300.0, 100.0),
            velocity: Vec2::new(-4.0, 1.0),
            length: 50.0,
            life: 0.015,
        });
        effect.step();
        assert_eq!(effect.shooting_stars.len(), 1);
        assert_eq!(effect.shooting_stars[0].position, Vec2::new(296.0, 101.0));
        effect.step();
        assert!(effect.shooting_stars.is_empty());
    }

    #[test]
    fn test_labels_fade_out() {
        let config = ConstellationConfig {
            label_chance: 1.0,
            ..ConstellationConfig::default()
        };
        let mut effect = Constellation::new(config, 8);
        effect.resize(640.0, 480.0);
        effect.step();
        assert_eq!(effect.labels.len(), 1);
        assert!((effect.labels[0].opacity - 0.997).abs() < 1e-6);
        assert!(CONSTELLATION_NAMES.contains(&effect.labels[0].text.as_str()));
        assert!(effect.labels[0].position.y >= 50.0);
    }

    #[test]
    fn test_pointer_pushes_nearby_star() {
        let mut effect = field();
        effect.stars = vec![Star {
            position: Vec2::new(100.0, 100.0),
            velocity: Vec2::ZERO,
            radius: 1.0,
            pulse: 1.0,
        }];
        effect.trails = vec![Trail::new(20)];
        effect.handle_event(&InputEvent::Move(Vec2::new(80.0, 100.0)));
        effect.step();
        assert!((effect.stars[0].velocity.x - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_stars_stay_inside() {
        let mut effect = field();
        effect.handle_event(&InputEvent::Move(Vec2::new(1.0, 1.0)));
        for _ in 0..500 {
            effect.step();
        }
        for star in effect.stars() {
            assert!((0.0..=640.0).contains(&star.position.x));
            assert!((0.0..=480.0).contains(&star.position.y));
        }
    }
}
