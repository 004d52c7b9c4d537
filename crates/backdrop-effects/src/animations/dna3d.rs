//! Perspective DNA helix with an orbiting camera, ray-cast pointer glow and
//! a cloud of drifting motes.

use std::f32::consts::PI;

use backdrop_core::{
    Camera, Effect, EffectKind, InputEvent, Pointer, Ray, Rgba, RippleDecay, RippleField,
    SceneIndex, Surface, surface_to_ndc,
};
use glam::{Quat, Vec3};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::random::{angle, between, pick, spread};

/// Half extent of the cube the motes live in.
const MOTE_BOUND: f32 = 200.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dna3dConfig {
    pub pair_count: usize,
    pub helix_radius: f32,
    pub helix_height: f32,
    pub backbone_segments: usize,
    pub backbone_radius: f32,
    pub base_radius: f32,
    pub particle_count: usize,
    pub particle_size: f32,
    pub particle_speed_min: f32,
    pub particle_speed_max: f32,
    /// Distance from the pointer ray at which bases start to glow.
    pub glow_radius: f32,
    pub glow_multiplier: f32,
    pub camera_orbit_radius: f32,
    pub camera_orbit_speed: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub rotation_speed: f32,
    pub orbital_amplitude: f32,
    pub repel_radius: f32,
    pub ripple_growth: f32,
    pub ripple_fade: f32,
    pub spark_color: String,
    pub ripple_color: String,
}

impl Default for Dna3dConfig {
    fn default() -> Self {
        Self {
            pair_count: 40,
            helix_radius: 25.0,
            helix_height: 400.0,
            backbone_segments: 100,
            backbone_radius: 2.0,
            base_radius: 4.0,
            particle_count: 100,
            particle_size: 1.0,
            particle_speed_min: 0.01,
            particle_speed_max: 0.03,
            glow_radius: 30.0,
            glow_multiplier: 0.3,
            camera_orbit_radius: 200.0,
            camera_orbit_speed: 0.1,
            fov: 75.0,
            rotation_speed: 0.2,
            orbital_amplitude: 0.1,
            repel_radius: 50.0,
            ripple_growth: 0.1,
            ripple_fade: 0.02,
            spark_color: "rgba(255, 255, 255, 0.8)".to_string(),
            ripple_color: "rgba(255, 255, 255, 0.8)".to_string(),
        }
    }
}

impl Dna3dConfig {
    pub fn clamped(mut self) -> Self {
        self.pair_count = self.pair_count.clamp(2, 400);
        self.backbone_segments = self.backbone_segments.clamp(2, 1000);
        self.particle_count = self.particle_count.min(2000);
        self.particle_speed_max = self.particle_speed_max.max(self.particle_speed_min);
        self.glow_radius = self.glow_radius.max(0.001);
        self.fov = self.fov.clamp(10.0, 170.0);
        self.ripple_fade = self.ripple_fade.max(0.001);
        self
    }
}

/// Nucleobases with Watson-Crick pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nucleotide {
    A,
    T,
    G,
    C,
}

impl Nucleotide {
    pub const ALL: [Nucleotide; 4] = [Nucleotide::A, Nucleotide::T, Nucleotide::G, Nucleotide::C];

    pub fn complement(self) -> Nucleotide {
        match self {
            Nucleotide::A => Nucleotide::T,
            Nucleotide::T => Nucleotide::A,
            Nucleotide::G => Nucleotide::C,
            Nucleotide::C => Nucleotide::G,
        }
    }

    pub fn color(self) -> Rgba {
        match self {
            Nucleotide::A => Rgba::from_hex(0x4169E1),
            Nucleotide::T => Rgba::from_hex(0xFFD700),
            Nucleotide::G => Rgba::from_hex(0x1E90FF),
            Nucleotide::C => Rgba::from_hex(0xFFA500),
        }
    }

    pub fn bond_count(self) -> usize {
        match self {
            Nucleotide::A | Nucleotide::T => 2,
            Nucleotide::G | Nucleotide::C => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HelixPair {
    pub base1: Nucleotide,
    pub base2: Nucleotide,
    /// Resting positions on the helix.
    pub rest1: Vec3,
    pub rest2: Vec3,
    /// Current positions including the wave wobble.
    pub p1: Vec3,
    pub p2: Vec3,
    pub glow: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mote {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angle: f32,
    pub speed: f32,
}

pub struct DnaHelix3d {
    config: Dna3dConfig,
    spark_color: Rgba,
    ripple_color: Rgba,
    rng: StdRng,
    width: f32,
    height: f32,
    time: f32,
    wave_offset: f32,
    camera: Camera,
    pairs: Vec<HelixPair>,
    motes: Vec<Mote>,
    index: SceneIndex,
    ripples: RippleField<Vec3>,
    pointer: Pointer,
}

impl DnaHelix3d {
    pub fn new(config: Dna3dConfig, seed: u64) -> Self {
        let config = config.clamped();
        let spark_color = Rgba::parse_or(&config.spark_color, Rgba::WHITE.with_alpha(0.8));
        let ripple_color = Rgba::parse_or(&config.ripple_color, Rgba::WHITE.with_alpha(0.8));
        let camera = Camera::new(
            Vec3::new(0.0, 0.0, config.camera_orbit_radius),
            Vec3::ZERO,
            config.fov,
        );
        let ripples = RippleField::new(
            RippleDecay::Fading {
                growth: config.ripple_growth,
                fade: config.ripple_fade,
            },
            0.8,
        )
        .with_initial_radius(1.0);
        Self {
            config,
            spark_color,
            ripple_color,
            rng: StdRng::seed_from_u64(seed),
            width: 0.0,
            height: 0.0,
            time: 0.0,
            wave_offset: 0.0,
            camera,
            pairs: Vec::new(),
            motes: Vec::new(),
            index: SceneIndex::new(),
            ripples,
            pointer: Pointer::default(),
        }
    }

    pub fn pairs(&self) -> &[HelixPair] {
        &self.pairs
    }

    pub fn motes(&self) -> &[Mote] {
        &self.motes
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    fn init(&mut self) {
        let cfg = &self.config;
        let rng = &mut self.rng;
        let n = cfg.pair_count;
        self.pairs = (0..n)
            .map(|i| {
                let base1 = pick(rng, &Nucleotide::ALL).copied().unwrap_or(Nucleotide::A);
                let y = i as f32 / (n - 1) as f32 * cfg.helix_height - cfg.helix_height / 2.0;
                let theta = i as f32 / n as f32 * PI * 8.0;
                let rest1 = Vec3::new(theta.cos() * cfg.helix_radius, y, theta.sin() * cfg.helix_radius);
                let rest2 = Vec3::new(
                    (theta + PI).cos() * cfg.helix_radius,
                    y,
                    (theta + PI).sin() * cfg.helix_radius,
                );
                HelixPair {
                    base1,
                    base2: base1.complement(),
                    rest1,
                    rest2,
                    p1: rest1,
                    p2: rest2,
                    glow: 0.0,
                }
            })
            .collect();

        self.motes = (0..cfg.particle_count)
            .map(|_| Mote {
                position: Vec3::new(
                    spread(rng, MOTE_BOUND),
                    spread(rng, MOTE_BOUND),
                    spread(rng, MOTE_BOUND),
                ),
                velocity: Vec3::new(spread(rng, 0.25), spread(rng, 0.25), spread(rng, 0.25)),
                angle: angle(rng),
                speed: between(rng, cfg.particle_speed_min, cfg.particle_speed_max),
            })
            .collect();

        self.time = 0.0;
        self.wave_offset = 0.0;
        self.camera.position = Vec3::new(0.0, 0.0, cfg.camera_orbit_radius);
        self.rebuild_index();
        tracing::debug!(pairs = self.pairs.len(), motes = self.motes.len(), "3d helix initialized");
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for pair in &self.pairs {
            self.index.push(pair.p1, self.config.base_radius);
            self.index.push(pair.p2, self.config.base_radius);
        }
    }

    fn pointer_ray(&self) -> Option<Ray> {
        let ndc = surface_to_ndc(self.pointer.position()?, self.width, self.height);
        Some(self.camera.ray_from_ndc(ndc, self.width / self.height))
    }

    /// Ray-cast the click against the bases; misses land at the origin.
    fn click(&mut self) {
        let center = self
            .pointer_ray()
            .and_then(|ray| self.index.intersect(&ray))
            .map_or(Vec3::ZERO, |hit| hit.point);
        self.ripples.spawn(center);
    }

    fn update_pairs(&mut self) {
        let rotation = self.time * self.config.rotation_speed;
        for (i, pair) in self.pairs.iter_mut().enumerate() {
            let amplitude = (self.wave_offset + i as f32 * 0.2).sin() * 2.0 * 0.1;
            let rot = rotation + i as f32 * 0.2;
            pair.p1 = pair.rest1 + Vec3::new(rot.cos(), 0.0, rot.sin()) * amplitude;
            pair.p2 = pair.rest2 + Vec3::new((rot + PI).cos(), 0.0, (rot + PI).sin()) * amplitude;
        }
        self.rebuild_index();
    }

    fn update_motes(&mut self) {
        let cfg = &self.config;
        let mouse = self.pointer.position().map(|p| {
            let ndc = surface_to_ndc(p, self.width, self.height);
            Vec3::new(ndc.x * 100.0, ndc.y * 100.0, self.camera.position.z * 0.1)
        });
        for mote in &mut self.motes {
            if let Some(mouse) = mouse {
                if mote.position.distance(mouse) < cfg.repel_radius {
                    mote.velocity += (mote.position - mouse).normalize_or_zero() * 0.5;
                }
            }
            mote.position += mote.velocity;
            mote.angle += mote.speed;
            mote.position += Vec3::new(
                mote.angle.cos(),
                (mote.angle * 0.7).sin(),
                mote.angle.sin(),
            ) * cfg.orbital_amplitude;
            mote.velocity *= 0.98;
            for axis in [&mut mote.position.x, &mut mote.position.y, &mut mote.position.z] {
                if *axis < -MOTE_BOUND {
                    *axis = MOTE_BOUND;
                } else if *axis > MOTE_BOUND {
                    *axis = -MOTE_BOUND;
                }
            }
        }
    }

    fn update_glow(&mut self) {
        let ray = self.pointer_ray();
        let radius = self.config.glow_radius;
        for pair in &mut self.pairs {
            let nearest = ray.as_ref().map_or(f32::INFINITY, |r| {
                r.distance_to_point(pair.p1).min(r.distance_to_point(pair.p2))
            });
            if nearest < radius {
                pair.glow = (1.0 - nearest / radius).max(0.0);
            } else {
                pair.glow *= 0.95;
            }
        }
    }

    fn render_backbone(&self, surface: &mut dyn Surface) {
        let cfg = &self.config;
        let segments = cfg.backbone_segments;
        let rotation = self.time * cfg.rotation_speed;
        let colors = [Rgba::from_hex(0x808080), Rgba::from_hex(0xa9a9a9)];
        for (strand, color) in colors.into_iter().enumerate() {
            let mut previous: Option<backdrop_core::Projected> = None;
            for i in 0..segments {
                let u = i as f32 / (segments - 1) as f32;
                let theta = u * PI * 8.0;
                let point = Quat::from_rotation_y(strand as f32 * PI + rotation)
                    * Vec3::new(
                        theta.cos() * cfg.helix_radius,
                        u * cfg.helix_height - cfg.helix_height / 2.0,
                        theta.sin() * cfg.helix_radius,
                    );
                let projected = self.camera.project(point, self.width, self.height);
                if let (Some(a), Some(b)) = (previous, projected) {
                    let width = (cfg.backbone_radius * 2.0 * b.scale).max(1.0);
                    surface.line(a.screen, b.screen, width, color.with_alpha(0.7));
                }
                previous = projected;
            }
        }
    }

    fn render_pairs(&self, surface: &mut dyn Surface) {
        let cfg = &self.config;
        let (w, h) = (self.width, self.height);

        for pair in &self.pairs {
            let bonds = pair.base1.bond_count();
            let color = Rgba::WHITE.with_alpha(0.4 + pair.glow * 0.4);
            for j in 0..bonds {
                let offset = Vec3::new(0.0, (j as f32 - (bonds as f32 - 1.0) / 2.0) * 1.5, 0.0);
                let ends = (
                    self.camera.project(pair.p1 + offset, w, h),
                    self.camera.project(pair.p2 + offset, w, h),
                );
                if let (Some(a), Some(b)) = ends {
                    surface.line(a.screen, b.screen, (a.scale + b.scale) / 2.0, color);
                }
            }
        }

        // far bases first so nearer ones paint over them
        let mut bases: Vec<_> = self
            .pairs
            .iter()
            .flat_map(|p| [(p.base1, p.p1, p.glow), (p.base2, p.p2, p.glow)])
            .filter_map(|(base, at, glow)| {
                self.camera.project(at, w, h).map(|proj| (base, proj, glow))
            })
            .collect();
        bases.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));
        for (base, proj, glow) in bases {
            let radius = cfg.base_radius * proj.scale;
            surface.fill_circle(proj.screen, radius, base.color().with_alpha(0.8));
            let emissive = glow * cfg.glow_multiplier;
            if emissive > 0.01 {
                surface.glow(
                    proj.screen,
                    radius * 2.0,
                    Rgba::WHITE.with_alpha(emissive),
                    Rgba::TRANSPARENT,
                );
            }
        }
    }
}

impl Effect for DnaHelix3d {
    fn kind(&self) -> EffectKind {
        EffectKind::DnaSpark3d
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.ripples.clear();
        if width * height <= 0.0 {
            self.pairs.clear();
            self.motes.clear();
            self.index.clear();
            return;
        }
        self.init();
    }

    fn handle_event(&mut self, event: &InputEvent) {
        self.pointer.apply(event);
        match *event {
            InputEvent::Click(_) => {
                if self.width * self.height > 0.0 {
                    self.click();
                }
            }
            InputEvent::Resize { width, height } => self.resize(width, height),
            _ => {}
        }
    }

    fn step(&mut self) {
        if self.width * self.height <= 0.0 {
            return;
        }
        self.time += 0.02;
        self.wave_offset += 0.05;
        let cfg = &self.config;
        self.camera
            .orbit(self.time * cfg.camera_orbit_speed, cfg.camera_orbit_radius);
        self.update_pairs();
        self.update_motes();
        self.ripples.step();
        self.update_glow();
    }

    fn render(&self, surface: &mut dyn Surface) {
        let (w, h) = (self.width, self.height);
        self.render_backbone(surface);
        self.render_pairs(surface);

        let size = self.config.particle_size;
        let mote_color = self.spark_color.with_alpha(0.6);
        for mote in &self.motes {
            if let Some(proj) = self.camera.project(mote.position, w, h) {
                surface.fill_circle(proj.screen, size * proj.scale, mote_color);
            }
        }

        for ripple in self.ripples.iter() {
            if let Some(proj) = self.camera.project(ripple.center, w, h) {
                let color = self.ripple_color.with_alpha(ripple.opacity);
                let outer = ripple.radius * proj.scale;
                surface.stroke_circle(proj.screen, outer, 1.0, color);
                surface.stroke_circle(proj.screen, outer * 0.5, 1.0, color);
            }
        }
    }

    fn entity_count(&self) -> usize {
        self.pairs.len() * 2 + self.motes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::Vec2;

    fn helix() -> DnaHelix3d {
        let mut effect = DnaHelix3d::new(Dna3dConfig::default(), 17);
        effect.resize(800.0, 600.0);
        effect
    }

    #[test]
    fn test_pairs_complement_and_span_height() {
        let effect = helix();
        assert_eq!(effect.pairs().len(), 40);
        assert_eq!(effect.motes().len(), 100);
        for pair in effect.pairs() {
            assert_eq!(pair.base2, pair.base1.complement());
            assert!((pair.rest1.y - pair.rest2.y).abs() < 1e-6);
        }
        assert!((effect.pairs()[0].rest1.y + 200.0).abs() < 1e-3);
        assert!((effect.pairs()[39].rest1.y - 200.0).abs() < 1e-3);
        assert_eq!(Nucleotide::T.bond_count(), 2);
        assert_eq!(Nucleotide::G.bond_count(), 3);
    }

    #[test]
    fn test_camera_orbits_target() {
        let mut effect = helix();
        for _ in 0..50 {
            effect.step();
        }
        let camera = effect.camera();
        let radius = (camera.position.x.powi(2) + camera.position.z.powi(2)).sqrt();
        assert!((radius - 200.0).abs() < 1e-2);
        assert!((camera.position.x - (1.0f32 * 0.1).cos() * 200.0).abs() < 1e-2);
    }

    #[test]
    fn test_motes_stay_in_cube() {
        let mut effect = helix();
        effect.handle_event(&InputEvent::Move(Vec2::new(400.0, 300.0)));
        for _ in 0..400 {
            effect.step();
        }
        for mote in effect.motes() {
            for v in [mote.position.x, mote.position.y, mote.position.z] {
                assert!(v.abs() <= MOTE_BOUND + 1e-3);
            }
        }
    }

    #[test]
    fn test_mote_under_pointer_stays_finite() {
        let mut effect = helix();
        effect.handle_event(&InputEvent::Move(Vec2::new(400.0, 300.0)));
        let mouse = Vec3::new(0.0, 0.0, effect.camera().position.z * 0.1);
        effect.motes[0].position = mouse;
        effect.update_motes();
        assert!(effect.motes[0].position.is_finite());
        assert!(effect.motes[0].velocity.is_finite());
    }

    #[test]
    fn test_click_on_base_places_ripple_on_it() {
        let mut effect = helix();
        let target = effect.pairs()[20].p1;
        let screen = effect
            .camera()
            .project(target, 800.0, 600.0)
            .map(|p| p.screen)
            .unwrap();
        effect.handle_event(&InputEvent::Click(screen));
        let ripple = effect.ripples.iter().next().unwrap();
        assert!(ripple.center.distance(target) <= 4.0 + 0.1);
        assert_eq!(ripple.radius, 1.0);
        assert_eq!(ripple.opacity, 0.8);
    }

    #[test]
    fn test_click_on_empty_space_uses_origin() {
        let mut effect = helix();
        effect.handle_event(&InputEvent::Click(Vec2::new(2.0, 2.0)));
        let ripple = effect.ripples.iter().next().unwrap();
        assert_eq!(ripple.center, Vec3::ZERO);
        for _ in 0..45 {
            effect.step();
        }
        assert!(effect.ripples.is_empty());
    }

    #[test]
    fn test_pointer_ray_lights_bases() {
        let mut effect = helix();
        let target = effect.pairs()[20].p1;
        let screen = effect
            .camera()
            .project(target, 800.0, 600.0)
            .map(|p| p.screen)
            .unwrap();
        effect.handle_event(&InputEvent::Move(screen));
        effect.step();
        assert!(effect.pairs()[20].glow > 0.5);
        effect.handle_event(&InputEvent::Leave);
        let glow = effect.pairs()[20].glow;
        effect.step();
        assert!((effect.pairs()[20].glow - glow * 0.95).abs() < 1e-6);
    }
}
