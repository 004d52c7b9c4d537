//! Flat DNA helix that assembles from scattered bases, glows near the
//! pointer and shatters on click, over a field of drifting sparks.

use std::f32::consts::PI;

use backdrop_core::{
    Boundary, Effect, EffectKind, InputEvent, Pointer, Rgba, RippleDecay, RippleField, Surface,
    Trail, Vec2, ease_in_quad, ease_out_cubic, radial_force,
};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::random::{angle, between, population, spread};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnaConfig {
    /// Vertical distance between base pairs.
    pub spacing: f32,
    pub amplitude: f32,
    pub frequency: f32,
    /// Simulated milliseconds per tick.
    pub frame_ms: f32,
    pub assemble_ms: f32,
    pub shatter_ms: f32,
    /// Speed of the radial burst when the helix shatters.
    pub shatter_speed: f32,
    pub glow_radius: f32,
    pub area_per_spark: f32,
    pub max_sparks: usize,
    /// Extra sparks burst from each click.
    pub click_sparks: usize,
    pub spark_repel_radius: f32,
    pub spark_color: String,
    pub connection_color: String,
    pub ripple_color: String,
    pub a_color: String,
    pub c_color: String,
    pub j_color: String,
}

impl Default for DnaConfig {
    fn default() -> Self {
        Self {
            spacing: 25.0,
            amplitude: 100.0,
            frequency: 0.015,
            frame_ms: 16.0,
            assemble_ms: 2000.0,
            shatter_ms: 1000.0,
            shatter_speed: 10.0,
            glow_radius: 120.0,
            area_per_spark: 8000.0,
            max_sparks: 2000,
            click_sparks: 0,
            spark_repel_radius: 150.0,
            spark_color: "rgba(255, 255, 255, 0.8)".to_string(),
            connection_color: "rgba(255, 255, 255, 0.1)".to_string(),
            ripple_color: "rgba(255, 255, 255, 0.8)".to_string(),
            a_color: "#1A88FF".to_string(),
            c_color: "#AA88FF".to_string(),
            j_color: "#E1AD37".to_string(),
        }
    }
}

impl DnaConfig {
    pub fn clamped(mut self) -> Self {
        self.spacing = self.spacing.max(1.0);
        self.amplitude = self.amplitude.max(1.0);
        self.frame_ms = self.frame_ms.max(1.0);
        self.assemble_ms = self.assemble_ms.max(self.frame_ms);
        self.shatter_ms = self.shatter_ms.max(self.frame_ms);
        self.glow_radius = self.glow_radius.max(1.0);
        self.area_per_spark = self.area_per_spark.max(1.0);
        self.click_sparks = self.click_sparks.min(200);
        self
    }
}

/// The three bases drawn on the helix. Each pairs with the next one in the
/// cycle A, C, J.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    A,
    C,
    J,
}

impl Base {
    pub fn complement(self) -> Base {
        match self {
            Base::A => Base::C,
            Base::C => Base::J,
            Base::J => Base::A,
        }
    }

    /// Ordered sequence cycling A, C, J.
    pub fn sequence(index: usize) -> Base {
        [Base::A, Base::C, Base::J][index % 3]
    }

    pub fn letter(self) -> &'static str {
        match self {
            Base::A => "A",
            Base::C => "C",
            Base::J => "J",
        }
    }

    /// Hydrogen bonds drawn between a pair whose first base is `self`.
    pub fn bond_count(self) -> usize {
        match self {
            Base::A | Base::C => 2,
            Base::J => 3,
        }
    }
}

/// Lifecycle of the helix. Elapsed times are simulated milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HelixPhase {
    /// Easing from random starts onto the helix.
    Assembling { elapsed: f32 },
    Steady,
    /// Ballistic burst for the first half of the shatter.
    Shattering { elapsed: f32 },
    /// Easing back onto the helix for the second half.
    Reassembling { elapsed: f32 },
}

#[derive(Debug, Clone)]
pub struct BasePair {
    pub base1: Base,
    pub base2: Base,
    pub p1: Vec2,
    pub p2: Vec2,
    pub z1: f32,
    pub z2: f32,
    pub glow: f32,
    pub visible: bool,
    start1: Vec2,
    start2: Vec2,
    velocity: Vec2,
    trail: Trail,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spark {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub angle: f32,
    pub speed: f32,
}

/// Target placement of one pair at the current helix time.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HelixTarget {
    x1: f32,
    x2: f32,
    y: f32,
    z1: f32,
    z2: f32,
}

#[derive(Debug, Clone)]
struct Palette {
    spark: Rgba,
    connection: Rgba,
    ripple: Rgba,
    a: Rgba,
    c: Rgba,
    j: Rgba,
}

impl Palette {
    fn base(&self, base: Base) -> Rgba {
        match base {
            Base::A => self.a,
            Base::C => self.c,
            Base::J => self.j,
        }
    }
}

const TRAIL_COLOR: Rgba = Rgba::rgb(26, 136, 255);
const BACKBONE_COLORS: [Rgba; 2] = [Rgba::rgb(128, 128, 128), Rgba::rgb(169, 169, 169)];

pub struct DnaHelix {
    config: DnaConfig,
    palette: Palette,
    rng: StdRng,
    width: f32,
    height: f32,
    time: f32,
    wave_offset: f32,
    phase: HelixPhase,
    pairs: Vec<BasePair>,
    sparks: Vec<Spark>,
    ripples: RippleField,
    pointer: Pointer,
}

impl DnaHelix {
    pub fn new(config: DnaConfig, seed: u64) -> Self {
        let config = config.clamped();
        let white = Rgba::WHITE;
        let palette = Palette {
            spark: Rgba::parse_or(&config.spark_color, white.with_alpha(0.8)),
            connection: Rgba::parse_or(&config.connection_color, white.with_alpha(0.1)),
            ripple: Rgba::parse_or(&config.ripple_color, white.with_alpha(0.8)),
            a: Rgba::parse_or(&config.a_color, Rgba::from_hex(0x1A88FF)),
            c: Rgba::parse_or(&config.c_color, Rgba::from_hex(0xAA88FF)),
            j: Rgba::parse_or(&config.j_color, Rgba::from_hex(0xE1AD37)),
        };
        Self {
            config,
            palette,
            rng: StdRng::seed_from_u64(seed),
            width: 0.0,
            height: 0.0,
            time: 0.0,
            wave_offset: 0.0,
            phase: HelixPhase::Assembling { elapsed: 0.0 },
            pairs: Vec::new(),
            sparks: Vec::new(),
            ripples: RippleField::new(
                RippleDecay::Fading {
                    growth: 5.0,
                    fade: 0.02,
                },
                0.8,
            ),
            pointer: Pointer::default(),
        }
    }

    pub fn phase(&self) -> HelixPhase {
        self.phase
    }

    pub fn pairs(&self) -> &[BasePair] {
        &self.pairs
    }

    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    fn init(&mut self) {
        let rng = &mut self.rng;
        let (w, h) = (self.width, self.height);
        let count = (h / self.config.spacing).floor().max(0.0) as usize;
        self.pairs = (0..count)
            .map(|i| {
                let base2 = Base::sequence(i);
                let start1 = Vec2::new(between(rng, 0.0, w), between(rng, 0.0, h));
                let start2 = Vec2::new(between(rng, 0.0, w), between(rng, 0.0, h));
                BasePair {
                    base1: base2.complement(),
                    base2,
                    p1: start1,
                    p2: start2,
                    z1: 0.0,
                    z2: 0.0,
                    glow: 0.0,
                    visible: true,
                    start1,
                    start2,
                    velocity: Vec2::ZERO,
                    trail: Trail::new(15),
                }
            })
            .collect();

        let sparks = population(w, h, self.config.area_per_spark, self.config.max_sparks);
        self.sparks = (0..sparks)
            .map(|_| Spark {
                position: Vec2::new(between(rng, 0.0, w), between(rng, 0.0, h)),
                velocity: Vec2::new(spread(rng, 0.25), spread(rng, 0.25)),
                size: between(rng, 1.0, 3.0),
                opacity: between(rng, 0.3, 0.8),
                angle: angle(rng),
                speed: between(rng, 0.01, 0.03),
            })
            .collect();

        self.time = 0.0;
        self.wave_offset = 0.0;
        self.phase = HelixPhase::Assembling { elapsed: 0.0 };
        tracing::debug!(pairs = self.pairs.len(), sparks = self.sparks.len(), "dna helix initialized");
    }

    fn target(&self, index: usize) -> HelixTarget {
        let cfg = &self.config;
        let y = index as f32 * cfg.spacing;
        let wave = (self.wave_offset + y * 0.01).sin() * 10.0;
        let theta = y * cfg.frequency + self.time;
        let cx = self.width / 2.0;
        HelixTarget {
            x1: cx + theta.sin() * (cfg.amplitude + wave),
            x2: cx + (theta + PI).sin() * (cfg.amplitude + wave),
            y,
            z1: theta.cos() * cfg.amplitude,
            z2: (theta + PI).cos() * cfg.amplitude,
        }
    }

    /// Start a shatter. Ignored unless the helix is steady.
    fn shatter(&mut self) {
        if self.phase != HelixPhase::Steady {
            return;
        }
        let center = Vec2::new(self.width / 2.0, self.height / 2.0);
        for pair in &mut self.pairs {
            pair.velocity = Vec2::from_angle((pair.p1 - center).angle()) * self.config.shatter_speed;
            pair.start1 = pair.p1;
            pair.start2 = pair.p2;
            pair.trail.clear();
        }
        self.phase = HelixPhase::Shattering { elapsed: 0.0 };
        tracing::debug!("dna helix shattered");
    }

    fn burst(&mut self, at: Vec2) {
        let room = self.config.max_sparks.saturating_sub(self.sparks.len());
        let rng = &mut self.rng;
        for _ in 0..self.config.click_sparks.min(room) {
            self.sparks.push(Spark {
                position: at,
                velocity: Vec2::new(spread(rng, 5.0), spread(rng, 5.0)),
                size: between(rng, 1.0, 3.0),
                opacity: between(rng, 0.2, 1.0),
                angle: angle(rng),
                speed: between(rng, 0.02, 0.07),
            });
        }
    }

    fn advance_phase(&mut self) {
        let frame = self.config.frame_ms;
        self.phase = match self.phase {
            HelixPhase::Assembling { elapsed } => {
                let elapsed = elapsed + frame;
                if elapsed >= self.config.assemble_ms {
                    HelixPhase::Steady
                } else {
                    HelixPhase::Assembling { elapsed }
                }
            }
            HelixPhase::Shattering { elapsed } | HelixPhase::Reassembling { elapsed } => {
                let elapsed = elapsed + frame;
                let progress = elapsed / self.config.shatter_ms;
                if progress >= 1.0 {
                    HelixPhase::Steady
                } else if progress < 0.5 {
                    HelixPhase::Shattering { elapsed }
                } else {
                    HelixPhase::Reassembling { elapsed }
                }
            }
            HelixPhase::Steady => HelixPhase::Steady,
        };
    }

    fn update_pairs(&mut self) {
        let previous = self.phase;
        self.advance_phase();
        let targets: Vec<HelixTarget> = (0..self.pairs.len()).map(|i| self.target(i)).collect();

        for (pair, target) in self.pairs.iter_mut().zip(targets) {
            let goal1 = Vec2::new(target.x1, target.y);
            let goal2 = Vec2::new(target.x2, target.y);

            match (previous, self.phase) {
                (HelixPhase::Assembling { .. }, phase) => {
                    let progress = match phase {
                        HelixPhase::Assembling { elapsed } => elapsed / self.config.assemble_ms,
                        _ => 1.0,
                    };
                    pair.trail.push(pair.p1);
                    pair.trail.fade(0.9);
                    let ease = ease_out_cubic(progress);
                    pair.p1 = pair.start1.lerp(goal1, ease);
                    pair.p2 = pair.start2.lerp(goal2, ease);
                }
                (_, HelixPhase::Shattering { .. }) => {
                    pair.p1 += pair.velocity;
                    pair.p2 += pair.velocity * 0.8;
                    pair.velocity *= 0.95;
                    pair.trail.set_max_len(10);
                    pair.trail.push(pair.p1);
                    pair.trail.fade(0.8);
                }
                (_, HelixPhase::Reassembling { elapsed }) => {
                    let reassembly = (elapsed / self.config.shatter_ms - 0.5) * 2.0;
                    let ease = ease_in_quad(reassembly);
                    pair.p1 = pair.p1.lerp(goal1, ease);
                    pair.p2 = pair.p2.lerp(goal2, ease);
                    if self.rng.r#gen::<f32>() < 0.3 {
                        pair.trail.push(pair.p1);
                    }
                    pair.trail.set_max_len(8);
                    pair.trail.fade(0.85);
                }
                _ => {
                    pair.p1 = goal1;
                    pair.p2 = goal2;
                }
            }
            pair.z1 = target.z1;
            pair.z2 = target.z2;

            let nearest = self
                .pointer
                .position()
                .map_or(f32::INFINITY, |m| pair.p1.distance(m).min(pair.p2.distance(m)));
            if nearest < self.config.glow_radius {
                pair.glow = (1.0 - nearest / self.config.glow_radius).max(0.0);
            } else {
                pair.glow *= 0.95;
            }
            pair.visible = target.z1 > -50.0 || target.z2 > -50.0;
        }
    }

    fn update_sparks(&mut self) {
        let wrap = Boundary::Wrap { margin: 0.0 };
        let (w, h) = (self.width, self.height);
        for spark in &mut self.sparks {
            if let Some(mouse) = self.pointer.position() {
                if let Some(force) = radial_force(spark.position, mouse, self.config.spark_repel_radius) {
                    spark.velocity += force.repel(0.02);
                }
            }
            spark.position += spark.velocity;
            spark.angle += spark.speed;
            spark.velocity += Vec2::from_angle(spark.angle) * 0.001;
            spark.velocity *= 0.99;
            wrap.apply(&mut spark.position, &mut spark.velocity, w, h);
            spark.opacity = (spark.opacity + spread(&mut self.rng, 0.01)).clamp(0.1, 0.8);
        }
    }

    fn render_backbone(&self, surface: &mut dyn Surface) {
        let cfg = &self.config;
        let helix_height = self.height + 200.0;
        let cx = self.width / 2.0;
        for (strand, color) in BACKBONE_COLORS.iter().enumerate() {
            let offset = strand as f32 * PI;
            let point = |y: f32| {
                let wave = (self.wave_offset + y * 0.01).sin() * 10.0;
                let theta = y * cfg.frequency + self.time + offset;
                let x = cx + theta.sin() * (cfg.amplitude + wave);
                let scale = (theta.cos() * cfg.amplitude + cfg.amplitude) / (2.0 * cfg.amplitude);
                (Vec2::new(x, y), scale)
            };
            let mut y = -100.0;
            let (mut prev, _) = point(y);
            y += 8.0;
            while y < helix_height {
                let (next, scale) = point(y);
                let along = (y / helix_height).clamp(0.0, 1.0);
                let gradient = 0.1 + 0.5 * (1.0 - (2.0 * along - 1.0).abs());
                surface.line(prev, next, 4.0, color.with_alpha(gradient * (0.3 + scale * 0.7)));
                prev = next;
                y += 8.0;
            }
        }
    }

    fn render_bonds(&self, surface: &mut dyn Surface) {
        for pair in &self.pairs {
            if !pair.visible || pair.z1 < -50.0 || pair.z2 < -50.0 {
                continue;
            }
            let scale = ((pair.z1 + pair.z2) / 2.0 + 100.0) / 200.0;
            let color = if pair.glow > 0.0 {
                Rgba::WHITE.with_alpha(0.5 + pair.glow * 0.5)
            } else {
                self.palette.connection
            };
            let color = color.scale_alpha(0.3 + scale * 0.4);
            let bonds = pair.base1.bond_count();
            for i in 0..bonds {
                let offset = (i as f32 - (bonds as f32 - 1.0) / 2.0) * 3.0;
                surface.line(
                    pair.p1 + Vec2::new(0.0, offset),
                    pair.p2 + Vec2::new(0.0, offset),
                    2.0,
                    color,
                );
            }
        }
    }

    fn render_trails(&self, surface: &mut dyn Surface) {
        for pair in self.pairs.iter().filter(|p| p.trail.len() > 1) {
            let points: Vec<_> = pair.trail.iter().collect();
            for segment in points.windows(2) {
                let (start, end) = (segment[0], segment[1]);
                if start.opacity < 0.05 || end.opacity < 0.05 {
                    continue;
                }
                let alpha = (start.opacity + end.opacity) / 2.0 * 0.5;
                surface.line(start.position, end.position, 2.0, TRAIL_COLOR.with_alpha(alpha));
            }
        }
    }

    fn render_bases(&self, surface: &mut dyn Surface) {
        for pair in self.pairs.iter().filter(|p| p.visible) {
            for (base, at, z) in [(pair.base1, pair.p1, pair.z1), (pair.base2, pair.p2, pair.z2)] {
                if z <= -50.0 {
                    continue;
                }
                let scale = (z + 100.0) / 200.0;
                let alpha = 0.4 + scale * 0.6;
                let color = self.palette.base(base);
                if pair.glow > 0.0 {
                    surface.glow(
                        at,
                        8.0 * scale + 20.0 * pair.glow,
                        color.with_alpha(0.6 * pair.glow * alpha),
                        color.with_alpha(0.0),
                    );
                }
                surface.fill_circle(at, 8.0 * scale, color.with_alpha(alpha));
                surface.text(at, base.letter(), 12.0 * scale, Rgba::WHITE.with_alpha(alpha));
            }
        }
    }
}

impl Effect for DnaHelix {
    fn kind(&self) -> EffectKind {
        EffectKind::DnaSpark
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.ripples.clear();
        if width * height <= 0.0 {
            self.pairs.clear();
            self.sparks.clear();
            return;
        }
        self.init();
    }

    fn handle_event(&mut self, event: &InputEvent) {
        self.pointer.apply(event);
        match *event {
            InputEvent::Click(pos) => {
                self.ripples.spawn(pos);
                self.burst(pos);
                self.shatter();
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
        self.update_pairs();
        self.update_sparks();
        self.ripples.step();
    }

    fn render(&self, surface: &mut dyn Surface) {
        self.render_backbone(surface);
        self.render_bonds(surface);
        self.render_trails(surface);

        for ripple in self.ripples.iter() {
            let color = self.palette.ripple;
            surface.stroke_circle(ripple.center, ripple.radius, 3.0, color.scale_alpha(ripple.opacity));
            surface.stroke_circle(
                ripple.center,
                ripple.radius * 0.5,
                3.0,
                color.scale_alpha(ripple.opacity * 0.5),
            );
        }

        for spark in &self.sparks {
            let color = self.palette.spark.scale_alpha(spark.opacity);
            surface.fill_circle(spark.position, spark.size, color);
            surface.glow(spark.position, spark.size * 3.0, color.scale_alpha(0.5), color.with_alpha(0.0));
        }

        self.render_bases(surface);
    }

    fn entity_count(&self) -> usize {
        self.pairs.len() + self.sparks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helix() -> DnaHelix {
        let mut effect = DnaHelix::new(DnaConfig::default(), 11);
        effect.resize(800.0, 600.0);
        effect
    }

    fn assembled() -> DnaHelix {
        let mut effect = helix();
        for _ in 0..125 {
            effect.step();
        }
        effect
    }

    #[test]
    fn test_base_sequence_and_complements() {
        let effect = helix();
        assert_eq!(effect.pairs().len(), 24);
        assert_eq!(effect.sparks().len(), 60);
        let expected = [(Base::C, Base::A), (Base::J, Base::C), (Base::A, Base::J)];
        for (i, pair) in effect.pairs().iter().enumerate() {
            assert_eq!((pair.base1, pair.base2), expected[i % 3]);
        }
        assert_eq!(Base::A.bond_count(), 2);
        assert_eq!(Base::J.bond_count(), 3);
    }

    #[test]
    fn test_assembly_ends_on_target() {
        let mut effect = helix();
        for _ in 0..124 {
            effect.step();
        }
        assert!(matches!(effect.phase(), HelixPhase::Assembling { .. }));
        effect.step();
        assert_eq!(effect.phase(), HelixPhase::Steady);
        for (i, pair) in effect.pairs().iter().enumerate() {
            let target = effect.target(i);
            assert!((pair.p1.x - target.x1).abs() < 1e-3);
            assert!((pair.p2.y - target.y).abs() < 1e-3);
        }
    }

    #[test]
    fn test_click_while_assembling_does_not_shatter() {
        let mut effect = helix();
        effect.step();
        effect.handle_event(&InputEvent::Click(Vec2::new(400.0, 300.0)));
        assert!(matches!(effect.phase(), HelixPhase::Assembling { .. }));
        assert_eq!(effect.ripples.len(), 1);
    }

    #[test]
    fn test_shatter_cycle_returns_to_steady() {
        let mut effect = assembled();
        effect.handle_event(&InputEvent::Click(Vec2::new(400.0, 300.0)));
        assert_eq!(effect.phase(), HelixPhase::Shattering { elapsed: 0.0 });

        // a second click mid-shatter is ignored
        effect.step();
        effect.handle_event(&InputEvent::Click(Vec2::new(10.0, 10.0)));
        assert_eq!(effect.phase(), HelixPhase::Shattering { elapsed: 16.0 });

        for _ in 1..31 {
            effect.step();
        }
        assert!(matches!(effect.phase(), HelixPhase::Shattering { .. }));
        effect.step();
        assert!(matches!(effect.phase(), HelixPhase::Reassembling { .. }));
        for _ in 0..31 {
            effect.step();
        }
        assert_eq!(effect.phase(), HelixPhase::Steady);
        for (i, pair) in effect.pairs().iter().enumerate() {
            assert!((pair.p1.x - effect.target(i).x1).abs() < 1e-3);
        }
    }

    #[test]
    fn test_shatter_moves_bases_outward() {
        let mut effect = assembled();
        let center = Vec2::new(400.0, 300.0);
        let before: Vec<f32> = effect.pairs().iter().map(|p| p.p1.distance(center)).collect();
        effect.handle_event(&InputEvent::Click(center));
        effect.step();
        for (pair, d) in effect.pairs().iter().zip(before) {
            assert!(pair.p1.distance(center) > d);
            assert!(pair.trail.len() <= 10);
        }
    }

    #[test]
    fn test_glow_follows_pointer() {
        let mut effect = assembled();
        let at = effect.pairs()[4].p1;
        effect.handle_event(&InputEvent::Move(at));
        effect.step();
        assert!(effect.pairs()[4].glow > 0.8);
        effect.handle_event(&InputEvent::Leave);
        let glow = effect.pairs()[4].glow;
        effect.step();
        assert!((effect.pairs()[4].glow - glow * 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_click_sparks_are_capped() {
        let config = DnaConfig {
            click_sparks: 50,
            max_sparks: 80,
            ..DnaConfig::default()
        };
        let mut effect = DnaHelix::new(config, 2);
        effect.resize(800.0, 600.0);
        effect.handle_event(&InputEvent::Click(Vec2::new(1.0, 1.0)));
        effect.handle_event(&InputEvent::Click(Vec2::new(1.0, 1.0)));
        assert_eq!(effect.sparks().len(), 80);
    }

    #[test]
    fn test_sparks_wrap_inside() {
        let mut effect = assembled();
        for _ in 0..300 {
            effect.step();
        }
        for spark in effect.sparks() {
            assert!((0.0..=800.0).contains(&spark.position.x));
            assert!((0.1..=0.8).contains(&spark.opacity));
        }
    }
}
