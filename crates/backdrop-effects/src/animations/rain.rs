//! Falling glyph columns: data rain and its binary matrix variant.
//!
//! Both effects share the same column simulation. They differ in the glyph
//! set, in how pointer intensity is measured and in how far the pointer
//! reaches: data rain deflects individual glyphs sideways, the binary
//! matrix only brightens whole columns near the pointer.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use backdrop_core::{
    Boundary, BoundaryOutcome, Effect, EffectKind, InputEvent, IntensitySource, Pointer, Rgba,
    RippleDecay, RippleField, Surface, Vec2, radial_force,
};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::chars::{BINARY_CHARS, DATA_RAIN_CHARS};
use crate::random::{between, chance};

/// Pointer intensity multiplier applied every tick.
const INTENSITY_DECAY: f32 = 0.92;
/// Minimum intensity for the pointer glow to apply.
const GLOW_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataRainConfig {
    pub font_size: f32,
    /// Columns per pixel of surface width.
    pub density: f32,
    /// Phase advance of the head flicker per tick.
    pub flicker_speed: f32,
    pub trail_length: usize,
    pub char_set: String,
    /// Probability per glyph per tick of swapping to a new glyph.
    pub change_rate: f32,
    /// Probability that a changed column grows a new head glyph.
    pub growth_chance: f32,
    /// Radius inside which a moving pointer pushes glyphs sideways.
    pub deflection_radius: f32,
    /// Pointer intensity needed before glyphs are deflected.
    pub deflection_threshold: f32,
    pub glow_radius: f32,
    pub color: String,
    pub ripple_color: String,
}

impl Default for DataRainConfig {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            density: 0.05,
            flicker_speed: 0.05,
            trail_length: 15,
            char_set: DATA_RAIN_CHARS.iter().collect(),
            change_rate: 0.1,
            growth_chance: 0.1,
            deflection_radius: 50.0,
            deflection_threshold: 0.2,
            glow_radius: 80.0,
            color: "rgba(0, 255, 0, 0.8)".to_string(),
            ripple_color: "rgba(0, 255, 127, 0.5)".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinaryMatrixConfig {
    pub font_size: f32,
    pub density: f32,
    pub flicker_speed: f32,
    pub trail_length: usize,
    pub char_set: String,
    pub change_rate: f32,
    pub growth_chance: f32,
    /// Columns whose head is this close to the pointer glow and change faster.
    pub glow_radius: f32,
    pub color: String,
    pub ripple_color: String,
}

impl Default for BinaryMatrixConfig {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            density: 0.05,
            flicker_speed: 0.05,
            trail_length: 15,
            char_set: BINARY_CHARS.iter().collect(),
            change_rate: 0.1,
            growth_chance: 0.1,
            glow_radius: 200.0,
            color: "rgba(0, 255, 0, 0.8)".to_string(),
            ripple_color: "rgba(0, 255, 127, 0.5)".to_string(),
        }
    }
}

/// How far the pointer reaches into the rain.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Reach {
    /// Distance measured per column from its head glyph before the move.
    Column {
        glow_radius: f32,
        rate_boost: f32,
        gain: f32,
    },
    /// Distance measured per glyph after the move, with sideways deflection.
    Glyph {
        deflection_radius: f32,
        deflection_threshold: f32,
        glow_radius: f32,
        rate_boost: f32,
        gain: f32,
    },
}

/// Resolved parameters shared by both rain variants.
#[derive(Debug, Clone)]
struct RainParams {
    font_size: f32,
    density: f32,
    flicker_speed: f32,
    trail_length: usize,
    chars: Vec<char>,
    change_rate: f32,
    growth_chance: f32,
    color: Rgba,
    ripple_color: Rgba,
    reach: Reach,
}

impl RainParams {
    fn resolve_chars(set: &str, fallback: &[char]) -> Vec<char> {
        let chars: Vec<char> = set.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.is_empty() {
            tracing::warn!("empty glyph set, using defaults");
            fallback.to_vec()
        } else {
            chars
        }
    }
}

impl From<&DataRainConfig> for RainParams {
    fn from(cfg: &DataRainConfig) -> Self {
        Self {
            font_size: cfg.font_size.max(4.0),
            density: cfg.density.max(0.0),
            flicker_speed: cfg.flicker_speed,
            trail_length: cfg.trail_length.max(1),
            chars: Self::resolve_chars(&cfg.char_set, DATA_RAIN_CHARS),
            change_rate: cfg.change_rate.clamp(0.0, 1.0),
            growth_chance: cfg.growth_chance.clamp(0.0, 1.0),
            color: Rgba::parse_or(&cfg.color, Rgba::new(0, 255, 0, 0.8)),
            ripple_color: Rgba::parse_or(&cfg.ripple_color, Rgba::new(0, 255, 127, 0.5)),
            reach: Reach::Glyph {
                deflection_radius: cfg.deflection_radius.max(0.0),
                deflection_threshold: cfg.deflection_threshold,
                glow_radius: cfg.glow_radius.max(0.0),
                rate_boost: 4.0,
                gain: 0.6,
            },
        }
    }
}

impl From<&BinaryMatrixConfig> for RainParams {
    fn from(cfg: &BinaryMatrixConfig) -> Self {
        Self {
            font_size: cfg.font_size.max(4.0),
            density: cfg.density.max(0.0),
            flicker_speed: cfg.flicker_speed,
            trail_length: cfg.trail_length.max(1),
            chars: Self::resolve_chars(&cfg.char_set, BINARY_CHARS),
            change_rate: cfg.change_rate.clamp(0.0, 1.0),
            growth_chance: cfg.growth_chance.clamp(0.0, 1.0),
            color: Rgba::parse_or(&cfg.color, Rgba::new(0, 255, 0, 0.8)),
            ripple_color: Rgba::parse_or(&cfg.ripple_color, Rgba::new(0, 255, 127, 0.5)),
            reach: Reach::Column {
                glow_radius: cfg.glow_radius.max(0.0),
                rate_boost: 3.0,
                gain: 1.0,
            },
        }
    }
}

/// A single falling glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct RainGlyph {
    pub y: f32,
    pub ch: char,
    /// Pixels fallen per tick.
    pub speed: f32,
    /// Sideways offset from the column's home x.
    pub deflection: f32,
    /// Multiplier applied to `deflection` every tick.
    pub deflection_decay: f32,
    /// Extra alpha from pointer proximity, set during the last step.
    pub glow: f32,
}

/// State for a single rain column. Index 0 is the head.
#[derive(Debug, Clone)]
pub struct RainColumn {
    /// Home x position at the column centre.
    pub x: f32,
    pub glyphs: VecDeque<RainGlyph>,
}

fn new_glyph<R: Rng + ?Sized>(rng: &mut R, chars: &[char], y: f32) -> RainGlyph {
    RainGlyph {
        y,
        ch: random_char(rng, chars),
        speed: between(rng, 0.5, 2.5),
        deflection: 0.0,
        deflection_decay: between(rng, 0.95, 0.99),
        glow: 0.0,
    }
}

fn random_char<R: Rng + ?Sized>(rng: &mut R, chars: &[char]) -> char {
    crate::random::pick(rng, chars).copied().unwrap_or('0')
}

/// Lay out `floor(width * density)` evenly spaced columns, each filled with
/// one glyph per font row.
fn init_columns<R: Rng + ?Sized>(rng: &mut R, params: &RainParams, width: f32, height: f32) -> Vec<RainColumn> {
    let count = (width * params.density).floor().max(0.0) as usize;
    if count == 0 {
        return Vec::new();
    }
    let column_width = width / count as f32;
    let rows = (height / params.font_size).floor().max(0.0) as usize;
    (0..count)
        .map(|i| RainColumn {
            x: i as f32 * column_width + column_width / 2.0,
            glyphs: (0..rows)
                .map(|j| new_glyph(rng, &params.chars, j as f32 * params.font_size))
                .collect(),
        })
        .collect()
}

/// `(1 - min(i, trail) / trail) * brightness * flicker + glow`, where the
/// head glyph has full brightness and the flicker only applies to it.
fn glyph_alpha(index: usize, trail_length: usize, flicker: f32, glow: f32) -> f32 {
    let trail = trail_length.max(1) as f32;
    let opacity = 1.0 - index.min(trail_length) as f32 / trail;
    let (brightness, flicker) = if index == 0 {
        (1.0, flicker)
    } else {
        (0.3 + 0.7 * opacity, 1.0)
    };
    opacity * brightness * flicker + glow
}

/// Data rain or binary matrix, depending on how it was built.
pub struct Rain {
    kind: EffectKind,
    params: RainParams,
    rng: StdRng,
    width: f32,
    height: f32,
    columns: Vec<RainColumn>,
    ripples: RippleField,
    pointer: Pointer,
    flicker_phase: f32,
}

impl Rain {
    pub fn data_rain(config: &DataRainConfig, seed: u64) -> Self {
        Self::build(
            EffectKind::DataRain,
            RainParams::from(config),
            Pointer::new(IntensitySource::Velocity { scale: 8.0 }),
            seed,
        )
    }

    pub fn binary_matrix(config: &BinaryMatrixConfig, seed: u64) -> Self {
        Self::build(
            EffectKind::BinaryMatrix,
            RainParams::from(config),
            Pointer::new(IntensitySource::Constant),
            seed,
        )
    }

    fn build(kind: EffectKind, params: RainParams, pointer: Pointer, seed: u64) -> Self {
        Self {
            kind,
            params,
            rng: StdRng::seed_from_u64(seed),
            width: 0.0,
            height: 0.0,
            columns: Vec::new(),
            ripples: RippleField::new(
                RippleDecay::Fading {
                    growth: 3.0,
                    fade: 0.015,
                },
                0.8,
            ),
            pointer,
            flicker_phase: 0.0,
        }
    }

    pub fn columns(&self) -> &[RainColumn] {
        &self.columns
    }

    fn flicker(&self) -> f32 {
        0.7 + self.flicker_phase.sin() * 0.3
    }

    fn update_column(&mut self, index: usize) {
        let params = &self.params;
        let mouse = self.pointer.position();
        let intensity = self.pointer.intensity();
        let (width, height) = (self.width, self.height);
        let rng = &mut self.rng;
        let column = &mut self.columns[index];

        let head_distance = match (mouse, column.glyphs.front()) {
            (Some(m), head) => Vec2::new(column.x, head.map_or(0.0, |g| g.y)).distance(m),
            (None, _) => f32::INFINITY,
        };
        let mut changed = false;

        for glyph in column.glyphs.iter_mut() {
            glyph.y += glyph.speed;

            let (distance, glow_radius, rate_boost, gain) = match params.reach {
                Reach::Column {
                    glow_radius,
                    rate_boost,
                    gain,
                } => (head_distance, glow_radius, rate_boost, gain),
                Reach::Glyph {
                    deflection_radius,
                    deflection_threshold,
                    glow_radius,
                    rate_boost,
                    gain,
                } => {
                    let at = Vec2::new(column.x + glyph.deflection, glyph.y);
                    let distance = mouse.map_or(f32::INFINITY, |m| at.distance(m));
                    if intensity > deflection_threshold {
                        if let Some(force) = mouse.and_then(|m| radial_force(at, m, deflection_radius)) {
                            glyph.deflection += force.direction.x * force.magnitude * intensity * 2.0;
                        }
                    }
                    glyph.deflection *= glyph.deflection_decay;
                    (distance, glow_radius, rate_boost, gain)
                }
            };

            let mut position = Vec2::new(column.x, glyph.y);
            let mut velocity = Vec2::new(0.0, glyph.speed);
            let respawn = Boundary::Respawn {
                margin: params.font_size,
            };
            if respawn.apply(&mut position, &mut velocity, width, height) == BoundaryOutcome::Respawn {
                *glyph = RainGlyph {
                    deflection_decay: glyph.deflection_decay,
                    ..new_glyph(rng, &params.chars, -params.font_size)
                };
                changed = true;
            }

            let affected = distance < glow_radius && intensity > GLOW_THRESHOLD;
            let rate = if affected {
                params.change_rate * rate_boost
            } else {
                params.change_rate
            };
            if chance(rng, rate) {
                glyph.ch = random_char(rng, &params.chars);
                changed = true;
            }

            glyph.glow = if affected && glow_radius > 0.0 {
                (1.0 - (distance / glow_radius).min(1.0)) * intensity * gain
            } else {
                0.0
            };
        }

        if changed && chance(rng, params.growth_chance) {
            column
                .glyphs
                .push_front(new_glyph(rng, &params.chars, -params.font_size));
            if column.glyphs.len() > params.trail_length * 2 {
                column.glyphs.pop_back();
            }
        }
    }
}

impl Effect for Rain {
    fn kind(&self) -> EffectKind {
        self.kind
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.ripples.clear();
        if width * height <= 0.0 {
            self.columns.clear();
            return;
        }
        self.columns = init_columns(&mut self.rng, &self.params, width, height);
        tracing::debug!(kind = %self.kind, columns = self.columns.len(), "rain initialized");
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
        self.flicker_phase = (self.flicker_phase + self.params.flicker_speed).rem_euclid(TAU);
        self.pointer.decay(INTENSITY_DECAY);
        self.ripples.step();
        for index in 0..self.columns.len() {
            self.update_column(index);
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        for ripple in self.ripples.iter() {
            let color = self.params.ripple_color;
            surface.stroke_circle(ripple.center, ripple.radius, 2.0, color.scale_alpha(ripple.opacity));
            surface.stroke_circle(
                ripple.center,
                ripple.radius * 0.7,
                2.0,
                color.scale_alpha(ripple.opacity * 0.5),
            );
        }

        let flicker = self.flicker();
        let fs = self.params.font_size;
        let mut buf = [0u8; 4];
        for column in &self.columns {
            for (i, glyph) in column.glyphs.iter().enumerate() {
                let alpha = glyph_alpha(i, self.params.trail_length, flicker, glyph.glow);
                let color = self.params.color.with_alpha(alpha);
                let x = column.x + glyph.deflection;
                surface.text(Vec2::new(x, glyph.y), glyph.ch.encode_utf8(&mut buf), fs, color);
                if i == 0 {
                    surface.line(
                        Vec2::new(x, glyph.y - fs * 0.8),
                        Vec2::new(x, glyph.y - fs * 2.5),
                        1.0,
                        color,
                    );
                }
            }
        }
    }

    fn entity_count(&self) -> usize {
        self.columns.iter().map(|c| c.glyphs.len()).sum()
    }
}
