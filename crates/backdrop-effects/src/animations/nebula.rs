//! Soft drifting glow blobs over a radial wash that follows the pointer.

use backdrop_core::{Effect, EffectKind, FrameClock, InputEvent, Pointer, Rgba, Surface, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NebulaConfig {
    pub base_color: String,
    pub glow_color: String,
    /// Scales the number of blobs.
    pub intensity: f32,
    pub blob_count: usize,
    pub blob_radius_min: f32,
    pub blob_radius_max: f32,
    /// Gradient radius as a fraction of the blob radius.
    pub gradient_spread: f32,
}

impl Default for NebulaConfig {
    fn default() -> Self {
        Self {
            base_color: "rgba(20, 0, 40, 0.3)".to_string(),
            glow_color: "rgba(255, 100, 200, 0.08)".to_string(),
            intensity: 1.0,
            blob_count: 10,
            blob_radius_min: 40.0,
            blob_radius_max: 140.0,
            gradient_spread: 0.75,
        }
    }
}

impl NebulaConfig {
    pub fn clamped(mut self) -> Self {
        self.intensity = self.intensity.clamp(0.0, 10.0);
        self.blob_count = self.blob_count.min(500);
        self.blob_radius_min = self.blob_radius_min.max(0.0);
        self.blob_radius_max = self.blob_radius_max.max(self.blob_radius_min);
        self.gradient_spread = self.gradient_spread.max(0.0);
        self
    }

    /// `max(1, floor(blob_count * intensity))`.
    pub fn blobs(&self) -> usize {
        ((self.blob_count as f32 * self.intensity).floor() as usize).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    pub center: Vec2,
    pub radius: f32,
}

pub struct Nebula {
    config: NebulaConfig,
    base: Rgba,
    glow: Rgba,
    clock: FrameClock,
    width: f32,
    height: f32,
    blobs: Vec<Blob>,
    pointer: Pointer,
}

impl Nebula {
    pub fn new(config: NebulaConfig) -> Self {
        let config = config.clamped();
        let base = Rgba::parse_or(&config.base_color, Rgba::new(20, 0, 40, 0.3));
        let glow = Rgba::parse_or(&config.glow_color, Rgba::new(255, 100, 200, 0.08));
        Self {
            config,
            base,
            glow,
            clock: FrameClock::new(),
            width: 0.0,
            height: 0.0,
            blobs: Vec::new(),
            pointer: Pointer::default(),
        }
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    fn place_blobs(&mut self, t: f32) {
        let (w, h) = (self.width, self.height);
        let (min, max) = (self.config.blob_radius_min, self.config.blob_radius_max);
        self.blobs = (0..self.config.blobs())
            .map(|i| {
                let i = i as f32;
                Blob {
                    center: Vec2::new(
                        (t + i).sin() * w * 0.5 + w / 2.0,
                        (t * 0.7 + i * 0.3).cos() * h * 0.4 + h / 2.0,
                    ),
                    radius: (t * 0.5 + i).sin().abs() * (max - min) + min,
                }
            })
            .collect();
    }
}

impl Effect for Nebula {
    fn kind(&self) -> EffectKind {
        EffectKind::Nebula
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.blobs.clear();
        if width * height > 0.0 {
            self.place_blobs(self.clock.elapsed_secs());
        }
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
        self.place_blobs(self.clock.elapsed_secs());
    }

    fn render(&self, surface: &mut dyn Surface) {
        let centre = Vec2::new(self.width / 2.0, self.height / 2.0);
        let focus = self.pointer.position().unwrap_or(centre);
        surface.fill(self.base);
        surface.glow(focus, self.width.max(self.height) * 0.75, self.glow, self.base);

        for blob in &self.blobs {
            surface.glow(
                blob.center,
                blob.radius * self.config.gradient_spread,
                self.glow,
                self.glow.with_alpha(0.0),
            );
        }
    }

    fn entity_count(&self) -> usize {
        self.blobs.len()
    }
}
