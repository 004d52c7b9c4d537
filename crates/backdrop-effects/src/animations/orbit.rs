//! Clusters of orbiting dots. Clicks drop a decaying gravity warp that tugs
//! every cluster toward it; the pointer adds depth parallax.

use std::f32::consts::TAU;

use backdrop_core::{Effect, EffectKind, InputEvent, Pointer, Rgba, Surface, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::random::between;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub cluster_count: usize,
    pub members_per_cluster: usize,
    pub orbit_min: f32,
    pub orbit_max: f32,
    /// Angular speed range in radians per tick.
    pub speed_min: f32,
    pub speed_max: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// Strength of a fresh warp.
    pub warp_strength: f32,
    pub warp_decay: f32,
    /// Warps weaker than this switch off.
    pub warp_threshold: f32,
    /// Fraction of the cluster-to-warp offset applied per unit of gravity.
    pub warp_pull: f32,
    pub warp_max_gravity: f32,
    /// Pointer offset from the centre times depth, in surface units.
    pub parallax: f32,
    pub color: String,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            cluster_count: 6,
            members_per_cluster: 25,
            orbit_min: 20.0,
            orbit_max: 80.0,
            speed_min: 0.002,
            speed_max: 0.006,
            size_min: 1.0,
            size_max: 3.0,
            warp_strength: 20.0,
            warp_decay: 0.9,
            warp_threshold: 0.05,
            warp_pull: 0.02,
            warp_max_gravity: 5.0,
            parallax: 0.1,
            color: "rgba(255, 255, 255, 0.9)".to_string(),
        }
    }
}

impl OrbitConfig {
    pub fn clamped(mut self) -> Self {
        self.cluster_count = self.cluster_count.min(100);
        self.members_per_cluster = self.members_per_cluster.min(1000);
        self.orbit_min = self.orbit_min.max(0.0);
        self.orbit_max = self.orbit_max.max(self.orbit_min);
        self.speed_max = self.speed_max.max(self.speed_min);
        self.size_min = self.size_min.max(0.1);
        self.size_max = self.size_max.max(self.size_min);
        self.warp_strength = self.warp_strength.max(0.0);
        self.warp_decay = self.warp_decay.clamp(0.0, 0.999);
        self.warp_threshold = self.warp_threshold.max(f32::EPSILON);
        self.warp_max_gravity = self.warp_max_gravity.max(0.0);
        self
    }
}

/// One dot orbiting its cluster centre.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterMember {
    pub angle: f32,
    pub orbit: f32,
    pub speed: f32,
    pub size: f32,
    pub opacity: f32,
    /// Parallax weight, `0.5..1.0`.
    pub depth: f32,
    /// Where the dot was drawn on the last tick.
    pub position: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub center: Vec2,
    pub members: Vec<ClusterMember>,
}

/// Click-spawned attractor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityWarp {
    pub center: Vec2,
    pub strength: f32,
}

pub struct Orbit {
    config: OrbitConfig,
    color: Rgba,
    rng: StdRng,
    width: f32,
    height: f32,
    clusters: Vec<Cluster>,
    warp: Option<GravityWarp>,
    pointer: Pointer,
}

impl Orbit {
    pub fn new(config: OrbitConfig, seed: u64) -> Self {
        let config = config.clamped();
        let color = Rgba::parse_or(&config.color, Rgba::WHITE.with_alpha(0.9));
        Self {
            config,
            color,
            rng: StdRng::seed_from_u64(seed),
            width: 0.0,
            height: 0.0,
            clusters: Vec::new(),
            warp: None,
            pointer: Pointer::default(),
        }
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// The active warp, if any.
    pub fn warp(&self) -> Option<GravityWarp> {
        self.warp
    }

    fn init(&mut self) {
        let rng = &mut self.rng;
        let cfg = &self.config;
        let (w, h) = (self.width, self.height);
        self.clusters = (0..cfg.cluster_count)
            .map(|_| {
                let center = Vec2::new(between(rng, 0.0, w), between(rng, 0.0, h));
                let members = (0..cfg.members_per_cluster)
                    .map(|_| ClusterMember {
                        angle: between(rng, 0.0, TAU),
                        orbit: between(rng, cfg.orbit_min, cfg.orbit_max),
                        speed: between(rng, cfg.speed_min, cfg.speed_max),
                        size: between(rng, cfg.size_min, cfg.size_max),
                        opacity: between(rng, 0.4, 1.0),
                        depth: between(rng, 0.5, 1.0),
                        position: center,
                    })
                    .collect();
                Cluster { center, members }
            })
            .collect();
        self.warp = None;
        tracing::debug!(clusters = self.clusters.len(), "orbit clusters initialized");
    }

    /// Offset a warp adds to every member of a cluster at `center`.
    fn warp_offset(&self, center: Vec2) -> Vec2 {
        let Some(warp) = self.warp else {
            return Vec2::ZERO;
        };
        let towards = warp.center - center;
        let gravity = (warp.strength / (towards.length() + 20.0)).min(self.config.warp_max_gravity);
        towards * (gravity * self.config.warp_pull)
    }
}

impl Effect for Orbit {
    fn kind(&self) -> EffectKind {
        EffectKind::Orbit
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        if width * height <= 0.0 {
            self.clusters.clear();
            self.warp = None;
            return;
        }
        self.init();
    }

    fn handle_event(&mut self, event: &InputEvent) {
        self.pointer.apply(event);
        match *event {
            InputEvent::Click(pos) => {
                self.warp = Some(GravityWarp {
                    center: pos,
                    strength: self.config.warp_strength,
                });
            }
            InputEvent::Resize { width, height } => self.resize(width, height),
            _ => {}
        }
    }

    fn step(&mut self) {
        if self.width * self.height <= 0.0 {
            return;
        }
        let centre = Vec2::new(self.width / 2.0, self.height / 2.0);
        let shift = (self.pointer.position().unwrap_or(centre) - centre) * self.config.parallax;

        let offsets: Vec<Vec2> = self.clusters.iter().map(|c| self.warp_offset(c.center)).collect();
        for (cluster, warp) in self.clusters.iter_mut().zip(offsets) {
            for member in &mut cluster.members {
                member.angle = (member.angle + member.speed).rem_euclid(TAU);
                member.position = cluster.center
                    + Vec2::from_angle(member.angle) * member.orbit
                    + warp
                    + shift * member.depth;
            }
        }

        if let Some(warp) = &mut self.warp {
            warp.strength *= self.config.warp_decay;
            if warp.strength < self.config.warp_threshold {
                self.warp = None;
            }
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        for cluster in &self.clusters {
            for member in &cluster.members {
                surface.fill_circle(member.position, member.size, self.color.with_alpha(member.opacity));
            }
        }
    }

    fn entity_count(&self) -> usize {
        self.clusters.iter().map(|c| c.members.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orbit() -> Orbit {
        let mut effect = Orbit::new(OrbitConfig::default(), 21);
        effect.resize(800.0, 600.0);
        effect
    }

    #[test]
    fn test_cluster_population() {
        let effect = orbit();
        assert_eq!(effect.clusters().len(), 6);
        assert_eq!(effect.entity_count(), 150);
        for member in effect.clusters().iter().flat_map(|c| &c.members) {
            assert!((20.0..80.0).contains(&member.orbit));
            assert!((0.5..1.0).contains(&member.depth));
        }
    }

    #[test]
    fn test_members_orbit_their_centre() {
        let mut effect = orbit();
        effect.step();
        for cluster in effect.clusters() {
            for member in &cluster.members {
                let d = member.position.distance(cluster.center);
                assert!((d - member.orbit).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_warp_decays_and_switches_off() {
        let mut effect = orbit();
        effect.handle_event(&InputEvent::Click(Vec2::new(400.0, 300.0)));
        assert_eq!(effect.warp().map(|w| w.strength), Some(20.0));
        effect.step();
        assert!((effect.warp().map_or(0.0, |w| w.strength) - 18.0).abs() < 1e-4);
        // 20 * 0.9^n < 0.05 first holds at n = 57
        for _ in 1..56 {
            effect.step();
        }
        assert!(effect.warp().is_some());
        effect.step();
        assert!(effect.warp().is_none());
    }

    #[test]
    fn test_warp_pulls_clusters_toward_click() {
        let mut effect = orbit();
        effect.clusters.truncate(1);
        effect.clusters[0].center = Vec2::new(100.0, 300.0);
        effect.clusters[0].members.truncate(1);
        effect.clusters[0].members[0].speed = 0.0;
        effect.handle_event(&InputEvent::Move(Vec2::new(400.0, 300.0)));
        effect.step();
        let calm = effect.clusters[0].members[0].position;
        effect.handle_event(&InputEvent::Click(Vec2::new(400.0, 300.0)));
        effect.step();
        let pulled = effect.clusters[0].members[0].position;
        // gravity 20 / 320 over 300 px at 0.02
        assert!((pulled.x - calm.x - 0.375).abs() < 1e-3);
    }

    #[test]
    fn test_pointer_parallax_scales_with_depth() {
        let mut effect = orbit();
        effect.step();
        let before = effect.clusters()[0].members[0].clone();
        effect.handle_event(&InputEvent::Move(Vec2::new(500.0, 300.0)));
        effect.clusters[0].members[0].speed = 0.0;
        effect.clusters[0].members[0].angle = before.angle;
        effect.step();
        let after = &effect.clusters()[0].members[0];
        assert!((after.position.x - before.position.x - 10.0 * before.depth).abs() < 1e-3);
    }
}
