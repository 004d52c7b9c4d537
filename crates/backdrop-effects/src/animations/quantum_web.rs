//! Entangled particle web: phase-noise drift, velocity trails, pulsing links
//! and a Shift-toggled attract/repel pointer.

use backdrop_core::{
    Boundary, Connection, ConnectionScan, Effect, EffectKind, FrameClock, InputEvent,
    InteractionMode, Pointer, Rgba, Surface, Trail, Vec2, radial_force,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::random::{angle, between, population, spread};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantumWebConfig {
    pub area_per_particle: f32,
    pub max_count: usize,
    /// Share of particles drawn as glowing quantum nodes.
    pub quantum_ratio: f32,
    pub mouse_radius: f32,
    pub attraction: f32,
    pub repulsion: f32,
    pub damping: f32,
    /// Velocity added per tick along the phase direction.
    pub wobble: f32,
    pub connection_distance: f32,
    pub connection_opacity: f32,
    /// Angular speed of the connection pulse, per second.
    pub pulse_speed: f32,
    pub quantum_color: String,
    pub normal_color: String,
    /// Draw the current interaction mode in the bottom-left corner.
    pub show_legend: bool,
}

impl Default for QuantumWebConfig {
    fn default() -> Self {
        Self {
            area_per_particle: 5000.0,
            max_count: 1000,
            quantum_ratio: 0.15,
            mouse_radius: 150.0,
            attraction: 0.01,
            repulsion: 0.05,
            damping: 0.98,
            wobble: 0.01,
            connection_distance: 150.0,
            connection_opacity: 0.7,
            pulse_speed: 3.0,
            quantum_color: "#7f5af0".to_string(),
            normal_color: "#2cb67d".to_string(),
            show_legend: true,
        }
    }
}

impl QuantumWebConfig {
    pub fn clamped(mut self) -> Self {
        self.area_per_particle = self.area_per_particle.max(1.0);
        self.quantum_ratio = self.quantum_ratio.clamp(0.0, 1.0);
        self.mouse_radius = self.mouse_radius.max(0.0);
        self.damping = self.damping.clamp(0.0, 1.0);
        self.connection_distance = self.connection_distance.max(0.0);
        self.connection_opacity = self.connection_opacity.clamp(0.0, 1.0);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Position before the last step; the distance to it drives trail intensity.
    pub last_position: Vec2,
    pub radius: f32,
    pub opacity: f32,
    pub quantum: bool,
    pub phase: f32,
    pub speed: f32,
    trail: Trail,
}

impl Node {
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// `min(1, moved * 20)`, trails are only drawn above 0.1.
    fn trail_intensity(&self) -> f32 {
        (self.position.distance(self.last_position) * 20.0).min(1.0)
    }
}

pub struct QuantumWeb {
    config: QuantumWebConfig,
    quantum_color: Rgba,
    normal_color: Rgba,
    rng: StdRng,
    clock: FrameClock,
    width: f32,
    height: f32,
    nodes: Vec<Node>,
    pointer: Pointer,
    scan: ConnectionScan,
    links: Vec<Connection>,
}

impl QuantumWeb {
    pub fn new(config: QuantumWebConfig, seed: u64) -> Self {
        let config = config.clamped();
        let quantum_color = Rgba::parse_or(&config.quantum_color, Rgba::from_hex(0x7f5af0));
        let normal_color = Rgba::parse_or(&config.normal_color, Rgba::from_hex(0x2cb67d));
        let scan = ConnectionScan::new(config.connection_distance, config.connection_opacity);
        Self {
            config,
            quantum_color,
            normal_color,
            rng: StdRng::seed_from_u64(seed),
            clock: FrameClock::new(),
            width: 0.0,
            height: 0.0,
            nodes: Vec::new(),
            pointer: Pointer::default(),
            scan,
            links: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn mode(&self) -> InteractionMode {
        self.pointer.mode()
    }

    fn color(&self, node: &Node) -> Rgba {
        if node.quantum {
            self.quantum_color
        } else {
            self.normal_color
        }
    }

    fn init(&mut self) {
        let count = population(
            self.width,
            self.height,
            self.config.area_per_particle,
            self.config.max_count,
        );
        let rng = &mut self.rng;
        let quantum_threshold = 1.0 - self.config.quantum_ratio;
        self.nodes = (0..count)
            .map(|_| {
                let quantum = rng.r#gen::<f32>() > quantum_threshold;
                let position = Vec2::new(between(rng, 0.0, self.width), between(rng, 0.0, self.height));
                Node {
                    position,
                    velocity: Vec2::new(spread(rng, 0.25), spread(rng, 0.25)),
                    last_position: position,
                    radius: if quantum {
                        between(rng, 1.0, 3.0)
                    } else {
                        between(rng, 0.5, 2.0)
                    },
                    opacity: between(rng, 0.2, 0.6),
                    quantum,
                    phase: angle(rng),
                    speed: between(rng, 0.01, 0.06),
                    trail: Trail::new(rng.gen_range(5..15)),
                }
            })
            .collect();
        self.links.clear();
        tracing::debug!(nodes = self.nodes.len(), "quantum web initialized");
    }
}

impl Effect for QuantumWeb {
    fn kind(&self) -> EffectKind {
        EffectKind::QuantumWeb
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        if width * height <= 0.0 {
            self.nodes.clear();
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
        let cfg = &self.config;
        let mode = self.pointer.mode();

        for node in &mut self.nodes {
            node.last_position = node.position;
            node.trail.push(node.position);

            node.phase += node.speed;
            node.velocity += Vec2::new(node.phase.sin(), node.phase.cos()) * cfg.wobble;
            node.velocity *= cfg.damping;

            if let Some(mouse) = self.pointer.position() {
                if let Some(force) = radial_force(node.position, mouse, cfg.mouse_radius) {
                    match mode {
                        InteractionMode::Attract => {
                            node.velocity += (mouse - node.position) * (force.magnitude * cfg.attraction);
                        }
                        InteractionMode::Repel => {
                            let rim = mouse + force.direction * cfg.mouse_radius;
                            node.velocity += (node.position - rim) * (force.magnitude * cfg.repulsion);
                        }
                    }
                }
            }

            let wrap = Boundary::Wrap {
                margin: node.radius,
            };
            let mut velocity = node.velocity;
            wrap.apply(&mut node.position, &mut velocity, self.width, self.height);
            node.position += node.velocity;
        }

        let positions: Vec<Vec2> = self.nodes.iter().map(|n| n.position).collect();
        self.scan.scan_into(&positions, &mut self.links);
    }

    fn render(&self, surface: &mut dyn Surface) {
        for node in &self.nodes {
            if node.trail.len() < 2 {
                continue;
            }
            let intensity = node.trail_intensity();
            if intensity <= 0.1 {
                continue;
            }
            let max_alpha = (intensity * 80.0).floor() / 255.0;
            let color = self.color(node);
            let width = if node.quantum { 1.5 } else { 1.0 };
            let points = node.trail.positions();
            let segments = points.len() - 1;
            for (i, pair) in points.windows(2).enumerate() {
                let ramp = (i + 1) as f32 / segments as f32;
                surface.line(pair[0], pair[1], width, color.with_alpha(max_alpha * ramp));
            }
        }

        let t = self.clock.elapsed_secs();
        let pulse = (t * self.config.pulse_speed).sin() * 0.3 + 0.7;
        for link in &self.links {
            let (a, b) = (&self.nodes[link.a], &self.nodes[link.b]);
            let mid = a.position.lerp(b.position, 0.5);
            let alpha = link.opacity * pulse;
            surface.line(a.position, mid, 1.0, self.color(a).with_alpha(alpha));
            surface.line(mid, b.position, 1.0, self.color(b).with_alpha(alpha));
        }

        for node in &self.nodes {
            let color = self.color(node);
            surface.fill_circle(node.position, node.radius, color);
            if node.quantum {
                surface.glow(
                    node.position,
                    node.radius * 3.0,
                    color.with_alpha(128.0 / 255.0),
                    color.with_alpha(0.0),
                );
            }
        }

        if self.config.show_legend {
            let label = match self.pointer.mode() {
                InteractionMode::Attract => "Attraction Mode (Shift)",
                InteractionMode::Repel => "Repulsion Mode (Hold Shift for attraction)",
            };
            let size = 12.0;
            let anchor = Vec2::new(16.0 + label.chars().count() as f32 * size * 0.3, self.height - 16.0);
            surface.text(anchor, label, size, Rgba::WHITE.with_alpha(0.8));
        }
    }

    fn entity_count(&self) -> usize {
        self.nodes.len()
    }
}
