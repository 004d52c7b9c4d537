//! The contract every animated background implements, and the catalogue of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::input::InputEvent;
use crate::surface::Surface;

/// One animated background instance.
///
/// The host calls [`Effect::step`] then [`Effect::render`] once per frame.
/// Rendering never mutates simulation state.
pub trait Effect {
    fn kind(&self) -> EffectKind;

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Rebuild the entity store for a new surface size. Zero-area sizes leave
    /// the effect empty until a positive size arrives.
    fn resize(&mut self, width: f32, height: f32);

    fn handle_event(&mut self, event: &InputEvent);

    /// Advance the simulation by one tick.
    fn step(&mut self);

    /// Paint the current state, back to front.
    fn render(&self, surface: &mut dyn Surface);

    /// Number of simulated entities (excluding transient effects).
    fn entity_count(&self) -> usize;
}

/// Available background effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    #[default]
    Particles,
    Constellation,
    QuantumWeb,
    DataRain,
    BinaryMatrix,
    DnaSpark,
    DnaSpark3d,
    Aurora,
    Nebula,
    Halo,
    Smoke,
    Orbit,
    TextParticles,
}

impl EffectKind {
    pub const ALL: [EffectKind; 13] = [
        EffectKind::Particles,
        EffectKind::Constellation,
        EffectKind::QuantumWeb,
        EffectKind::DataRain,
        EffectKind::BinaryMatrix,
        EffectKind::DnaSpark,
        EffectKind::DnaSpark3d,
        EffectKind::Aurora,
        EffectKind::Nebula,
        EffectKind::Halo,
        EffectKind::Smoke,
        EffectKind::Orbit,
        EffectKind::TextParticles,
    ];

    /// Identifier used in config files and on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            EffectKind::Particles => "particles",
            EffectKind::Constellation => "constellation",
            EffectKind::QuantumWeb => "quantum-web",
            EffectKind::DataRain => "data-rain",
            EffectKind::BinaryMatrix => "binary-matrix",
            EffectKind::DnaSpark => "dna-spark",
            EffectKind::DnaSpark3d => "dna-spark3d",
            EffectKind::Aurora => "aurora",
            EffectKind::Nebula => "nebula",
            EffectKind::Halo => "halo",
            EffectKind::Smoke => "smoke",
            EffectKind::Orbit => "orbit",
            EffectKind::TextParticles => "text-particles",
        }
    }

    /// Human-readable description for listings.
    pub const fn description(self) -> &'static str {
        match self {
            EffectKind::Particles => "drifting particle field with links and ripples",
            EffectKind::Constellation => "linked stars with shooting stars and labels",
            EffectKind::QuantumWeb => "tunnelling particles with pulsing links",
            EffectKind::DataRain => "falling glyph columns that part around the pointer",
            EffectKind::BinaryMatrix => "falling binary columns lit by the pointer",
            EffectKind::DnaSpark => "2D double helix that shatters on click",
            EffectKind::DnaSpark3d => "3D double helix seen from an orbiting camera",
            EffectKind::Aurora => "layered hue-cycling waves",
            EffectKind::Nebula => "drifting glowing blobs",
            EffectKind::Halo => "pulsing soft halos",
            EffectKind::Smoke => "smoke particles pushed by the pointer",
            EffectKind::Orbit => "orbiting clusters with gravity warps",
            EffectKind::TextParticles => "text made of particles that scatter",
        }
    }

    /// Cycle to the next effect.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Cycle to the previous effect.
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned for an unrecognised effect name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEffect(pub String);

impl fmt::Display for UnknownEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown effect `{}`", self.0)
    }
}

impl std::error::Error for UnknownEffect {}

impl FromStr for EffectKind {
    type Err = UnknownEffect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| UnknownEffect(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_cycles_through_all() {
        let mut kind = EffectKind::Particles;
        for _ in 0..EffectKind::ALL.len() {
            kind = kind.next();
        }
        assert_eq!(kind, EffectKind::Particles);
        assert_eq!(EffectKind::Particles.prev(), EffectKind::TextParticles);
        assert_eq!(EffectKind::TextParticles.next(), EffectKind::Particles);
    }

    #[test]
    fn test_names_parse_back() {
        for kind in EffectKind::ALL {
            assert_eq!(kind.name().parse::<EffectKind>(), Ok(kind));
        }
        assert_eq!("quantum_web".parse::<EffectKind>(), Ok(EffectKind::QuantumWeb));
        assert!("lava-lamp".parse::<EffectKind>().is_err());
    }

    #[test]
    fn test_serde_uses_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            effect: EffectKind,
        }
        let w: Wrapper = toml::from_str("effect = \"dna-spark3d\"").unwrap();
        assert_eq!(w.effect, EffectKind::DnaSpark3d);
    }
}
