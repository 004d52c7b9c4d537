//! Per-effect tuning tables and the factory that builds effects from them.

use backdrop_core::{Effect, EffectKind};
use serde::{Deserialize, Serialize};

use crate::animations::aurora::{Aurora, AuroraConfig};
use crate::animations::constellation::{Constellation, ConstellationConfig};
use crate::animations::dna::{DnaConfig, DnaHelix};
use crate::animations::dna3d::{Dna3dConfig, DnaHelix3d};
use crate::animations::halo::{Halo, HaloConfig};
use crate::animations::nebula::{Nebula, NebulaConfig};
use crate::animations::orbit::{Orbit, OrbitConfig};
use crate::animations::particles::{Particles, ParticlesConfig};
use crate::animations::quantum_web::{QuantumWeb, QuantumWebConfig};
use crate::animations::rain::{BinaryMatrixConfig, DataRainConfig, Rain};
use crate::animations::smoke::{Smoke, SmokeConfig};
use crate::animations::text::{TextParticles, TextParticlesConfig};

/// Configuration for every effect, one table each.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EffectSettings {
    pub particles: ParticlesConfig,
    pub constellation: ConstellationConfig,
    pub quantum_web: QuantumWebConfig,
    pub data_rain: DataRainConfig,
    pub binary_matrix: BinaryMatrixConfig,
    pub dna_spark: DnaConfig,
    pub dna_spark3d: Dna3dConfig,
    pub aurora: AuroraConfig,
    pub nebula: NebulaConfig,
    pub halo: HaloConfig,
    pub smoke: SmokeConfig,
    pub orbit: OrbitConfig,
    pub text_particles: TextParticlesConfig,
}

/// Build a fresh, unsized effect. Call [`Effect::resize`] before stepping.
pub fn create_effect(kind: EffectKind, settings: &EffectSettings, seed: u64) -> Box<dyn Effect> {
    match kind {
        EffectKind::Particles => Box::new(Particles::new(settings.particles.clone(), seed)),
        EffectKind::Constellation => {
            Box::new(Constellation::new(settings.constellation.clone(), seed))
        }
        EffectKind::QuantumWeb => Box::new(QuantumWeb::new(settings.quantum_web.clone(), seed)),
        EffectKind::DataRain => Box::new(Rain::data_rain(&settings.data_rain, seed)),
        EffectKind::BinaryMatrix => Box::new(Rain::binary_matrix(&settings.binary_matrix, seed)),
        EffectKind::DnaSpark => Box::new(DnaHelix::new(settings.dna_spark.clone(), seed)),
        EffectKind::DnaSpark3d => Box::new(DnaHelix3d::new(settings.dna_spark3d.clone(), seed)),
        EffectKind::Aurora => Box::new(Aurora::new(settings.aurora.clone())),
        EffectKind::Nebula => Box::new(Nebula::new(settings.nebula.clone())),
        EffectKind::Halo => Box::new(Halo::new(settings.halo.clone(), seed)),
        EffectKind::Smoke => Box::new(Smoke::new(settings.smoke.clone(), seed)),
        EffectKind::Orbit => Box::new(Orbit::new(settings.orbit.clone(), seed)),
        EffectKind::TextParticles => {
            Box::new(TextParticles::new(settings.text_particles.clone(), seed))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::{DrawList, InputEvent, Vec2};

    #[test]
    fn test_factory_builds_every_kind() {
        let settings = EffectSettings::default();
        for kind in EffectKind::ALL {
            let mut effect = create_effect(kind, &settings, 42);
            assert_eq!(effect.kind(), kind);
            assert_eq!(effect.name(), kind.name());
            effect.resize(640.0, 480.0);
            effect.handle_event(&InputEvent::Move(Vec2::new(320.0, 240.0)));
            effect.handle_event(&InputEvent::Click(Vec2::new(320.0, 240.0)));
            for _ in 0..3 {
                effect.step();
            }
            let mut list = DrawList::new(640.0, 480.0);
            effect.render(&mut list);
            assert!(!list.is_empty(), "{kind} painted nothing");
        }
    }

    #[test]
    fn test_every_kind_survives_zero_area() {
        let settings = EffectSettings::default();
        for kind in EffectKind::ALL {
            let mut effect = create_effect(kind, &settings, 1);
            effect.resize(0.0, 0.0);
            effect.handle_event(&InputEvent::Click(Vec2::ZERO));
            effect.step();
            let mut list = DrawList::new(0.0, 0.0);
            effect.render(&mut list);
        }
    }
}
