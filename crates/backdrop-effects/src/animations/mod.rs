//! The individual background effects.

pub mod aurora;
pub mod constellation;
pub mod dna;
pub mod dna3d;
pub mod halo;
pub mod nebula;
pub mod orbit;
pub mod particles;
pub mod quantum_web;
pub mod rain;
pub mod smoke;
pub mod text;
