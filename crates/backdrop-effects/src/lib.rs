//! Pointer-reactive animated background effects.
//!
//! Each effect in [`animations`] owns its entity store, pointer state and
//! transient effects. [`Backdrop`] binds one effect to a surface and runs
//! the step + render loop; [`create_effect`] builds any effect from its
//! [`EffectSettings`] table.

pub mod animations;
mod chars;
mod random;
mod settings;
mod state;

pub use settings::{EffectSettings, create_effect};
pub use state::{Backdrop, TickOutcome};
