//! Core types shared by the backdrop effects and hosts.
//!
//! Geometry, colours, pointer input, the drawing surface abstraction and
//! the small simulation building blocks (trails, ripples, connections,
//! boundary policies, pointer forces) that the effects are assembled from.

pub mod boundary;
pub mod clock;
pub mod color;
pub mod connection;
pub mod ease;
pub mod effect;
pub mod force;
pub mod geom;
pub mod input;
pub mod ripple;
pub mod scene;
pub mod surface;
pub mod trail;

pub use boundary::{Boundary, BoundaryOutcome};
pub use clock::FrameClock;
pub use color::{ColorParseError, Rgba, hsl_to_rgb};
pub use connection::{Connection, ConnectionScan, MAX_CONNECTION_ENTITIES, connection_opacity};
pub use ease::{ease_in_quad, ease_out_cubic};
pub use effect::{Effect, EffectKind, UnknownEffect};
pub use force::{Force, radial_force};
pub use geom::Vec2;
pub use glam::Vec3;
pub use input::{InputEvent, IntensitySource, InteractionMode, Key, Pointer};
pub use ripple::{Ripple, RippleDecay, RippleField};
pub use scene::{Camera, Hit, Projected, Ray, SceneIndex, surface_to_ndc};
pub use surface::{DrawCommand, DrawList, Surface};
pub use trail::{Trail, TrailPoint};
