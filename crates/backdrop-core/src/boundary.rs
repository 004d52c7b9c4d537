//! Edge policies applied after position integration.

use crate::geom::Vec2;

/// What happens to an entity that leaves the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Boundary {
    /// Reappear on the opposite edge once more than `margin` outside.
    Wrap { margin: f32 },
    /// Invert the violated velocity component (scaled by `restitution`)
    /// and clamp the position onto the edge.
    Bounce { restitution: f32 },
    /// Report entities that fell past the bottom edge by more than `margin`
    /// so the caller can reset them onto its spawn line.
    Respawn { margin: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryOutcome {
    Inside,
    Wrapped,
    Bounced,
    Respawn,
}

impl Boundary {
    pub fn apply(self, pos: &mut Vec2, vel: &mut Vec2, width: f32, height: f32) -> BoundaryOutcome {
        match self {
            Boundary::Wrap { margin } => {
                let mut wrapped = false;
                if pos.x < -margin {
                    pos.x = width + margin;
                    wrapped = true;
                } else if pos.x > width + margin {
                    pos.x = -margin;
                    wrapped = true;
                }
                if pos.y < -margin {
                    pos.y = height + margin;
                    wrapped = true;
                } else if pos.y > height + margin {
                    pos.y = -margin;
                    wrapped = true;
                }
                if wrapped {
                    BoundaryOutcome::Wrapped
                } else {
                    BoundaryOutcome::Inside
                }
            }
            Boundary::Bounce { restitution } => {
                let mut bounced = false;
                if pos.x < 0.0 || pos.x > width {
                    vel.x *= -restitution;
                    pos.x = pos.x.clamp(0.0, width.max(0.0));
                    bounced = true;
                }
                if pos.y < 0.0 || pos.y > height {
                    vel.y *= -restitution;
                    pos.y = pos.y.clamp(0.0, height.max(0.0));
                    bounced = true;
                }
                if bounced {
                    BoundaryOutcome::Bounced
                } else {
                    BoundaryOutcome::Inside
                }
            }
            Boundary::Respawn { margin } => {
                if pos.y > height + margin {
                    BoundaryOutcome::Respawn
                } else {
                    BoundaryOutcome::Inside
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_moves_to_opposite_edge() {
        let mut pos = Vec2::new(-1.0, 50.0);
        let mut vel = Vec2::new(-2.0, 0.0);
        let outcome = Boundary::Wrap { margin: 0.0 }.apply(&mut pos, &mut vel, 100.0, 100.0);
        assert_eq!(outcome, BoundaryOutcome::Wrapped);
        assert_eq!(pos, Vec2::new(100.0, 50.0));
        assert_eq!(vel, Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn test_bounce_inverts_and_clamps() {
        let mut pos = Vec2::new(105.0, 50.0);
        let mut vel = Vec2::new(2.0, 1.0);
        let outcome = Boundary::Bounce { restitution: 0.3 }.apply(&mut pos, &mut vel, 100.0, 100.0);
        assert_eq!(outcome, BoundaryOutcome::Bounced);
        assert_eq!(pos.x, 100.0);
        assert!((vel.x + 0.6).abs() < 1e-6);
        assert_eq!(vel.y, 1.0);
    }

    #[test]
    fn test_respawn_only_below_bottom() {
        let mut vel = Vec2::ZERO;
        let policy = Boundary::Respawn { margin: 18.0 };
        let mut pos = Vec2::new(0.0, 110.0);
        assert_eq!(policy.apply(&mut pos, &mut vel, 100.0, 100.0), BoundaryOutcome::Inside);
        let mut pos = Vec2::new(0.0, 119.0);
        assert_eq!(policy.apply(&mut pos, &mut vel, 100.0, 100.0), BoundaryOutcome::Respawn);
    }

    proptest! {
        #[test]
        fn bounce_keeps_position_inside(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            w in 1.0f32..400.0, h in 1.0f32..400.0,
        ) {
            let mut pos = Vec2::new(x, y);
            let mut vel = Vec2::new(1.0, 1.0);
            Boundary::Bounce { restitution: 1.0 }.apply(&mut pos, &mut vel, w, h);
            prop_assert!((0.0..=w).contains(&pos.x));
            prop_assert!((0.0..=h).contains(&pos.y));
        }

        #[test]
        fn wrap_remaps_instead_of_clamping(
            x in -50.0f32..-0.01, y in 0.0f32..100.0, margin in 0.0f32..5.0,
        ) {
            let mut pos = Vec2::new(x - margin, y);
            let mut vel = Vec2::new(-1.0, 0.0);
            Boundary::Wrap { margin }.apply(&mut pos, &mut vel, 100.0, 100.0);
            prop_assert_eq!(pos.x, 100.0 + margin);
            prop_assert_eq!(pos.y, y);
        }
    }
}
