//! Pointer proximity forces.

use crate::geom::Vec2;

/// Linear falloff force from a pointer acting on one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Force {
    /// `(R - d) / R`, in `0.0..=1.0`.
    pub magnitude: f32,
    /// Unit vector pointing from the pointer to the entity.
    pub direction: Vec2,
    pub distance: f32,
}

impl Force {
    /// Angle of [`Force::direction`] in radians.
    pub fn angle(&self) -> f32 {
        self.direction.angle()
    }

    /// Push away from the pointer, scaled by `factor`.
    pub fn repel(&self, factor: f32) -> Vec2 {
        self.direction * (self.magnitude * factor)
    }

    /// Pull toward the pointer, scaled by `factor`.
    pub fn attract(&self, factor: f32) -> Vec2 {
        -self.repel(factor)
    }
}

/// Force on an entity at `entity` from a pointer at `pointer`, or `None`
/// when the entity is at least `radius` away.
///
/// An entity exactly on the pointer gets full magnitude pointing along +x.
pub fn radial_force(entity: Vec2, pointer: Vec2, radius: f32) -> Option<Force> {
    if radius <= 0.0 {
        return None;
    }
    let offset = entity - pointer;
    let distance = offset.length();
    if distance >= radius {
        return None;
    }
    let direction = if distance > f32::EPSILON {
        offset * (1.0 / distance)
    } else {
        Vec2::new(1.0, 0.0)
    };
    Some(Force {
        magnitude: (radius - distance) / radius,
        direction,
        distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_force_magnitude_at_sixty_of_one_fifty() {
        let force = radial_force(Vec2::new(60.0, 0.0), Vec2::ZERO, 150.0).unwrap();
        assert!((force.magnitude - 0.6).abs() < 1e-6);
        let push = force.repel(2.0);
        assert!((push.x - 1.2).abs() < 1e-6);
        assert!(push.y.abs() < 1e-6);
        assert!(force.angle().abs() < 1e-6);
    }

    #[test]
    fn test_force_direction_follows_angle() {
        let force = radial_force(Vec2::new(0.0, 30.0), Vec2::new(0.0, 90.0), 150.0).unwrap();
        assert!((force.angle() + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        let pull = force.attract(1.0);
        assert!(pull.y > 0.0);
    }

    #[test]
    fn test_zero_distance_is_full_force_along_x() {
        let force = radial_force(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), 100.0).unwrap();
        assert_eq!(force.magnitude, 1.0);
        assert_eq!(force.direction, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_out_of_range_has_no_force() {
        assert!(radial_force(Vec2::new(150.0, 0.0), Vec2::ZERO, 150.0).is_none());
        assert!(radial_force(Vec2::ZERO, Vec2::ZERO, 0.0).is_none());
    }

    proptest! {
        #[test]
        fn force_is_finite_and_bounded(
            ex in -500.0f32..500.0, ey in -500.0f32..500.0,
            px in -500.0f32..500.0, py in -500.0f32..500.0,
            radius in 1.0f32..300.0,
        ) {
            if let Some(force) = radial_force(Vec2::new(ex, ey), Vec2::new(px, py), radius) {
                prop_assert!((0.0..=1.0).contains(&force.magnitude));
                prop_assert!(force.direction.x.is_finite() && force.direction.y.is_finite());
                prop_assert!((force.direction.length() - 1.0).abs() < 1e-3);
            }
        }
    }
}
