//! Distance-linked entity pairs, recomputed every tick.

use crate::geom::Vec2;

/// Largest population the all-pairs scan will look at.
///
/// The scan is O(n^2); densities are configured so real populations stay in
/// the tens to low hundreds. Entities past this index are not linked.
pub const MAX_CONNECTION_ENTITIES: usize = 400;

/// Two entities closer than the scan distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
    pub opacity: f32,
}

/// Connection opacity for a pair `distance` apart.
///
/// `base * (1 - distance / max_distance)`, or `None` when out of range.
pub fn connection_opacity(distance: f32, max_distance: f32, base_opacity: f32) -> Option<f32> {
    if max_distance <= 0.0 || distance >= max_distance {
        return None;
    }
    Some(base_opacity * (1.0 - distance / max_distance))
}

/// All-pairs proximity scan with a hard population bound.
#[derive(Debug, Clone)]
pub struct ConnectionScan {
    max_distance: f32,
    base_opacity: f32,
    limit: usize,
    warned: bool,
}

impl ConnectionScan {
    pub fn new(max_distance: f32, base_opacity: f32) -> Self {
        Self {
            max_distance,
            base_opacity,
            limit: MAX_CONNECTION_ENTITIES,
            warned: false,
        }
    }

    /// Lower the population bound (never above [`MAX_CONNECTION_ENTITIES`]).
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(MAX_CONNECTION_ENTITIES);
        self
    }

    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Replace `out` with every linked pair among `points`.
    pub fn scan_into(&mut self, points: &[Vec2], out: &mut Vec<Connection>) {
        out.clear();
        if points.len() > self.limit && !self.warned {
            tracing::warn!(
                population = points.len(),
                limit = self.limit,
                "population exceeds connection scan bound, extra entities are not linked"
            );
            self.warned = true;
        }
        let points = &points[..points.len().min(self.limit)];

        for (i, &p1) in points.iter().enumerate() {
            for (j, &p2) in points.iter().enumerate().skip(i + 1) {
                let distance = p1.distance(p2);
                if let Some(opacity) =
                    connection_opacity(distance, self.max_distance, self.base_opacity)
                {
                    out.push(Connection {
                        a: i,
                        b: j,
                        distance,
                        opacity,
                    });
                }
            }
        }
    }

    pub fn scan(&mut self, points: &[Vec2]) -> Vec<Connection> {
        let mut out = Vec::new();
        self.scan_into(points, &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_half_distance_gives_half_opacity() {
        let mut scan = ConnectionScan::new(100.0, 0.3);
        let links = scan.scan(&[Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0)]);
        assert_eq!(links.len(), 1);
        assert_eq!((links[0].a, links[0].b), (0, 1));
        assert!((links[0].opacity - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_no_link_at_threshold() {
        let mut scan = ConnectionScan::new(100.0, 1.0);
        assert!(scan.scan(&[Vec2::ZERO, Vec2::new(100.0, 0.0)]).is_empty());
    }

    #[test]
    fn test_scan_respects_limit() {
        let points = vec![Vec2::ZERO; 10];
        let mut scan = ConnectionScan::new(10.0, 1.0).with_limit(4);
        assert_eq!(scan.scan(&points).len(), 6);
        assert_eq!(
            ConnectionScan::new(10.0, 1.0).with_limit(10_000).limit,
            MAX_CONNECTION_ENTITIES
        );
    }

    proptest! {
        #[test]
        fn opacity_matches_formula(d in 0.0f32..300.0, max in 1.0f32..200.0, base in 0.0f32..1.0) {
            match connection_opacity(d, max, base) {
                Some(opacity) => {
                    prop_assert!(d < max);
                    prop_assert!((opacity - base * (1.0 - d / max)).abs() < 1e-5);
                }
                None => prop_assert!(d >= max),
            }
        }
    }
}
