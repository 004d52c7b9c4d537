//! Uniform sampling helpers that tolerate degenerate configured ranges.

use std::f32::consts::TAU;

use rand::Rng;

/// Uniform in `min..max`, or `min` when the range is empty.
pub(crate) fn between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Uniform in `-half..half`.
pub(crate) fn spread<R: Rng + ?Sized>(rng: &mut R, half: f32) -> f32 {
    between(rng, -half.abs(), half.abs())
}

/// Uniform angle in `0..2π`.
pub(crate) fn angle<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    between(rng, 0.0, TAU)
}

/// True with probability `p` (clamped to `0..=1`).
pub(crate) fn chance<R: Rng + ?Sized>(rng: &mut R, p: f32) -> bool {
    rng.r#gen::<f32>() < p.clamp(0.0, 1.0)
}

/// Pick one element, or `None` for an empty slice.
pub(crate) fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(rng.gen_range(0..items.len()))
    }
}

/// Entity count for a surface: `area / area_per_entity`, capped at `max`.
pub(crate) fn population(width: f32, height: f32, area_per_entity: f32, max: usize) -> usize {
    if area_per_entity <= 0.0 {
        return 0;
    }
    (((width * height) / area_per_entity).floor().max(0.0) as usize).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_between_handles_empty_range() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(between(&mut rng, 3.0, 3.0), 3.0);
        assert_eq!(between(&mut rng, 5.0, 1.0), 5.0);
        let v = between(&mut rng, 1.0, 2.0);
        assert!((1.0..2.0).contains(&v));
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = StdRng::seed_from_u64(2);
        assert!(!chance(&mut rng, 0.0));
        assert!(chance(&mut rng, 1.0));
    }

    #[test]
    fn test_population() {
        assert_eq!(population(800.0, 600.0, 8000.0, 10_000), 60);
        assert_eq!(population(800.0, 600.0, 8000.0, 10), 10);
        assert_eq!(population(800.0, 600.0, 0.0, 10), 0);
        assert_eq!(population(0.0, 600.0, 8000.0, 10), 0);
    }

    #[test]
    fn test_pick_empty() {
        let mut rng = StdRng::seed_from_u64(3);
        let empty: [char; 0] = [];
        assert!(pick(&mut rng, &empty).is_none());
        assert_eq!(pick(&mut rng, &['x']), Some(&'x'));
    }
}
