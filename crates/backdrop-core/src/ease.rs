//! Easing curves for two-phase transitions. Inputs are clamped to `0..=1`.

/// `1 - (1 - t)^3`: fast start, gentle landing.
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// `t^2`: gentle start, fast finish.
pub fn ease_in_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for ease in [ease_out_cubic, ease_in_quad] {
            assert_eq!(ease(0.0), 0.0);
            assert_eq!(ease(1.0), 1.0);
            assert_eq!(ease(-2.0), 0.0);
            assert_eq!(ease(7.0), 1.0);
        }
    }

    #[test]
    fn test_midpoints() {
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
        assert!((ease_in_quad(0.5) - 0.25).abs() < 1e-6);
    }
}
