//! Bounded position history with per-point fading.

use std::collections::VecDeque;

use crate::geom::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub position: Vec2,
    pub opacity: f32,
}

/// FIFO of recent positions that never grows past `max_len`.
#[derive(Debug, Clone, Default)]
pub struct Trail {
    points: VecDeque<TrailPoint>,
    max_len: usize,
}

impl Trail {
    pub fn new(max_len: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(max_len),
            max_len,
        }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Change the bound, evicting the oldest points if needed.
    pub fn set_max_len(&mut self, max_len: usize) {
        self.max_len = max_len;
        self.trim();
    }

    /// Append a fully opaque point, evicting the oldest beyond the bound.
    pub fn push(&mut self, position: Vec2) {
        self.points.push_back(TrailPoint {
            position,
            opacity: 1.0,
        });
        self.trim();
    }

    /// Multiply every stored point's opacity by `factor`.
    pub fn fade(&mut self, factor: f32) {
        for point in &mut self.points {
            point.opacity *= factor;
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    pub fn positions(&self) -> Vec<Vec2> {
        self.points.iter().map(|p| p.position).collect()
    }

    pub fn oldest(&self) -> Option<&TrailPoint> {
        self.points.front()
    }

    fn trim(&mut self) {
        while self.points.len() > self.max_len {
            self.points.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_evicts_oldest() {
        let mut trail = Trail::new(3);
        for i in 0..5 {
            trail.push(Vec2::new(i as f32, 0.0));
        }
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.oldest().map(|p| p.position.x), Some(2.0));
    }

    #[test]
    fn test_fade_is_multiplicative() {
        let mut trail = Trail::new(4);
        trail.push(Vec2::ZERO);
        trail.fade(0.9);
        trail.push(Vec2::ZERO);
        trail.fade(0.9);
        let opacities: Vec<f32> = trail.iter().map(|p| p.opacity).collect();
        assert!((opacities[0] - 0.81).abs() < 1e-6);
        assert!((opacities[1] - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_shrinking_bound_trims() {
        let mut trail = Trail::new(15);
        for i in 0..15 {
            trail.push(Vec2::new(i as f32, 0.0));
        }
        trail.set_max_len(8);
        assert_eq!(trail.len(), 8);
        assert_eq!(trail.oldest().map(|p| p.position.x), Some(7.0));
    }

    proptest! {
        #[test]
        fn trail_never_exceeds_bound(max_len in 0usize..32, pushes in 0usize..100) {
            let mut trail = Trail::new(max_len);
            for i in 0..pushes {
                trail.push(Vec2::new(i as f32, 0.0));
                prop_assert!(trail.len() <= max_len);
            }
            prop_assert_eq!(trail.len(), pushes.min(max_len));
            if let Some(oldest) = trail.oldest() {
                prop_assert_eq!(oldest.position.x, (pushes - pushes.min(max_len)) as f32);
            }
        }
    }
}
