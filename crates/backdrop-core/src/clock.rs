//! Simulation time measured in ticks.
//!
//! Effects never read the wall clock. Each tick advances time by a fixed
//! step, so a seeded run replays identically regardless of frame pacing.

use std::time::Duration;

/// Nominal display refresh the tuned constants assume.
pub const TICKS_PER_SECOND: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    ticks: u64,
    step: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_step(Duration::from_secs(1) / TICKS_PER_SECOND)
    }

    pub fn with_step(step: Duration) -> Self {
        Self { ticks: 0, step }
    }

    pub fn tick(&mut self) {
        self.ticks += 1;
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn step_ms(&self) -> f32 {
        self.step.as_secs_f32() * 1000.0
    }

    pub fn elapsed(&self) -> Duration {
        self.step * u32::try_from(self.ticks).unwrap_or(u32::MAX)
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.step.as_secs_f32() * self.ticks as f32
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed_secs() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sixty_ticks_is_one_second() {
        let mut clock = FrameClock::new();
        for _ in 0..60 {
            clock.tick();
        }
        assert!((clock.elapsed_secs() - 1.0).abs() < 1e-3);
        assert_eq!(clock.ticks(), 60);
        clock.reset();
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_custom_step() {
        let mut clock = FrameClock::with_step(Duration::from_millis(16));
        clock.tick();
        clock.tick();
        assert_eq!(clock.elapsed(), Duration::from_millis(32));
        assert!((clock.step_ms() - 16.0).abs() < 1e-4);
    }
}
