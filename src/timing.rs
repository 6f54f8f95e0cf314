//! Per-frame timing context
//!
//! The gravity timer is owned by the driver and handed to [`Game::update`]
//! each frame, so the core keeps no hidden clocks.
//!
//! [`Game::update`]: crate::game::Game::update

use std::time::{Duration, Instant};

/// Seconds per row at `level`, following the guideline curve.
/// Level 1 is one second per row.
pub fn gravity_interval(level: u32) -> Duration {
    let x = level.max(1) as f64 - 1.0;
    Duration::from_secs_f64((0.8 - x * 0.007).powf(x))
}

/// Gravity timer carried across frames
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last_gravity: Instant,
}

impl FrameClock {
    pub fn new(now: Instant) -> Self {
        Self { last_gravity: now }
    }

    /// Whether a gravity step is due at `now`. Restarts the interval when it is.
    pub fn gravity_due(&mut self, level: u32, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_gravity) >= gravity_interval(level) {
            self.last_gravity = now;
            true
        } else {
            false
        }
    }

    /// Start the interval over, e.g. after a reset
    pub fn restart(&mut self, now: Instant) {
        self.last_gravity = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one_is_one_second() {
        assert_eq!(gravity_interval(1), Duration::from_secs(1));
    }

    #[test]
    fn test_gravity_speeds_up() {
        let mut previous = gravity_interval(1);
        for level in 2..=15 {
            let interval = gravity_interval(level);
            assert!(interval < previous, "level {}", level);
            previous = interval;
        }
    }

    #[test]
    fn test_gravity_due() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        assert!(!clock.gravity_due(1, start + Duration::from_millis(999)));
        assert!(clock.gravity_due(1, start + Duration::from_millis(1000)));
        // Interval restarts from the tick that fired
        assert!(!clock.gravity_due(1, start + Duration::from_millis(1500)));
        assert!(clock.gravity_due(1, start + Duration::from_millis(2000)));
    }
}
