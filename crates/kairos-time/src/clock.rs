//! Wall-clock anchor for real-time mode

use std::time::{Duration, Instant};

/// Monotonic wall clock anchored at simulation start.
/// INVARIANT: elapsed time never decreases between calls
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
    /// Reference to monotonic OS clock
    reference: Instant,
}

impl WallClock {
    /// Anchor a new wall clock at the current instant
    pub fn new() -> Self {
        WallClock {
            reference: Instant::now(),
        }
    }

    /// Time elapsed since the anchor
    pub fn elapsed(&self) -> Duration {
        Instant::now().saturating_duration_since(self.reference)
    }

    /// Time elapsed since the anchor, in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_clock_monotonic() {
        let clock = WallClock::new();

        let t1 = clock.elapsed();
        std::thread::sleep(Duration::from_millis(10));
        let t2 = clock.elapsed();

        assert!(t2 > t1);
        assert!(t2 >= Duration::from_millis(10));
    }

    #[test]
    fn test_new_anchor_starts_near_zero() {
        let old = WallClock::new();
        std::thread::sleep(Duration::from_millis(20));
        let fresh = WallClock::new();
        assert!(fresh.elapsed() < old.elapsed());
        assert!(fresh.elapsed_secs() < 0.02);
    }
}
