//! Time primitives for Kairos
//!
//! Simulated time is a count of seconds held as `f64`. Every value the
//! clock or an event stores has been rounded through a [`TimeResolution`]
//! so that repeated additions of a fractional step never drift past a
//! comparison boundary.

use std::ops::{Add, Sub};

/// Decimal places kept by default (microsecond granularity)
pub const DEFAULT_RESOLUTION: u32 = 6;

/// Largest supported resolution; beyond this `f64` cannot hold the digits
pub const MAX_RESOLUTION: u32 = 12;

/// Simulated time in seconds
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct SimTime(pub f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);
    pub const INFINITY: SimTime = SimTime(f64::INFINITY);

    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        SimTime(secs)
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Round to `resolution` decimal places
    #[inline]
    pub fn rounded(self, resolution: TimeResolution) -> Self {
        SimTime(resolution.round(self.0))
    }

    /// The later of two instants
    #[inline]
    pub fn max(self, other: SimTime) -> Self {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }
}

impl Add<f64> for SimTime {
    type Output = SimTime;

    #[inline]
    fn add(self, rhs: f64) -> Self::Output {
        SimTime(self.0 + rhs)
    }
}

impl Sub<f64> for SimTime {
    type Output = SimTime;

    #[inline]
    fn sub(self, rhs: f64) -> Self::Output {
        SimTime(self.0 - rhs)
    }
}

/// Signed difference in seconds
impl Sub<SimTime> for SimTime {
    type Output = f64;

    #[inline]
    fn sub(self, rhs: SimTime) -> Self::Output {
        self.0 - rhs.0
    }
}

impl From<f64> for SimTime {
    fn from(secs: f64) -> Self {
        SimTime(secs)
    }
}

impl std::fmt::Debug for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t({}s)", self.0)
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of decimal places applied to every time value before comparison
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeResolution(u32);

impl TimeResolution {
    /// Create a resolution; `None` if it exceeds [`MAX_RESOLUTION`]
    pub fn new(places: u32) -> Option<Self> {
        (places <= MAX_RESOLUTION).then_some(TimeResolution(places))
    }

    #[inline]
    pub fn places(self) -> u32 {
        self.0
    }

    /// Round `value` to this many decimal places. Non-finite values pass through.
    #[inline]
    pub fn round(self, value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let scale = 10f64.powi(self.0 as i32);
        (value * scale).round() / scale
    }
}

impl Default for TimeResolution {
    fn default() -> Self {
        TimeResolution(DEFAULT_RESOLUTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_removes_drift() {
        let res = TimeResolution::new(3).unwrap();
        let mut t = 0.0;
        for _ in 0..10 {
            t = res.round(t + 0.1);
        }
        assert_eq!(t, 1.0);
    }

    #[test]
    fn test_round_passes_infinity() {
        let res = TimeResolution::default();
        assert_eq!(res.round(f64::INFINITY), f64::INFINITY);
        assert!(res.round(f64::NAN).is_nan());
    }

    #[test]
    fn test_resolution_bounds() {
        assert!(TimeResolution::new(MAX_RESOLUTION).is_some());
        assert!(TimeResolution::new(MAX_RESOLUTION + 1).is_none());
    }

    #[test]
    fn test_sim_time_ops() {
        let a = SimTime::from_secs_f64(1.5);
        let b = a + 0.25;
        assert_eq!(b.as_secs_f64(), 1.75);
        assert_eq!(b - a, 0.25);
        assert_eq!(a.max(b), b);
        assert_eq!(b.max(a), b);
        assert!(SimTime::ZERO < SimTime::INFINITY);
    }

    proptest! {
        #[test]
        fn round_is_idempotent(v in -1.0e6f64..1.0e6, places in 0u32..=9) {
            let res = TimeResolution::new(places).unwrap();
            let once = res.round(v);
            prop_assert_eq!(res.round(once), once);
        }
    }
}
