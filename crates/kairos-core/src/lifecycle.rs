//! Event lifecycle flags
//!
//! The flags are deliberately independent booleans: `paused` and
//! `cancelled` can be asserted at any point regardless of whether the
//! event has started or ended. Only a few combinations are impossible,
//! and [`Lifecycle::validate`] rejects those.

use thiserror::Error;

/// Invalid lifecycle combination
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("event ended without having started")]
    EndedBeforeStart,

    #[error("event acted without having started")]
    ActedBeforeStart,
}

/// Lifecycle latches of a single event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lifecycle {
    pub started: bool,
    /// Latched after the first successful act
    pub acted: bool,
    pub ended: bool,
    pub paused: bool,
    pub cancelled: bool,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch `started`. Returns true on the false -> true transition.
    pub fn start(&mut self) -> bool {
        !std::mem::replace(&mut self.started, true)
    }

    /// Latch `acted`. Returns true on the first successful act.
    pub fn mark_acted(&mut self) -> bool {
        debug_assert!(self.started, "act before start");
        !std::mem::replace(&mut self.acted, true)
    }

    /// Latch `ended`. An event forced to end before it started is
    /// considered to have started at the same instant.
    pub fn end(&mut self) -> bool {
        self.started = true;
        !std::mem::replace(&mut self.ended, true)
    }

    /// Latch `cancelled`. Returns true on the false -> true transition.
    pub fn cancel(&mut self) -> bool {
        !std::mem::replace(&mut self.cancelled, true)
    }

    /// Returns true if the event was not already paused
    pub fn pause(&mut self) -> bool {
        !std::mem::replace(&mut self.paused, true)
    }

    /// Returns true if the event was paused
    pub fn resume(&mut self) -> bool {
        std::mem::replace(&mut self.paused, false)
    }

    /// Ended or cancelled; a terminal event never acts again
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.ended || self.cancelled
    }

    /// Whether the act check may run at all this slot
    #[inline]
    pub fn can_act(&self) -> bool {
        self.started && !self.ended && !self.cancelled && !self.paused
    }

    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.ended && !self.started {
            return Err(LifecycleError::EndedBeforeStart);
        }
        if self.acted && !self.started {
            return Err(LifecycleError::ActedBeforeStart);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latches_fire_once() {
        let mut lc = Lifecycle::new();
        assert!(lc.start());
        assert!(!lc.start());
        assert!(lc.mark_acted());
        assert!(!lc.mark_acted());
        assert!(lc.end());
        assert!(!lc.end());
        assert!(lc.is_terminal());
        assert!(lc.validate().is_ok());
    }

    #[test]
    fn test_forced_end_implies_started() {
        let mut lc = Lifecycle::new();
        lc.end();
        assert!(lc.started);
        assert!(lc.validate().is_ok());
    }

    #[test]
    fn test_invalid_combinations() {
        let lc = Lifecycle {
            ended: true,
            ..Lifecycle::default()
        };
        assert_eq!(lc.validate(), Err(LifecycleError::EndedBeforeStart));

        let lc = Lifecycle {
            acted: true,
            ..Lifecycle::default()
        };
        assert_eq!(lc.validate(), Err(LifecycleError::ActedBeforeStart));
    }

    #[test]
    fn test_pause_is_orthogonal() {
        let mut lc = Lifecycle::new();
        assert!(lc.pause());
        lc.start();
        assert!(!lc.can_act());
        assert!(lc.resume());
        assert!(!lc.resume());
        assert!(lc.can_act());

        lc.cancel();
        assert!(!lc.can_act());
        assert!(lc.is_terminal());
        assert!(!lc.ended);
    }
}
