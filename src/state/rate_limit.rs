use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Action classes guarded by the rate limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionClass {
    /// Creating a new game.
    Create,
    /// Joining an existing game.
    Join,
    /// Submitting a GIF to a round.
    Submit,
}

/// Minimum spacing between invocations, per action class.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitWindows {
    /// Spacing between game creations.
    pub create: Duration,
    /// Spacing between joins.
    pub join: Duration,
    /// Spacing between submissions.
    pub submit: Duration,
}

impl Default for RateLimitWindows {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(5),
            join: Duration::from_secs(2),
            submit: Duration::from_secs(2),
        }
    }
}

impl RateLimitWindows {
    /// Disabled limiter configuration, used by tests.
    pub fn disabled() -> Self {
        Self {
            create: Duration::ZERO,
            join: Duration::ZERO,
            submit: Duration::ZERO,
        }
    }

    fn window(&self, class: ActionClass) -> Duration {
        match class {
            ActionClass::Create => self.create,
            ActionClass::Join => self.join,
            ActionClass::Submit => self.submit,
        }
    }
}

/// Coarse best-effort guard spacing out invocations of an action class.
///
/// Deliberately process-wide and advisory: it is keyed by action class, not
/// by caller identity or game, and each server instance enforces it locally.
/// It exists to blunt accidental rapid-fire (double-clicks, reconnect
/// storms), not to be a precise quota.
#[derive(Debug)]
pub struct RateLimiter {
    stamps: DashMap<ActionClass, Instant>,
    windows: RateLimitWindows,
}

impl RateLimiter {
    /// Build a limiter with the given per-class windows.
    pub fn new(windows: RateLimitWindows) -> Self {
        Self {
            stamps: DashMap::new(),
            windows,
        }
    }

    /// Allow the action and stamp the current time, or report how long the
    /// caller has to wait.
    pub fn check_and_stamp(&self, class: ActionClass) -> Result<(), Duration> {
        let window = self.windows.window(class);
        let now = Instant::now();

        match self.stamps.entry(class) {
            Entry::Occupied(mut slot) => {
                let elapsed = now.duration_since(*slot.get());
                if elapsed < window {
                    return Err(window - elapsed);
                }
                slot.insert(now);
            }
            Entry::Vacant(slot) => {
                slot.insert(now);
            }
        }

        Ok(())
    }
}
