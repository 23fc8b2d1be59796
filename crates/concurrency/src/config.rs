//! Coordinator configuration

use cube_core::{Error, Result};
use std::time::Duration;

/// Default admission limit multiplier: `limit = 10 × size`.
pub const DEFAULT_GROUP_LIMIT_FACTOR: usize = 10;

/// Default interval at which blocked callers re-check their cancellation token.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Parameters of a [`GroupCoordinator`](crate::GroupCoordinator) and its layer table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Cube edge length; also the number of layer locks
    pub size: usize,
    /// Admission limit per episode is `group_limit_factor × size`
    pub group_limit_factor: usize,
    /// Upper bound on how long a cancelled waiter keeps sleeping.
    ///
    /// Each blocked caller wakes once per interval to check its token, so
    /// shorter intervals cost more lock traffic while callers are queued.
    pub poll_interval: Duration,
}

impl CoordinatorConfig {
    /// Defaults for a cube of the given size.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            group_limit_factor: DEFAULT_GROUP_LIMIT_FACTOR,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// How many same-group callers may join an episode while another group waits.
    pub fn group_limit(&self) -> usize {
        self.group_limit_factor * self.size
    }

    /// Reject values that would make the protocol meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::InvalidConfig("size must be positive".into()));
        }
        if self.group_limit_factor == 0 {
            return Err(Error::InvalidConfig(
                "group limit factor must be positive".into(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::InvalidConfig("poll interval must be positive".into()));
        }
        Ok(())
    }
}
