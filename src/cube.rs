//! Main entry point for the concurrent cube.
//!
//! This module provides the [`Cube`] struct, which composes the facelet
//! grid, the group coordinator and the layer lock table:
//!
//! ```text
//! rotate(side, layer):
//!   enter(side.group()) -> lock layer -> before hook -> turn -> after hook
//!   -> unlock layer -> exit
//!
//! show():
//!   enter(Show) -> before hook -> snapshot -> after hook -> exit
//! ```

use crate::error::Result;
use crate::hooks::{CallbackHooks, CubeHooks, NoopHooks};
use cube_concurrency::{
    CancellationToken, CoordinatorConfig, CoordinatorMetrics, CoordinatorStatus,
    GroupCoordinator, LayerLockTable, DEFAULT_GROUP_LIMIT_FACTOR, DEFAULT_POLL_INTERVAL,
};
use cube_core::{rotation, CubeSnapshot, CubeState, Group, Side};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Edge length used by [`CubeBuilder`] when none is set.
pub const DEFAULT_SIZE: usize = 3;

/// A cube shared by any number of threads.
///
/// Create one with [`Cube::new`] or [`Cube::builder`] and share it by
/// reference or through an `Arc`.
///
/// # Example
///
/// ```
/// use concurrent_cube::prelude::*;
///
/// let cube = Cube::builder().size(3).build()?;
/// cube.rotate(Side::Up, 0)?;
/// assert_eq!(
///     cube.show()?.to_string(),
///     "000000000222111111333222222444333333111444444555555555"
/// );
/// # Ok::<(), concurrent_cube::Error>(())
/// ```
pub struct Cube {
    state: CubeState,
    coordinator: GroupCoordinator,
    layers: LayerLockTable,
    hooks: Box<dyn CubeHooks>,
    poll_interval: Duration,
    rotations: AtomicU64,
    shows: AtomicU64,
    cancelled: AtomicU64,
}

impl Cube {
    /// Create a solved cube with the four notification callbacks.
    ///
    /// # Arguments
    ///
    /// * `size` - Edge length, must be positive
    /// * `before_rotation` / `after_rotation` - Called with `(side, layer)` around each turn
    /// * `before_show` / `after_show` - Called around each read of the state
    pub fn new<BR, AR, BS, AS>(
        size: usize,
        before_rotation: BR,
        after_rotation: AR,
        before_show: BS,
        after_show: AS,
    ) -> Result<Self>
    where
        BR: Fn(Side, usize) + Send + Sync + 'static,
        AR: Fn(Side, usize) + Send + Sync + 'static,
        BS: Fn() + Send + Sync + 'static,
        AS: Fn() + Send + Sync + 'static,
    {
        Self::builder()
            .size(size)
            .hooks(CallbackHooks::new(
                before_rotation,
                after_rotation,
                before_show,
                after_show,
            ))
            .build()
    }

    /// Create a builder for cube configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use concurrent_cube::Cube;
    /// use std::time::Duration;
    ///
    /// let cube = Cube::builder()
    ///     .size(5)
    ///     .group_limit_factor(4)
    ///     .poll_interval(Duration::from_millis(1))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(cube.coordinator_status().limit, 20);
    /// ```
    pub fn builder() -> CubeBuilder {
        CubeBuilder::new()
    }

    /// Edge length.
    pub fn size(&self) -> usize {
        self.state.size()
    }

    /// Turn `layer` (counted from `side`) a quarter turn.
    ///
    /// # Panics
    ///
    /// Panics if `layer >= size`.
    pub fn rotate(&self, side: Side, layer: usize) -> Result<()> {
        self.rotate_cancellable(side, layer, &CancellationToken::never())
    }

    /// [`rotate`](Self::rotate) that gives up when `token` fires while the
    /// caller is still waiting for admission or for its layer lock.
    ///
    /// A cancelled rotation leaves the cube untouched and runs no hooks.
    ///
    /// # Panics
    ///
    /// Panics if `layer >= size`.
    pub fn rotate_cancellable(
        &self,
        side: Side,
        layer: usize,
        token: &CancellationToken,
    ) -> Result<()> {
        let size = self.size();
        assert!(
            layer < size,
            "layer {} out of range for a cube of size {}",
            layer,
            size
        );
        let layer_index = side.canonical_layer(layer, size);

        let admission = self
            .coordinator
            .enter(side.group(), token)
            .map_err(|e| self.record_failure(e))?;
        // Dropping the admission on the error path exits the coordinator.
        let layer_guard = self
            .layers
            .acquire(layer_index, token, self.poll_interval)
            .map_err(|e| self.record_failure(e))?;

        self.hooks.before_rotation(side, layer);
        rotation::apply(&self.state, side, layer);
        self.hooks.after_rotation(side, layer);

        drop(layer_guard);
        admission.release();
        self.rotations.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Read the whole cube.
    ///
    /// Runs as the show group, so no rotation is in progress while reading.
    pub fn show(&self) -> Result<CubeSnapshot> {
        self.show_cancellable(&CancellationToken::never())
    }

    /// [`show`](Self::show) that gives up when `token` fires before admission.
    pub fn show_cancellable(&self, token: &CancellationToken) -> Result<CubeSnapshot> {
        let admission = self
            .coordinator
            .enter(Group::Show, token)
            .map_err(|e| self.record_failure(e))?;

        self.hooks.before_show();
        let snapshot = self.state.snapshot();
        self.hooks.after_show();

        admission.release();
        self.shows.fetch_add(1, Ordering::Relaxed);
        Ok(snapshot)
    }

    fn record_failure(&self, e: cube_core::Error) -> crate::Error {
        if e.is_cancelled() {
            self.cancelled.fetch_add(1, Ordering::Relaxed);
        }
        e.into()
    }

    /// Return the cube to the solved state.
    ///
    /// Not coordinated with concurrent operations; callers must make sure
    /// none are in flight.
    pub fn reset(&self) {
        self.state.reset();
    }

    /// Index of the same physical layer named from the opposite side.
    pub fn opposite_layer(&self, layer: usize) -> usize {
        self.size() - 1 - layer
    }

    /// Every facelet carries its own face's color.
    ///
    /// Reads without admission; meant for quiescent cubes.
    pub fn is_solved(&self) -> bool {
        self.state.is_solved()
    }

    /// Each color appears exactly `size²` times.
    ///
    /// Reads without admission; meant for quiescent cubes.
    pub fn has_correct_color_counts(&self) -> bool {
        self.state.has_correct_color_counts()
    }

    /// Uniformly random layer index for this cube.
    pub fn random_layer<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        cube_core::random_layer(rng, self.size())
    }

    /// Current coordinator counters.
    pub fn coordinator_status(&self) -> CoordinatorStatus {
        self.coordinator.status()
    }

    /// Operation counters.
    pub fn metrics(&self) -> CubeMetrics {
        CubeMetrics {
            rotations: self.rotations.load(Ordering::Relaxed),
            shows: self.shows.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            coordinator: self.coordinator.metrics(),
        }
    }
}

impl fmt::Debug for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cube")
            .field("size", &self.size())
            .field("coordinator", &self.coordinator.status())
            .finish_non_exhaustive()
    }
}

/// Cube metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CubeMetrics {
    /// Completed rotations
    pub rotations: u64,
    /// Completed shows
    pub shows: u64,
    /// Operations abandoned through a cancellation token
    pub cancelled: u64,
    /// Admission counters
    pub coordinator: CoordinatorMetrics,
}

/// Builder for cube configuration.
///
/// # Example
///
/// ```
/// use concurrent_cube::{Cube, NoopHooks};
///
/// let cube = Cube::builder().size(4).hooks(NoopHooks).build().unwrap();
/// assert!(cube.is_solved());
/// ```
pub struct CubeBuilder {
    config: CoordinatorConfig,
    hooks: Box<dyn CubeHooks>,
}

impl CubeBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: CoordinatorConfig {
                size: DEFAULT_SIZE,
                group_limit_factor: DEFAULT_GROUP_LIMIT_FACTOR,
                poll_interval: DEFAULT_POLL_INTERVAL,
            },
            hooks: Box::new(NoopHooks),
        }
    }

    /// Set the edge length.
    pub fn size(mut self, size: usize) -> Self {
        self.config.size = size;
        self
    }

    /// Set the admission limit multiplier (`limit = factor × size`).
    pub fn group_limit_factor(mut self, factor: usize) -> Self {
        self.config.group_limit_factor = factor;
        self
    }

    /// Set how often blocked callers re-check their cancellation token.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Install notification hooks.
    pub fn hooks(mut self, hooks: impl CubeHooks + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    /// Validate the configuration and create a solved cube.
    pub fn build(self) -> Result<Cube> {
        self.config.validate()?;
        tracing::info!(
            size = self.config.size,
            limit = self.config.group_limit(),
            "cube created"
        );
        Ok(Cube {
            state: CubeState::new(self.config.size),
            coordinator: GroupCoordinator::new(&self.config),
            layers: LayerLockTable::new(self.config.size),
            hooks: self.hooks,
            poll_interval: self.config.poll_interval,
            rotations: AtomicU64::new(0),
            shows: AtomicU64::new(0),
            cancelled: AtomicU64::new(0),
        })
    }
}

impl Default for CubeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
