//! Per-layer exclusive locks
//!
//! Group admission lets several rotations of the same axis run at once.
//! Rotations of the same axis on different slices touch disjoint facelets;
//! two on the same slice would race. One mutex per physical slice (indexed
//! by [`Side::canonical_layer`](cube_core::Side::canonical_layer)) serializes
//! the latter, whether the slice is named from a face or from its opposite.

use crate::cancel::CancellationToken;
use cube_core::{Error, Result};
use parking_lot::{Mutex, MutexGuard};
use std::time::Duration;

/// Fixed table of binary locks, one per layer index.
#[derive(Debug)]
pub struct LayerLockTable {
    locks: Box<[Mutex<()>]>,
}

/// Exclusive hold on one layer, released on drop.
#[must_use = "the layer is released as soon as the guard is dropped"]
pub struct LayerGuard<'a> {
    index: usize,
    _guard: MutexGuard<'a, ()>,
}

impl LayerGuard<'_> {
    /// Layer index held by this guard.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl LayerLockTable {
    /// Create `layers` unlocked layer locks.
    pub fn new(layers: usize) -> Self {
        Self {
            locks: (0..layers).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether the table has no layers.
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Block until layer `index` is held exclusively.
    ///
    /// Re-checks `token` every `poll`; returns [`Error::Cancelled`] without
    /// holding the lock once it fires.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn acquire(
        &self,
        index: usize,
        token: &CancellationToken,
        poll: Duration,
    ) -> Result<LayerGuard<'_>> {
        let lock = &self.locks[index];
        loop {
            if let Some(guard) = lock.try_lock_for(poll) {
                return Ok(LayerGuard {
                    index,
                    _guard: guard,
                });
            }
            if token.is_cancelled() {
                tracing::debug!(layer = index, "layer wait cancelled");
                return Err(Error::Cancelled);
            }
        }
    }

    /// Take layer `index` only if it is free right now.
    pub fn try_acquire(&self, index: usize) -> Option<LayerGuard<'_>> {
        self.locks[index].try_lock().map(|guard| LayerGuard {
            index,
            _guard: guard,
        })
    }
}
