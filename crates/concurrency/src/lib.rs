//! Concurrency layer for the cube
//!
//! This crate implements the two-level exclusion discipline:
//! - GroupCoordinator: group mutual exclusion with representatives, an
//!   admission limit against starvation and cancellable waits
//! - LayerLockTable: one exclusive lock per physical layer
//! - CancellationToken: cooperative cancellation of blocked callers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod config;
pub mod coordinator;
pub mod layers;

pub use cancel::CancellationToken;
pub use config::{CoordinatorConfig, DEFAULT_GROUP_LIMIT_FACTOR, DEFAULT_POLL_INTERVAL};
pub use coordinator::{Admission, CoordinatorMetrics, CoordinatorStatus, GroupCoordinator};
pub use layers::{LayerGuard, LayerLockTable};
