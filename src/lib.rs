//! # Concurrent Cube
//!
//! An N×N×N rotating cube shared by any number of threads.
//!
//! Two operations are offered: rotating a layer and reading the whole state.
//! They are coordinated by a two-level discipline:
//!
//! 1. **Group exclusion** - every operation belongs to a group (one per
//!    rotation axis, plus one for reads). Operations of the working group run
//!    in parallel; another group starts only after the working group drains.
//!    The first waiter of a group acts as its representative, and an
//!    admission limit keeps a busy group from starving the others.
//! 2. **Layer locks** - rotations of the same axis on the same physical layer
//!    are serialized by one lock per layer.
//!
//! Any blocked caller can be cancelled through a [`CancellationToken`].
//!
//! ## Quick Start
//!
//! ```
//! use concurrent_cube::prelude::*;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cube = Arc::new(Cube::builder().size(3).build()?);
//!
//! let handles: Vec<_> = Side::ALL
//!     .into_iter()
//!     .map(|side| {
//!         let cube = Arc::clone(&cube);
//!         thread::spawn(move || cube.rotate(side, 1))
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap()?;
//! }
//!
//! assert!(cube.show()?.has_correct_color_counts());
//! # Ok::<(), concurrent_cube::Error>(())
//! ```

#![warn(missing_docs)]

mod cube;
mod error;
mod hooks;

pub mod prelude;

// Re-export main entry points
pub use cube::{Cube, CubeBuilder, CubeMetrics, DEFAULT_SIZE};
pub use error::{Error, Result};
pub use hooks::{CallbackHooks, CubeHooks, NoopHooks};

// Re-export lower-level types
pub use cube_concurrency::{CancellationToken, CoordinatorMetrics, CoordinatorStatus};
pub use cube_core::{CubeSnapshot, Group, Side};
