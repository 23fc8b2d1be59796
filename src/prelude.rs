//! Convenient imports for the cube.
//!
//! ```
//! use concurrent_cube::prelude::*;
//!
//! let cube = Cube::builder().size(2).build().unwrap();
//! cube.rotate(Side::Right, 0).unwrap();
//! ```

// Main entry point
pub use crate::cube::{Cube, CubeBuilder, CubeMetrics};

// Error handling
pub use crate::error::{Error, Result};

// Hooks
pub use crate::hooks::{CubeHooks, NoopHooks};

// Core types
pub use cube_concurrency::CancellationToken;
pub use cube_core::{CubeSnapshot, Group, Side};
