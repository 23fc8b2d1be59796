//! Core data model for the concurrent cube
//!
//! This crate defines the pieces that carry no synchronization of their own:
//! - [`Side`] and [`Group`]: face addressing and operation classes
//! - [`CubeState`]: the shared facelet grid
//! - [`CubeSnapshot`]: an owned copy of the grid in canonical order
//! - [`rotation`]: the quarter-turn transform
//! - [`Error`]: errors shared by every layer above

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod rotation;
pub mod side;
pub mod state;

pub use error::{Error, Result};
pub use side::{random_layer, Group, ParseSideError, Side};
pub use state::{CubeSnapshot, CubeState};
