//! Faces of the cube and the operation groups derived from them
//!
//! This module defines the fundamental addressing types:
//! - [`Side`]: one of the six faces, with its opposite and its neighbour chain
//! - [`Group`]: the four operation classes that mutually exclude at the coarse level
//!
//! Layers are counted from a canonical face per axis: from UP for the
//! UP/DOWN axis, from LEFT for LEFT/RIGHT and from FRONT for FRONT/BACK.
//! Layer `L` named from a side is the same physical slice as layer
//! `size - 1 - L` named from its opposite.

use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A face of the cube.
///
/// The discriminant doubles as the face's solved color id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Top face
    Up = 0,
    /// Left face
    Left = 1,
    /// Front face
    Front = 2,
    /// Right face
    Right = 3,
    /// Back face
    Back = 4,
    /// Bottom face
    Down = 5,
}

impl Side {
    /// Number of faces.
    pub const COUNT: usize = 6;

    /// All faces in canonical order (also the serialization order of a cube).
    pub const ALL: [Side; 6] = [
        Side::Up,
        Side::Left,
        Side::Front,
        Side::Right,
        Side::Back,
        Side::Down,
    ];

    /// Index of this face, equal to its solved color id.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Face for a given index, `None` when out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_core::Side;
    ///
    /// assert_eq!(Side::from_index(3), Some(Side::Right));
    /// assert_eq!(Side::from_index(6), None);
    /// ```
    pub fn from_index(index: usize) -> Option<Side> {
        Self::ALL.get(index).copied()
    }

    /// The face on the other end of this face's axis.
    pub fn opposite(self) -> Side {
        match self {
            Side::Up => Side::Down,
            Side::Left => Side::Right,
            Side::Front => Side::Back,
            Side::Right => Side::Left,
            Side::Back => Side::Front,
            Side::Down => Side::Up,
        }
    }

    /// The four faces bordering this one, in rotation order.
    ///
    /// A quarter turn moves the band held by `adjacent()[k + 1]` into
    /// `adjacent()[k]`, and the band of `adjacent()[0]` into `adjacent()[3]`.
    pub fn adjacent(self) -> [Side; 4] {
        match self {
            Side::Up => [Side::Left, Side::Front, Side::Right, Side::Back],
            Side::Left => [Side::Back, Side::Down, Side::Front, Side::Up],
            Side::Front => [Side::Up, Side::Left, Side::Down, Side::Right],
            Side::Right => [Side::Back, Side::Up, Side::Front, Side::Down],
            Side::Back => [Side::Down, Side::Left, Side::Up, Side::Right],
            Side::Down => [Side::Right, Side::Front, Side::Left, Side::Back],
        }
    }

    /// Operation group of a rotation on this face.
    pub fn group(self) -> Group {
        match self {
            Side::Up | Side::Down => Group::UpDown,
            Side::Left | Side::Right => Group::LeftRight,
            Side::Front | Side::Back => Group::FrontBack,
        }
    }

    /// Whether layers named from this face are counted from the canonical end.
    pub fn is_canonical(self) -> bool {
        matches!(self, Side::Up | Side::Left | Side::Front)
    }

    /// Physical layer index of `layer` named from this face.
    ///
    /// A face and its opposite addressing the same slice map to the same index.
    ///
    /// # Examples
    ///
    /// ```
    /// use cube_core::Side;
    ///
    /// assert_eq!(Side::Up.canonical_layer(0, 3), 0);
    /// assert_eq!(Side::Down.canonical_layer(2, 3), 0);
    /// ```
    pub fn canonical_layer(self, layer: usize, size: usize) -> usize {
        if self.is_canonical() {
            layer
        } else {
            size - 1 - layer
        }
    }

    /// Upper-case face name.
    pub fn name(self) -> &'static str {
        match self {
            Side::Up => "UP",
            Side::Left => "LEFT",
            Side::Front => "FRONT",
            Side::Right => "RIGHT",
            Side::Back => "BACK",
            Side::Down => "DOWN",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a face name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown side: {0}")]
pub struct ParseSideError(pub String);

impl FromStr for Side {
    type Err = ParseSideError;

    /// Accepts a face name in any case (`up`, `Front`) or its index (`0`..`5`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<usize>() {
            return Side::from_index(index).ok_or_else(|| ParseSideError(s.to_string()));
        }
        Side::ALL
            .iter()
            .copied()
            .find(|side| side.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseSideError(s.to_string()))
    }
}

impl Distribution<Side> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Side {
        Side::ALL[rng.gen_range(0..Side::COUNT)]
    }
}

/// Uniformly random layer index for a cube of the given size.
pub fn random_layer<R: Rng + ?Sized>(rng: &mut R, size: usize) -> usize {
    rng.gen_range(0..size)
}

/// Operation class used for coarse-grained admission.
///
/// Operations of the same group may run in parallel; operations of
/// different groups never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Group {
    /// Rotations around the UP/DOWN axis
    UpDown = 0,
    /// Rotations around the LEFT/RIGHT axis
    LeftRight = 1,
    /// Rotations around the FRONT/BACK axis
    FrontBack = 2,
    /// Reads of the full state
    Show = 3,
}

impl Group {
    /// Number of groups.
    pub const COUNT: usize = 4;

    /// All groups by id.
    pub const ALL: [Group; 4] = [Group::UpDown, Group::LeftRight, Group::FrontBack, Group::Show];

    /// Group id.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Group::UpDown => "up/down",
            Group::LeftRight => "left/right",
            Group::FrontBack => "front/back",
            Group::Show => "show",
        };
        f.write_str(name)
    }
}
