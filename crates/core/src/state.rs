//! Facelet storage
//!
//! [`CubeState`] holds `6 × size × size` facelet colors. Every facelet is an
//! `AtomicU8` accessed with `Relaxed` ordering: exclusion between writers is
//! provided externally (group admission plus per-layer locks), and the
//! acquire/release edges of those locks order the accesses. The atomics let
//! same-group rotations on disjoint layers mutate the grid through a shared
//! reference.
//!
//! [`CubeSnapshot`] is an owned copy in canonical order: faces UP, LEFT,
//! FRONT, RIGHT, BACK, DOWN, each face row-major.

use crate::side::Side;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// Shared, mutable facelet grid.
pub struct CubeState {
    size: usize,
    facelets: Box<[AtomicU8]>,
}

impl CubeState {
    /// Create a solved cube: every facelet carries its own face's id.
    pub fn new(size: usize) -> Self {
        let facelets = (0..Side::COUNT * size * size)
            .map(|i| AtomicU8::new((i / (size * size)) as u8))
            .collect();
        Self { size, facelets }
    }

    /// Edge length.
    pub fn size(&self) -> usize {
        self.size
    }

    fn offset(&self, side: Side, row: usize, column: usize) -> usize {
        assert!(
            row < self.size && column < self.size,
            "facelet ({}, {}) out of range for size {}",
            row,
            column,
            self.size
        );
        (side.index() * self.size + row) * self.size + column
    }

    /// Color at `(row, column)` of `side`.
    ///
    /// # Panics
    ///
    /// Panics if `row` or `column` is not below `size`.
    #[inline]
    pub fn get(&self, side: Side, row: usize, column: usize) -> u8 {
        self.facelets[self.offset(side, row, column)].load(Ordering::Relaxed)
    }

    /// Overwrite the color at `(row, column)` of `side`.
    #[inline]
    pub fn set(&self, side: Side, row: usize, column: usize, color: u8) {
        self.facelets[self.offset(side, row, column)].store(color, Ordering::Relaxed);
    }

    /// Return every facelet to its solved color.
    pub fn reset(&self) {
        let face_len = self.size * self.size;
        for (i, facelet) in self.facelets.iter().enumerate() {
            facelet.store((i / face_len) as u8, Ordering::Relaxed);
        }
    }

    /// Copy the current colors out.
    pub fn snapshot(&self) -> CubeSnapshot {
        CubeSnapshot {
            size: self.size,
            facelets: self
                .facelets
                .iter()
                .map(|f| f.load(Ordering::Relaxed))
                .collect(),
        }
    }

    /// Every facelet carries its own face's color.
    pub fn is_solved(&self) -> bool {
        self.snapshot().is_solved()
    }

    /// Each of the six colors appears exactly `size²` times.
    pub fn has_correct_color_counts(&self) -> bool {
        self.snapshot().has_correct_color_counts()
    }
}

impl Clone for CubeState {
    fn clone(&self) -> Self {
        Self::from(&self.snapshot())
    }
}

impl From<&CubeSnapshot> for CubeState {
    fn from(snapshot: &CubeSnapshot) -> Self {
        Self {
            size: snapshot.size,
            facelets: snapshot.facelets.iter().map(|c| AtomicU8::new(*c)).collect(),
        }
    }
}

impl fmt::Debug for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CubeState")
            .field("size", &self.size)
            .field("facelets", &self.snapshot().to_string())
            .finish()
    }
}

/// Owned copy of a cube's colors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubeSnapshot {
    /// Edge length
    pub size: usize,
    /// Colors in canonical face/row/column order
    pub facelets: Vec<u8>,
}

impl CubeSnapshot {
    /// The `size × size` colors of one face, row-major.
    pub fn face(&self, side: Side) -> &[u8] {
        let face_len = self.size * self.size;
        let start = side.index() * face_len;
        &self.facelets[start..start + face_len]
    }

    /// Number of facelets carrying each color id.
    pub fn color_counts(&self) -> [usize; Side::COUNT] {
        let mut counts = [0; Side::COUNT];
        for color in &self.facelets {
            counts[*color as usize] += 1;
        }
        counts
    }

    /// Every facelet carries its own face's color.
    pub fn is_solved(&self) -> bool {
        Side::ALL
            .iter()
            .all(|side| self.face(*side).iter().all(|c| *c as usize == side.index()))
    }

    /// Each color appears exactly `size²` times.
    pub fn has_correct_color_counts(&self) -> bool {
        let expected = self.size * self.size;
        self.color_counts().iter().all(|count| *count == expected)
    }
}

impl fmt::Display for CubeSnapshot {
    /// One decimal digit per facelet, in canonical order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in &self.facelets {
            write!(f, "{}", color)?;
        }
        Ok(())
    }
}
