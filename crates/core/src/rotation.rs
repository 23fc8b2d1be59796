//! Geometric transform for a single quarter turn
//!
//! A turn of `(side, layer)` does two things:
//! 1. If the layer is the side's own face (`layer == 0`) that face is turned
//!    clockwise; if it is the far face (`layer == size - 1`) the opposite face
//!    is turned counter-clockwise. On a `1×1×1` cube both happen.
//! 2. The band of `size` facelets cut by the layer on each of the four
//!    adjacent faces moves one step along [`Side::adjacent`].
//!
//! Faces are stored with different orientations, so each axis has its own
//! band coordinate rule (see [`band_cell`]). Nothing here synchronizes: the
//! caller must hold the layer's lock and its group's admission.

use crate::side::Side;
use crate::state::CubeState;

type Cell = (Side, usize, usize);

/// Apply one quarter turn of `layer` seen from `side`.
///
/// # Examples
///
/// ```
/// use cube_core::{rotation, CubeState, Side};
///
/// let state = CubeState::new(3);
/// for _ in 0..4 {
///     rotation::apply(&state, Side::Front, 1);
/// }
/// assert!(state.is_solved());
/// ```
pub fn apply(state: &CubeState, side: Side, layer: usize) {
    let size = state.size();
    debug_assert!(layer < size, "layer {} out of range for size {}", layer, size);

    if layer == 0 {
        turn_face_clockwise(state, side);
    }
    if layer == size - 1 {
        turn_face_counterclockwise(state, side.opposite());
    }
    for i in 0..size {
        shift(
            state,
            [
                band_cell(side, layer, size, 0, i),
                band_cell(side, layer, size, 1, i),
                band_cell(side, layer, size, 2, i),
                band_cell(side, layer, size, 3, i),
            ],
        );
    }
}

/// Position of the `i`-th facelet of the band on chain slot `slot`.
///
/// `slot` indexes [`Side::adjacent`] of `side`.
fn band_cell(side: Side, layer: usize, size: usize, slot: usize, i: usize) -> Cell {
    let last = size - 1;
    let far = last - layer;
    let (row, column) = match side {
        Side::Up => (layer, i),
        Side::Down => (far, i),
        Side::Left | Side::Right => {
            let column = if side == Side::Left { layer } else { far };
            // BACK is stored mirrored relative to the other three.
            if slot == 0 {
                (last - i, last - column)
            } else {
                (i, column)
            }
        }
        Side::Front => match slot {
            0 => (far, i),
            1 => (last - i, far),
            2 => (layer, last - i),
            _ => (i, layer),
        },
        Side::Back => match slot {
            0 => (far, i),
            1 => (i, layer),
            2 => (layer, last - i),
            _ => (last - i, far),
        },
    };
    (side.adjacent()[slot], row, column)
}

fn turn_face_clockwise(state: &CubeState, face: Side) {
    let n = state.size();
    for i in 0..n / 2 {
        for j in i..n - i - 1 {
            shift(
                state,
                [
                    (face, i, j),
                    (face, n - 1 - j, i),
                    (face, n - 1 - i, n - 1 - j),
                    (face, j, n - 1 - i),
                ],
            );
        }
    }
}

fn turn_face_counterclockwise(state: &CubeState, face: Side) {
    let n = state.size();
    for i in 0..n / 2 {
        for j in i..n - i - 1 {
            shift(
                state,
                [
                    (face, i, j),
                    (face, j, n - 1 - i),
                    (face, n - 1 - i, n - 1 - j),
                    (face, n - 1 - j, i),
                ],
            );
        }
    }
}

/// `cells[0] <- cells[1] <- cells[2] <- cells[3] <- cells[0]`
fn shift(state: &CubeState, cells: [Cell; 4]) {
    let (s, r, c) = cells[0];
    let first = state.get(s, r, c);
    for k in 0..3 {
        let (from_side, from_row, from_column) = cells[k + 1];
        let (to_side, to_row, to_column) = cells[k];
        state.set(
            to_side,
            to_row,
            to_column,
            state.get(from_side, from_row, from_column),
        );
    }
    let (s, r, c) = cells[3];
    state.set(s, r, c, first);
}
