//! Super Rotation System (SRS) wall kick data
//!
//! SRS defines the wall kicks attempted when rotating a piece.
//! If a rotation would cause collision, these offsets are tried in order
//! and the first legal one wins.
//!
//! Offsets are (row, col) with row increasing downward. Each table is
//! indexed by the rotation state being entered, so together with the
//! direction it names a single transition.

use crate::position::Position;
use crate::tetromino::{Rotation, RotationDirection, TetrominoKind};

type KickTable = [[(i32, i32); 5]; 4];

/// J, L, S, T, Z kicks for clockwise turns
const DEFAULT_CW: KickTable = [
    // L→0
    [(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)],
    // 0→R
    [(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],
    // R→2
    [(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],
    // 2→L
    [(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],
];

/// J, L, S, T, Z kicks for counter-clockwise turns
const DEFAULT_CCW: KickTable = [
    // R→0
    [(0, 0), (0, 1), (1, 1), (-2, 0), (-2, 1)],
    // 2→R
    [(0, 0), (0, -1), (-1, -1), (2, 0), (2, -1)],
    // L→2
    [(0, 0), (0, -1), (1, -1), (-2, 0), (-2, -1)],
    // 0→L
    [(0, 0), (0, 1), (-1, 1), (2, 0), (2, 1)],
];

const I_CW: KickTable = [
    // L→0
    [(0, 0), (0, 1), (0, -2), (2, 1), (-1, -2)],
    // 0→R
    [(0, 0), (0, -2), (0, 1), (1, -2), (-2, 1)],
    // R→2
    [(0, 0), (0, -1), (0, 2), (-2, -1), (1, 2)],
    // 2→L
    [(0, 0), (0, 2), (0, -1), (-1, 2), (2, -1)],
];

const I_CCW: KickTable = [
    // R→0
    [(0, 0), (0, 2), (0, -1), (-1, 2), (2, -1)],
    // 2→R
    [(0, 0), (0, 1), (0, -2), (2, 1), (-1, -2)],
    // L→2
    [(0, 0), (0, -2), (0, 1), (1, -2), (-2, 1)],
    // 0→L
    [(0, 0), (0, -1), (0, 2), (-2, -1), (1, 2)],
];

/// Get wall kick offsets for a rotation into `to`.
/// Always 5 candidates; the first is the identity offset.
pub fn get_wall_kicks(
    kind: TetrominoKind,
    to: Rotation,
    direction: RotationDirection,
) -> [Position; 5] {
    let table = match (kind, direction) {
        // O piece doesn't rotate, but we return identity kicks
        (TetrominoKind::O, _) => return [Position::default(); 5],
        (TetrominoKind::I, RotationDirection::Clockwise) => &I_CW,
        (TetrominoKind::I, RotationDirection::CounterClockwise) => &I_CCW,
        (_, RotationDirection::Clockwise) => &DEFAULT_CW,
        (_, RotationDirection::CounterClockwise) => &DEFAULT_CCW,
    };
    table[to.index()].map(Position::from)
}
