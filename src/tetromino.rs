//! Tetromino kinds, rotation states and the shape table
//!
//! Shapes are laid out in row-down coordinates inside the piece's bounding
//! box (3x3 for S/Z/L/J/T, 4x4 for I, 2x2 for O). A block's absolute cells
//! are these canonical cells plus the block's offset.

use crate::position::Position;

/// The 7 tetromino kinds. The discriminant is the grid occupancy tag;
/// tag 0 is reserved for an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TetrominoKind {
    O = 1, // Yellow - square
    I = 2, // Cyan - long bar
    S = 3, // Green
    Z = 4, // Red
    L = 5, // Orange
    J = 6, // Blue
    T = 7, // Purple
}

impl TetrominoKind {
    /// Get all tetromino kinds, in tag order
    pub fn all() -> [TetrominoKind; 7] {
        [
            TetrominoKind::O,
            TetrominoKind::I,
            TetrominoKind::S,
            TetrominoKind::Z,
            TetrominoKind::L,
            TetrominoKind::J,
            TetrominoKind::T,
        ]
    }

    /// Grid occupancy tag (1..=7)
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Inverse of [`id`](Self::id). Tag 0 (empty) and anything above 7 map to `None`.
    pub fn from_id(id: u8) -> Option<TetrominoKind> {
        match id {
            1 => Some(TetrominoKind::O),
            2 => Some(TetrominoKind::I),
            3 => Some(TetrominoKind::S),
            4 => Some(TetrominoKind::Z),
            5 => Some(TetrominoKind::L),
            6 => Some(TetrominoKind::J),
            7 => Some(TetrominoKind::T),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TetrominoKind::O => "O",
            TetrominoKind::I => "I",
            TetrominoKind::S => "S",
            TetrominoKind::Z => "Z",
            TetrominoKind::L => "L",
            TetrominoKind::J => "J",
            TetrominoKind::T => "T",
        }
    }

    /// Whether rotating changes the layout. The O piece has a single
    /// physical state.
    pub fn rotates(self) -> bool {
        !matches!(self, TetrominoKind::O)
    }

    /// Canonical cells for a rotation state, relative to the bounding box origin
    pub fn cells(self, rotation: Rotation) -> [Position; 4] {
        let table = match self {
            TetrominoKind::O => return O_CELLS.map(Position::from),
            TetrominoKind::I => &I_CELLS,
            TetrominoKind::S => &S_CELLS,
            TetrominoKind::Z => &Z_CELLS,
            TetrominoKind::L => &L_CELLS,
            TetrominoKind::J => &J_CELLS,
            TetrominoKind::T => &T_CELLS,
        };
        table[rotation.index()].map(Position::from)
    }

    /// Offset applied at spawn so the piece starts centred in the top rows
    pub fn spawn_offset(self) -> Position {
        match self {
            TetrominoKind::O => Position::new(0, 4),
            TetrominoKind::I => Position::new(-1, 3),
            _ => Position::new(0, 3),
        }
    }

    /// Rotation centre inside the bounding box. Meaningful for the 3x3 kinds;
    /// T-Spin detection reads the diagonals around it.
    pub fn pivot(self) -> Position {
        Position::new(1, 1)
    }
}

// O piece doesn't rotate
const O_CELLS: [(i32, i32); 4] = [(0, 0), (0, 1), (1, 0), (1, 1)];

const I_CELLS: [[(i32, i32); 4]; 4] = [
    [(1, 0), (1, 1), (1, 2), (1, 3)],
    [(0, 2), (1, 2), (2, 2), (3, 2)],
    [(2, 3), (2, 2), (2, 1), (2, 0)],
    [(3, 1), (2, 1), (1, 1), (0, 1)],
];

// North: .SS    East: .S.    South: ...    West: S..
//        SS.          .SS           .SS          SS.
//        ...          ..S           SS.          .S.
const S_CELLS: [[(i32, i32); 4]; 4] = [
    [(1, 0), (1, 1), (0, 1), (0, 2)],
    [(0, 1), (1, 1), (1, 2), (2, 2)],
    [(1, 2), (1, 1), (2, 1), (2, 0)],
    [(2, 1), (1, 1), (1, 0), (0, 0)],
];

const Z_CELLS: [[(i32, i32); 4]; 4] = [
    [(0, 0), (0, 1), (1, 1), (1, 2)],
    [(0, 2), (1, 2), (1, 1), (2, 1)],
    [(2, 2), (2, 1), (1, 1), (1, 0)],
    [(2, 0), (1, 0), (1, 1), (0, 1)],
];

const L_CELLS: [[(i32, i32); 4]; 4] = [
    [(0, 2), (1, 2), (1, 1), (1, 0)],
    [(2, 2), (0, 1), (1, 1), (2, 1)],
    [(2, 0), (1, 2), (1, 1), (1, 0)],
    [(0, 0), (2, 1), (1, 1), (0, 1)],
];

const J_CELLS: [[(i32, i32); 4]; 4] = [
    [(0, 0), (1, 0), (1, 1), (1, 2)],
    [(0, 2), (0, 1), (1, 1), (2, 1)],
    [(2, 2), (1, 2), (1, 1), (1, 0)],
    [(2, 0), (2, 1), (1, 1), (0, 1)],
];

// North: .T.    East: .T.    South: ...    West: .T.
//        TTT          .TT           TTT          TT.
//        ...          .T.           .T.          .T.
const T_CELLS: [[(i32, i32); 4]; 4] = [
    [(1, 0), (0, 1), (1, 2), (1, 1)],
    [(0, 1), (1, 2), (2, 1), (1, 1)],
    [(1, 2), (2, 1), (1, 0), (1, 1)],
    [(2, 1), (1, 0), (0, 1), (1, 1)],
];

/// Rotation states (using SRS naming convention)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    North, // Spawn state
    East,  // Clockwise from North
    South, // 180 from North
    West,  // Counter-clockwise from North
}

impl Rotation {
    /// Rotate clockwise: North → East → South → West → North
    pub fn cw(self) -> Rotation {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise: North → West → South → East → North
    pub fn ccw(self) -> Rotation {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// State number 0..=3
    pub fn index(self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    pub fn all() -> [Rotation; 4] {
        [Rotation::North, Rotation::East, Rotation::South, Rotation::West]
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    pub fn opposite(self) -> RotationDirection {
        match self {
            RotationDirection::Clockwise => RotationDirection::CounterClockwise,
            RotationDirection::CounterClockwise => RotationDirection::Clockwise,
        }
    }
}
