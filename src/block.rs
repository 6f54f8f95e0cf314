//! A live tetromino instance

use crate::position::Position;
use crate::srs::get_wall_kicks;
use crate::tetromino::{Rotation, RotationDirection, TetrominoKind};

/// A falling (or previewed) tetromino.
///
/// Movement and rotation here are unconditional: the block never looks at
/// the grid. Legality is checked by the caller, which reverts on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    kind: TetrominoKind,
    rotation: Rotation,
    /// Translation from the kind's canonical layout
    offset: Position,
}

impl Block {
    /// Create a new block at its spawn position
    pub fn new(kind: TetrominoKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            offset: kind.spawn_offset(),
        }
    }

    pub fn kind(&self) -> TetrominoKind {
        self.kind
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn offset(&self) -> Position {
        self.offset
    }

    /// Shift by the given deltas
    pub fn move_by(&mut self, rows: i32, cols: i32) {
        self.offset = self.offset.offset(rows, cols);
    }

    /// Advance the rotation state and return the kick candidates for that
    /// transition. The block itself is not kicked.
    pub fn rotate_clockwise(&mut self) -> [Position; 5] {
        self.rotate(RotationDirection::Clockwise)
    }

    /// Retreat the rotation state and return the kick candidates for that
    /// transition.
    pub fn rotate_counter_clockwise(&mut self) -> [Position; 5] {
        self.rotate(RotationDirection::CounterClockwise)
    }

    pub fn rotate(&mut self, direction: RotationDirection) -> [Position; 5] {
        if self.kind.rotates() {
            self.rotation = match direction {
                RotationDirection::Clockwise => self.rotation.cw(),
                RotationDirection::CounterClockwise => self.rotation.ccw(),
            };
        }
        get_wall_kicks(self.kind, self.rotation, direction)
    }

    /// Absolute positions of all 4 cells
    pub fn cell_positions(&self) -> [Position; 4] {
        self.kind.cells(self.rotation).map(|cell| cell + self.offset)
    }

    /// Cells as they would be after shifting by (rows, cols)
    pub fn cells_shifted(&self, rows: i32, cols: i32) -> [Position; 4] {
        self.cell_positions().map(|cell| cell.offset(rows, cols))
    }

    /// Absolute position of the rotation centre
    pub fn center(&self) -> Position {
        self.kind.pivot() + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_spawn_position() {
        let block = Block::new(TetrominoKind::T);
        assert_eq!(block.offset(), Position::new(0, 3));
        assert_eq!(block.rotation(), Rotation::North);
        let cells = block.cell_positions();
        assert!(cells.contains(&Position::new(0, 4)));
        assert!(cells.contains(&Position::new(1, 3)));
        assert!(cells.contains(&Position::new(1, 5)));
    }

    #[test]
    fn test_i_spawns_in_top_row() {
        let block = Block::new(TetrominoKind::I);
        assert!(block.cell_positions().iter().all(|c| c.row == 0));
    }

    #[test]
    fn test_four_distinct_cells_for_every_state() {
        for kind in TetrominoKind::all() {
            let mut block = Block::new(kind);
            for _ in 0..4 {
                let cells: HashSet<_> = block.cell_positions().into_iter().collect();
                assert_eq!(cells.len(), 4);
                block.rotate_clockwise();
            }
        }
    }

    #[test]
    fn test_four_clockwise_turns_round_trip() {
        for kind in TetrominoKind::all() {
            let original = Block::new(kind);
            let mut block = original;
            for _ in 0..4 {
                block.rotate_clockwise();
            }
            assert_eq!(block, original);
        }
    }

    #[test]
    fn test_rotation_undo() {
        let mut block = Block::new(TetrominoKind::L);
        block.rotate_counter_clockwise();
        assert_eq!(block.rotation(), Rotation::West);
        block.rotate_clockwise();
        assert_eq!(block, Block::new(TetrominoKind::L));
    }

    #[test]
    fn test_o_rotation_is_noop() {
        let mut block = Block::new(TetrominoKind::O);
        let kicks = block.rotate_clockwise();
        assert_eq!(block.rotation(), Rotation::North);
        assert_eq!(kicks, [Position::new(0, 0); 5]);
    }

    #[test]
    fn test_rotation_returns_kicks_for_transition() {
        let mut block = Block::new(TetrominoKind::T);
        let kicks = block.rotate_clockwise();
        assert_eq!(kicks[1], Position::new(0, -1));
        assert_eq!(kicks[3], Position::new(2, 0));
    }

    #[test]
    fn test_move_by() {
        let mut block = Block::new(TetrominoKind::J);
        let before = block.cell_positions();
        block.move_by(2, -1);
        let after = block.cell_positions();
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(a.row, b.row + 2);
            assert_eq!(a.col, b.col - 1);
        }
    }

    #[test]
    fn test_center_follows_offset() {
        let mut block = Block::new(TetrominoKind::T);
        assert_eq!(block.center(), Position::new(1, 4));
        block.move_by(5, 1);
        assert_eq!(block.center(), Position::new(6, 5));
    }
}
