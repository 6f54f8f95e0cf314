//! Playfield occupancy and line clearing

use crate::position::Position;
use crate::tetromino::TetrominoKind;

/// Standard Tetris grid dimensions
pub const GRID_ROWS: usize = 20;
pub const GRID_COLS: usize = 10;

/// Tag stored in an empty cell
pub const EMPTY: u8 = 0;

/// The playfield.
///
/// Stored as `[row][col]`, row 0 is the top. A cell holds 0 when empty, or
/// the [`TetrominoKind::id`] of the piece that locked there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: [[u8; GRID_COLS]; GRID_ROWS],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [[EMPTY; GRID_COLS]; GRID_ROWS],
        }
    }

    /// Empty every cell in place
    pub fn reset(&mut self) {
        for row in self.cells.iter_mut() {
            *row = [EMPTY; GRID_COLS];
        }
    }

    pub fn is_outside_boundary(&self, row: i32, col: i32) -> bool {
        !(0..GRID_ROWS as i32).contains(&row) || !(0..GRID_COLS as i32).contains(&col)
    }

    /// True iff the cell is in bounds and holds no piece. Out-of-range
    /// reads count as occupied.
    pub fn is_cell_empty(&self, row: i32, col: i32) -> bool {
        self.get(row, col) == Some(EMPTY)
    }

    /// Outside the grid or occupied
    pub fn is_blocked(&self, pos: Position) -> bool {
        self.is_outside_boundary(pos.row, pos.col) || !self.is_cell_empty(pos.row, pos.col)
    }

    /// Whether every position is in bounds and empty
    pub fn fits(&self, positions: &[Position]) -> bool {
        positions.iter().all(|&pos| !self.is_blocked(pos))
    }

    /// Get the tag at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<u8> {
        if self.is_outside_boundary(row, col) {
            return None;
        }
        Some(self.cells[row as usize][col as usize])
    }

    /// The kind that locked into a cell, if any
    pub fn kind_at(&self, row: i32, col: i32) -> Option<TetrominoKind> {
        self.get(row, col).and_then(TetrominoKind::from_id)
    }

    /// Set a cell at a position
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, tag: u8) -> bool {
        if self.is_outside_boundary(row, col) {
            return false;
        }
        self.cells[row as usize][col as usize] = tag;
        true
    }

    /// Write a piece's cells into the grid tagged with its kind
    pub fn lock_cells(&mut self, positions: &[Position], kind: TetrominoKind) {
        for pos in positions {
            self.set(pos.row, pos.col, kind.id());
        }
    }

    /// Clear completed rows and compact the stack, returning the number cleared.
    ///
    /// Single bottom-up pass: full rows are emptied and counted, and every
    /// other row drops by the number of full rows found beneath it.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut completed = 0;

        for row in (0..GRID_ROWS).rev() {
            if self.is_row_full(row) {
                self.cells[row] = [EMPTY; GRID_COLS];
                completed += 1;
            } else if completed > 0 {
                self.cells[row + completed] = self.cells[row];
                self.cells[row] = [EMPTY; GRID_COLS];
            }
        }

        completed
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        self.cells
            .get(row)
            .is_some_and(|cells| cells.iter().all(|&cell| cell != EMPTY))
    }

    /// Check if the grid is completely empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|&cell| cell == EMPTY))
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8; GRID_COLS]> {
        self.cells.iter()
    }
}
