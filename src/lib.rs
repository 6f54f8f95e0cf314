//! Guideline Tetris engine
//!
//! The rules core: tetromino shapes and SRS wall kicks, a 10x20 grid,
//! the 7-bag randomizer, lock delay, hold, T-Spin detection and
//! combo / back-to-back scoring. Rendering and input live in the binary.

pub mod bag;
pub mod block;
pub mod game;
pub mod grid;
pub mod position;
pub mod score;
pub mod srs;
pub mod tetromino;
pub mod timing;

pub use block::Block;
pub use game::{Command, Game, GameState, LockReport};
pub use grid::Grid;
pub use position::Position;
pub use score::{Score, ScoreAward, TSpin};
pub use tetromino::{Rotation, RotationDirection, TetrominoKind};
pub use timing::FrameClock;
