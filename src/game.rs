//! Core game state and logic

use crate::bag::BagRandomizer;
use crate::block::Block;
use crate::grid::Grid;
use crate::position::Position;
use crate::score::{Score, ScoreAward, TSpin};
use crate::tetromino::{RotationDirection, TetrominoKind};
use crate::timing::FrameClock;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Lock delay settings
pub const LOCK_DELAY: Duration = Duration::from_millis(500);
pub const MAX_LOCK_RESETS: u32 = 15;

/// Diagonal neighbours of the T centre, checked for T-Spins
const T_CORNERS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Active,
    /// Terminal until the next command, which resets the game
    GameOver,
}

/// Commands the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateClockwise,
    RotateCounterClockwise,
    Hold,
    Reset,
}

/// What happened on the most recent lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockReport {
    pub kind: TetrominoKind,
    pub lines_cleared: u32,
    pub t_spin: Option<TSpin>,
    /// Back-to-back bonus applied to this clear
    pub back_to_back: bool,
    pub combo: i32,
    pub award: ScoreAward,
}

impl LockReport {
    /// Action name for display, `None` for an unremarkable lock
    pub fn describe(&self) -> Option<String> {
        let name = match (self.t_spin, self.lines_cleared) {
            (None, 0) => return None,
            (None, 1) => "Single",
            (None, 2) => "Double",
            (None, 3) => "Triple",
            (None, _) => "Tetris",
            (Some(TSpin::Mini), 0) => "Mini T-Spin",
            (Some(TSpin::Mini), 1) => "Mini T-Spin Single",
            (Some(TSpin::Mini), 2) => "Mini T-Spin Double",
            (Some(TSpin::Regular), 0) => "T-Spin",
            (Some(TSpin::Regular), 1) => "T-Spin Single",
            (Some(TSpin::Regular), 2) => "T-Spin Double",
            (Some(_), _) => "T-Spin Triple",
        };

        let mut action = String::from(name);
        if self.back_to_back {
            action = format!("B2B {}", action);
        }
        if self.combo > 0 {
            action.push_str(&format!(" Combo x{}", self.combo));
        }
        Some(action)
    }
}

/// The main game struct
#[derive(Debug, Clone)]
pub struct Game {
    grid: Grid,
    /// Current falling block
    current: Block,
    /// Next block preview
    next: Block,
    /// Held block, always stored in its spawn layout
    held: Option<Block>,
    /// Whether hold has been used since the last lock
    just_held: bool,
    bag: BagRandomizer,
    score: Score,
    state: GameState,
    /// Lock delay timer (Some when the block has touched down)
    lock_delay_start: Option<Instant>,
    /// Lock delay resets left for the current block
    lock_resets: u32,
    /// Last successful manipulation was a rotation (T-Spin detection)
    last_move_was_rotate: bool,
    last_lock: Option<LockReport>,
    pieces_locked: u64,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Create a new game with a randomly seeded bag
    pub fn new() -> Self {
        Self::with_bag(BagRandomizer::new())
    }

    /// Create a new game with a fixed bag seed
    pub fn with_seed(seed: u64) -> Self {
        Self::with_bag(BagRandomizer::with_seed(seed))
    }

    fn with_bag(mut bag: BagRandomizer) -> Self {
        let current = Block::new(bag.next());
        let next = Block::new(bag.next());

        Self {
            grid: Grid::new(),
            current,
            next,
            held: None,
            just_held: false,
            bag,
            score: Score::new(),
            state: GameState::Active,
            lock_delay_start: None,
            lock_resets: MAX_LOCK_RESETS,
            last_move_was_rotate: false,
            last_lock: None,
            pieces_locked: 0,
        }
    }

    /// Start over: empty grid, full bag, zero score
    pub fn reset(&mut self) {
        self.grid.reset();
        self.bag.refill();
        self.current = Block::new(self.bag.next());
        self.next = Block::new(self.bag.next());
        self.held = None;
        self.just_held = false;
        self.score = Score::new();
        self.state = GameState::Active;
        self.lock_delay_start = None;
        self.lock_resets = MAX_LOCK_RESETS;
        self.last_move_was_rotate = false;
        self.last_lock = None;
        info!("game reset");
    }

    /// Process a command. While the game is over, any command resets it.
    pub fn apply(&mut self, command: Command, now: Instant) {
        if self.is_game_over() {
            self.reset();
            return;
        }

        match command {
            Command::MoveLeft => {
                self.move_left(now);
            }
            Command::MoveRight => {
                self.move_right(now);
            }
            Command::SoftDrop => {
                self.move_down(true, now);
            }
            Command::HardDrop => {
                self.hard_drop();
            }
            Command::RotateClockwise => {
                self.rotate(RotationDirection::Clockwise, now);
            }
            Command::RotateCounterClockwise => {
                self.rotate(RotationDirection::CounterClockwise, now);
            }
            Command::Hold => {
                self.hold();
            }
            Command::Reset => self.reset(),
        }
    }

    /// Per-frame tick: gravity if due, then the lock delay check
    pub fn update(&mut self, clock: &mut FrameClock, now: Instant) {
        if self.is_game_over() {
            return;
        }
        if clock.gravity_due(self.level(), now) {
            self.move_down(false, now);
        }
        self.lock_delay(now);
    }

    pub fn move_left(&mut self, now: Instant) -> bool {
        self.shift(-1, now)
    }

    pub fn move_right(&mut self, now: Instant) -> bool {
        self.shift(1, now)
    }

    fn shift(&mut self, cols: i32, now: Instant) -> bool {
        if self.is_game_over() {
            return false;
        }

        self.current.move_by(0, cols);
        if !self.current_fits() {
            self.current.move_by(0, -cols);
            return false;
        }

        self.last_move_was_rotate = false;
        self.try_reset_lock(now);
        true
    }

    /// Move down one row. A blocked move starts the lock delay instead of
    /// locking; a soft drop scores 1 point per row.
    pub fn move_down(&mut self, soft_drop: bool, now: Instant) -> bool {
        if self.is_game_over() {
            return false;
        }

        self.current.move_by(1, 0);
        if !self.current_fits() {
            self.current.move_by(-1, 0);
            if self.lock_delay_start.is_none() {
                self.lock_delay_start = Some(now);
                debug!(resets = self.lock_resets, "lock delay started");
            }
            return false;
        }

        self.last_move_was_rotate = false;
        self.lock_delay_start = None;
        if soft_drop {
            self.score.add_soft_drop(1);
        }
        true
    }

    /// Drop as far as possible and lock immediately. Returns rows dropped.
    pub fn hard_drop(&mut self) -> u32 {
        if self.is_game_over() {
            return 0;
        }

        let mut tiles = 0;
        while self.can_move_down() {
            self.current.move_by(1, 0);
            tiles += 1;
        }
        if tiles > 0 {
            self.last_move_was_rotate = false;
        }

        self.score.add_hard_drop(tiles);
        self.lock_block();
        tiles
    }

    pub fn rotate_clockwise(&mut self, now: Instant) -> bool {
        self.rotate(RotationDirection::Clockwise, now)
    }

    pub fn rotate_counter_clockwise(&mut self, now: Instant) -> bool {
        self.rotate(RotationDirection::CounterClockwise, now)
    }

    /// Rotate in place if legal, otherwise take the first legal kick in
    /// table order. If none fits, the rotation is undone.
    pub fn rotate(&mut self, direction: RotationDirection, now: Instant) -> bool {
        if self.is_game_over() {
            return false;
        }

        let kicks = self.current.rotate(direction);

        if !self.current_fits() {
            let Some(kick) = kicks
                .into_iter()
                .find(|kick| self.grid.fits(&self.current.cells_shifted(kick.row, kick.col)))
            else {
                self.current.rotate(direction.opposite());
                self.last_move_was_rotate = false;
                return false;
            };
            self.current.move_by(kick.row, kick.col);
            debug!(?direction, row = kick.row, col = kick.col, "wall kick");
        }

        self.last_move_was_rotate = true;
        self.try_reset_lock(now);
        true
    }

    /// Swap the current block with the held one. Once per lock.
    pub fn hold(&mut self) -> bool {
        if self.is_game_over() || self.just_held {
            return false;
        }

        let outgoing = self.current.kind();
        self.current = match self.held.take() {
            Some(held) => Block::new(held.kind()),
            None => {
                let promoted = self.next;
                self.next = Block::new(self.bag.next());
                promoted
            }
        };
        self.held = Some(Block::new(outgoing));

        self.just_held = true;
        self.lock_delay_start = None;
        self.lock_resets = MAX_LOCK_RESETS;
        self.last_move_was_rotate = false;
        debug!(held = ?outgoing, current = ?self.current.kind(), "hold");
        true
    }

    /// Lock once the delay has run out or the reset budget is spent. Called
    /// every frame; clears the delay if the block can fall again.
    pub fn lock_delay(&mut self, now: Instant) {
        let Some(start) = self.lock_delay_start else {
            return;
        };
        if self.is_game_over() {
            return;
        }

        if self.can_move_down() {
            self.lock_delay_start = None;
            return;
        }

        if now.saturating_duration_since(start) >= LOCK_DELAY || self.lock_resets == 0 {
            self.lock_block();
        }
    }

    /// Lock the current block into the grid and spawn the next one.
    pub fn lock_block(&mut self) {
        let locked = self.current;
        self.grid.lock_cells(&locked.cell_positions(), locked.kind());

        // Classify before rows are cleared
        let t_spin = if self.last_move_was_rotate && locked.kind() == TetrominoKind::T {
            Some(self.classify_t_spin(&locked))
        } else {
            None
        };

        self.current = self.next;
        if !self.current_fits() {
            self.state = GameState::GameOver;
            info!(
                score = self.score.points,
                lines = self.score.lines,
                "game over: spawn blocked"
            );
        }
        self.next = Block::new(self.bag.next());
        self.lock_resets = MAX_LOCK_RESETS;
        self.lock_delay_start = None;

        let lines = self.grid.clear_full_rows() as u32;
        let award = self.score.add_lock(lines, t_spin);
        self.last_move_was_rotate = false;
        self.just_held = false;
        self.pieces_locked += 1;

        debug!(
            kind = ?locked.kind(),
            lines,
            ?t_spin,
            combo = self.score.combo,
            points = award.total(),
            "block locked"
        );

        self.last_lock = Some(LockReport {
            kind: locked.kind(),
            lines_cleared: lines,
            t_spin,
            back_to_back: award.back_to_back,
            combo: self.score.combo,
            award,
        });
    }

    /// Corner rule: 3 or more of the 4 diagonals around the centre filled or
    /// off-grid is a regular T-Spin, anything less a mini.
    fn classify_t_spin(&self, block: &Block) -> TSpin {
        let center = block.center();
        let filled = T_CORNERS
            .iter()
            .filter(|&&(dr, dc)| self.grid.is_blocked(center.offset(dr, dc)))
            .count();

        if filled >= 3 { TSpin::Regular } else { TSpin::Mini }
    }

    /// Count down the reset budget and restart the lock timer (only while
    /// the lock delay is running)
    fn try_reset_lock(&mut self, now: Instant) {
        if self.lock_delay_start.is_some() {
            self.lock_delay_start = Some(now);
            self.lock_resets = self.lock_resets.saturating_sub(1);
        }
    }

    fn current_fits(&self) -> bool {
        self.grid.fits(&self.current.cell_positions())
    }

    pub fn can_move_down(&self) -> bool {
        self.grid.fits(&self.current.cells_shifted(1, 0))
    }

    /// Rows the current block can still fall
    pub fn ghost_distance(&self) -> i32 {
        let mut distance = 0;
        while self.grid.fits(&self.current.cells_shifted(distance + 1, 0)) {
            distance += 1;
        }
        distance
    }

    /// Where the current block would land on a hard drop
    pub fn ghost_cells(&self) -> [Position; 4] {
        self.current.cells_shifted(self.ghost_distance(), 0)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current(&self) -> &Block {
        &self.current
    }

    pub fn next(&self) -> &Block {
        &self.next
    }

    pub fn held(&self) -> Option<&Block> {
        self.held.as_ref()
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn points(&self) -> u64 {
        self.score.points
    }

    pub fn lines_cleared(&self) -> u32 {
        self.score.lines
    }

    pub fn level(&self) -> u32 {
        self.score.level()
    }

    pub fn combo(&self) -> i32 {
        self.score.combo
    }

    pub fn back_to_back(&self) -> bool {
        self.score.back_to_back
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn lock_delay_active(&self) -> bool {
        self.lock_delay_start.is_some()
    }

    pub fn lock_resets(&self) -> u32 {
        self.lock_resets
    }

    pub fn last_lock(&self) -> Option<&LockReport> {
        self.last_lock.as_ref()
    }

    /// Locks since the game was created; never reset
    pub fn pieces_locked(&self) -> u64 {
        self.pieces_locked
    }
}
