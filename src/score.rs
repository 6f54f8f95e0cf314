//! Scoring system following modern Tetris guidelines
//!
//! Line clears and T-Spins scale with level, consecutive difficult clears
//! earn a 1.5x back-to-back bonus, and consecutive clearing locks build a
//! combo worth 50 x combo x level.

/// Highest level reachable
pub const MAX_LEVEL: u32 = 15;

/// T-Spin classification from the corner rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TSpin {
    Mini,
    Regular,
}

/// Points awarded for a single lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreAward {
    /// Line clear or T-Spin points, including any back-to-back bonus
    pub clear: u64,
    /// Combo bonus
    pub combo_bonus: u64,
    /// Whether the back-to-back multiplier was applied
    pub back_to_back: bool,
}

impl ScoreAward {
    pub fn total(&self) -> u64 {
        self.clear + self.combo_bonus
    }
}

/// Score, lines and the streak state that feeds scoring
#[derive(Debug, Clone)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Total lines cleared
    pub lines: u32,
    /// Current combo count (-1 = no combo)
    pub combo: i32,
    /// Whether the last line clear was a "difficult" clear (tetris or T-Spin)
    pub back_to_back: bool,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            lines: 0,
            combo: -1,
            back_to_back: false,
        }
    }

    /// Level 1 to 15, up one every 10 lines
    pub fn level(&self) -> u32 {
        (1 + self.lines / 10).min(MAX_LEVEL)
    }

    /// Score a lock that cleared `lines` rows, with an optional T-Spin.
    ///
    /// Level is taken before this lock's lines are counted.
    pub fn add_lock(&mut self, lines: u32, t_spin: Option<TSpin>) -> ScoreAward {
        let level = self.level() as u64;

        self.combo = if lines > 0 { self.combo + 1 } else { -1 };

        // (base points, difficult clear)
        let (base, difficult) = match (lines, t_spin) {
            (0, None) => (0, None),
            // Spin without lines leaves back-to-back untouched
            (0, Some(TSpin::Mini)) => (100, None),
            (0, Some(TSpin::Regular)) => (400, None),
            (1, None) => (100, Some(false)),
            (1, Some(TSpin::Mini)) => (200, Some(true)),
            (1, Some(TSpin::Regular)) => (800, Some(true)),
            (2, None) => (300, Some(false)),
            (2, Some(TSpin::Mini)) => (400, Some(true)),
            (2, Some(TSpin::Regular)) => (1200, Some(true)),
            (3, None) => (500, Some(false)),
            (3, Some(_)) => (1600, Some(true)),
            // No T-Spin fits a four-line clear
            _ => (800, Some(true)),
        };

        let mut award = ScoreAward {
            clear: base * level,
            ..ScoreAward::default()
        };

        // Back-to-back bonus (1.5x for consecutive difficult clears)
        if let Some(difficult) = difficult {
            if difficult && self.back_to_back {
                award.clear = award.clear * 3 / 2;
                award.back_to_back = true;
            }
            self.back_to_back = difficult;
        }

        if self.combo >= 0 {
            award.combo_bonus = self.combo as u64 * 50 * level;
        }

        self.points += award.total();
        self.lines += lines;
        award
    }

    /// Add score for soft drop (1 point per cell)
    pub fn add_soft_drop(&mut self, cells: u32) {
        self.points += cells as u64;
    }

    /// Add score for hard drop (2 points per cell)
    pub fn add_hard_drop(&mut self, cells: u32) {
        self.points += cells as u64 * 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_clear() {
        let mut score = Score::new();
        let award = score.add_lock(1, None);
        assert_eq!(award.clear, 100);
        assert_eq!(award.combo_bonus, 0);
        assert_eq!(score.points, 100);
        assert_eq!(score.lines, 1);
        assert_eq!(score.combo, 0);
    }

    #[test]
    fn test_tetris() {
        let mut score = Score::new();
        score.add_lock(4, None);
        assert_eq!(score.points, 800);
        assert_eq!(score.lines, 4);
        assert!(score.back_to_back);
    }

    #[test]
    fn test_back_to_back_tetris() {
        let mut score = Score::new();
        score.add_lock(4, None);
        let award = score.add_lock(4, None);
        assert_eq!(award.clear, 1200);
        assert!(award.back_to_back);
        // Second tetris also continues the combo
        assert_eq!(award.combo_bonus, 50);
        assert_eq!(score.points, 800 + 1200 + 50);
    }

    #[test]
    fn test_easy_clear_breaks_back_to_back() {
        let mut score = Score::new();
        score.add_lock(4, None);
        score.add_lock(0, None);
        score.add_lock(2, None);
        assert!(!score.back_to_back);
        let award = score.add_lock(4, None);
        assert_eq!(award.clear, 800);
        assert!(!award.back_to_back);
    }

    #[test]
    fn test_t_spin_table() {
        let cases = [
            (1, TSpin::Mini, 200),
            (1, TSpin::Regular, 800),
            (2, TSpin::Mini, 400),
            (2, TSpin::Regular, 1200),
            (3, TSpin::Mini, 1600),
            (3, TSpin::Regular, 1600),
        ];
        for (lines, spin, expected) in cases {
            let mut score = Score::new();
            let award = score.add_lock(lines, Some(spin));
            assert_eq!(award.clear, expected, "{} lines {:?}", lines, spin);
            assert!(score.back_to_back);
        }
    }

    #[test]
    fn test_zero_line_t_spin_keeps_back_to_back() {
        let mut score = Score::new();
        assert_eq!(score.add_lock(0, Some(TSpin::Mini)).clear, 100);
        assert!(!score.back_to_back);
        assert_eq!(score.add_lock(0, Some(TSpin::Regular)).clear, 400);
        assert!(!score.back_to_back);

        score.add_lock(4, None);
        score.add_lock(0, Some(TSpin::Regular));
        assert!(score.back_to_back);
        let award = score.add_lock(2, Some(TSpin::Regular));
        assert_eq!(award.clear, 1800);
    }

    #[test]
    fn test_combo() {
        let mut score = Score::new();
        score.add_lock(1, None);
        let second = score.add_lock(1, None);
        let third = score.add_lock(1, None);
        assert_eq!(second.combo_bonus, 50);
        assert_eq!(third.combo_bonus, 100);
        score.add_lock(0, None);
        assert_eq!(score.combo, -1);
        assert_eq!(score.add_lock(1, None).combo_bonus, 0);
    }

    #[test]
    fn test_level_up() {
        let mut score = Score::new();
        for _ in 0..10 {
            score.add_lock(1, None);
        }
        assert_eq!(score.level(), 2);
    }

    #[test]
    fn test_level_uses_lines_before_lock() {
        let mut score = Score::new();
        score.lines = 9;
        score.combo = -1;
        let award = score.add_lock(1, None);
        assert_eq!(award.clear, 100);
        assert_eq!(score.level(), 2);
    }

    #[test]
    fn test_level_cap() {
        let mut score = Score::new();
        score.lines = 500;
        assert_eq!(score.level(), MAX_LEVEL);
        assert_eq!(score.add_lock(1, None).clear, 100 * 15);
    }

    #[test]
    fn test_drop_points() {
        let mut score = Score::new();
        score.add_soft_drop(3);
        score.add_hard_drop(5);
        assert_eq!(score.points, 13);
    }
}
