use std::time::Duration;

use crate::{EngineConfig, FallCurve};

/// Returns the 1-based level reached after `total_lines` cleared rows.
///
/// ```
/// use blockfall_engine::level_for_lines;
///
/// assert_eq!(level_for_lines(0, 10), 1);
/// assert_eq!(level_for_lines(9, 10), 1);
/// assert_eq!(level_for_lines(10, 10), 2);
/// assert_eq!(level_for_lines(35, 10), 4);
/// ```
#[must_use]
pub fn level_for_lines(total_lines: usize, lines_per_level: usize) -> usize {
    total_lines / lines_per_level + 1
}

/// Scoring effect of one lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClear {
    /// Rows removed by the sweep.
    pub cleared_lines: usize,
    /// Points awarded for the clear (`line_scores[cleared] * level`).
    pub score_delta: u64,
    /// Level after the clear.
    pub level: usize,
    /// Whether the clear moved to a new level.
    pub level_changed: bool,
}

/// Game statistics tracking score, lines cleared, level and fall speed.
///
/// # Scoring
///
/// - A lock clearing `n` rows at level `L` scores `line_scores[n] * L`,
///   using the level before the clear.
/// - Soft-drop steps (and, if configured, hard-drop rows) add flat points.
/// - Level is `floor(lines / lines_per_level) + 1`; the fall interval follows
///   the configured [`FallCurve`] and only changes when the level does.
///
/// # Example
///
/// ```
/// use blockfall_engine::{EngineConfig, GameStats};
///
/// let mut stats = GameStats::new(&EngineConfig::default());
/// let clear = stats.complete_piece_drop(4);
///
/// assert_eq!(clear.score_delta, 800);
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameStats {
    line_scores: [u64; 5],
    lines_per_level: usize,
    fall_curve: FallCurve,
    score: u64,
    total_cleared_lines: usize,
    level: usize,
    fall_interval: Duration,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
    play_time: Duration,
}

impl GameStats {
    /// Creates a tracker at level 1 with every counter at zero.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            line_scores: config.line_scores,
            lines_per_level: config.lines_per_level,
            fall_curve: config.fall_curve,
            score: 0,
            total_cleared_lines: 0,
            level: 1,
            fall_interval: config.fall_curve.interval(1),
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
            play_time: Duration::ZERO,
        }
    }

    /// Returns every counter to its starting value; scoring rules are kept.
    pub fn reset(&mut self) {
        self.score = 0;
        self.total_cleared_lines = 0;
        self.level = 1;
        self.fall_interval = self.fall_curve.interval(1);
        self.completed_pieces = 0;
        self.line_cleared_counter = [0; 5];
        self.play_time = Duration::ZERO;
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Returns the time between automatic drops at the current level.
    #[must_use]
    pub const fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns a histogram of locks by rows cleared.
    ///
    /// Index `n` counts locks that cleared `n` rows; index 4 also absorbs
    /// the (non-standard) case of more than four.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Returns the time spent running (pauses excluded).
    #[must_use]
    pub const fn play_time(&self) -> Duration {
        self.play_time
    }

    pub(crate) fn add_play_time(&mut self, elapsed: Duration) {
        self.play_time = self.play_time.saturating_add(elapsed);
    }

    pub(crate) fn add_drop_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Updates statistics after a piece lock that cleared `cleared_lines` rows.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> LineClear {
        let bucket = cleared_lines.min(self.line_cleared_counter.len() - 1);
        let multiplier = u64::try_from(self.level).unwrap_or(u64::MAX);
        let score_delta = self.line_scores[bucket].saturating_mul(multiplier);

        self.completed_pieces += 1;
        self.line_cleared_counter[bucket] += 1;
        self.score = self.score.saturating_add(score_delta);
        self.total_cleared_lines += cleared_lines;

        let level = level_for_lines(self.total_cleared_lines, self.lines_per_level);
        let level_changed = level != self.level;
        if level_changed {
            self.level = level;
            self.fall_interval = self.fall_curve.interval(level);
        }

        LineClear {
            cleared_lines,
            score_delta,
            level,
            level_changed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> GameStats {
        GameStats::new(&EngineConfig::default())
    }

    #[test]
    fn test_initial_values() {
        let stats = stats();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.total_cleared_lines(), 0);
        assert_eq!(stats.fall_interval(), Duration::from_millis(800));
    }

    #[test]
    fn test_zero_line_lock_keeps_score() {
        let mut stats = stats();
        let clear = stats.complete_piece_drop(0);
        assert_eq!(clear.score_delta, 0);
        assert!(!clear.level_changed);
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.completed_pieces(), 1);
        assert_eq!(stats.line_cleared_counter(), &[1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_score_uses_level_before_clear() {
        let table = [0, 100, 300, 500, 800];
        let mut stats = stats();
        // Reach 9 lines at level 1.
        for _ in 0..3 {
            stats.complete_piece_drop(3);
        }
        assert_eq!(stats.score(), 3 * 500);
        assert_eq!(stats.level(), 1);

        // The double crossing 10 lines is still scored at level 1.
        let clear = stats.complete_piece_drop(2);
        assert_eq!(clear.score_delta, table[2]);
        assert!(clear.level_changed);
        assert_eq!(stats.level(), 2);
        assert_eq!(stats.fall_interval(), Duration::from_millis(730));

        // Now level 2 doubles the table.
        let before = stats.score();
        let clear = stats.complete_piece_drop(1);
        assert_eq!(clear.score_delta, table[1] * 2);
        assert_eq!(stats.score(), before + table[1] * 2);
    }

    #[test]
    fn test_level_and_interval_progression() {
        let mut stats = stats();
        for k in 1..=200 {
            stats.complete_piece_drop(1);
            let level = k / 10 + 1;
            assert_eq!(stats.level(), level);
            let expected = 800u64.saturating_sub((level as u64 - 1) * 70).max(120);
            assert_eq!(stats.fall_interval(), Duration::from_millis(expected));
        }
    }

    #[test]
    fn test_drop_score_and_reset() {
        let mut stats = stats();
        stats.add_drop_score(5);
        stats.complete_piece_drop(4);
        stats.add_play_time(Duration::from_secs(3));
        assert_eq!(stats.score(), 805);

        stats.reset();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.completed_pieces(), 0);
        assert_eq!(stats.play_time(), Duration::ZERO);
        assert_eq!(stats.level(), 1);
    }

    #[test]
    fn test_custom_lines_per_level() {
        let config = EngineConfig {
            lines_per_level: 2,
            ..EngineConfig::default()
        };
        let mut stats = GameStats::new(&config);
        stats.complete_piece_drop(4);
        assert_eq!(stats.level(), 3);
    }
}
