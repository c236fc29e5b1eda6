use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Smallest grid edge; every piece template must fit at spawn.
pub const MIN_GRID_SIZE: usize = 4;
/// Largest grid edge.
pub const MAX_GRID_SIZE: usize = 255;

/// Construction-time constants of a game session.
///
/// Every field has a default matching the classic 10×20 rules, so a
/// configuration file only needs to list what it changes:
///
/// ```
/// use blockfall_engine::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "cols": 12 }"#).unwrap();
/// assert_eq!(config.cols, 12);
/// assert_eq!(config.rows, 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Number of grid columns.
    pub cols: usize,
    /// Number of grid rows.
    pub rows: usize,
    /// Edge length of one cell for pixel renderers. The engine never reads it.
    pub cell_size: u32,
    /// Gravity speed curve.
    pub fall_curve: FallCurve,
    /// Base points for clearing 0, 1, 2, 3 and 4 rows at once, multiplied by the level.
    pub line_scores: [u64; 5],
    /// Cleared rows needed per level.
    pub lines_per_level: usize,
    /// Points for each successful soft-drop step, manual or automatic.
    pub soft_drop_score: u64,
    /// Points per row descended by a hard drop.
    pub hard_drop_score_per_row: u64,
    /// Piece selection policy.
    pub generator: GeneratorKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cols: 10,
            rows: 20,
            cell_size: 24,
            fall_curve: FallCurve::default(),
            line_scores: [0, 100, 300, 500, 800],
            lines_per_level: 10,
            soft_drop_score: 1,
            hard_drop_score_per_row: 0,
            generator: GeneratorKind::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size_range = MIN_GRID_SIZE..=MAX_GRID_SIZE;
        if !size_range.contains(&self.cols) || !size_range.contains(&self.rows) {
            return Err(ConfigError::GridSize {
                cols: self.cols,
                rows: self.rows,
                min: MIN_GRID_SIZE,
                max: MAX_GRID_SIZE,
            });
        }
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        self.fall_curve.validate()?;
        let table = self.line_scores;
        if table[0] != 0 || table.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::LineScoreTable { table });
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        Ok(())
    }
}

/// Gravity speed curve: `max(min, base - (level - 1) * step)` milliseconds per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FallCurve {
    pub base_ms: u64,
    pub min_ms: u64,
    pub step_ms: u64,
}

impl Default for FallCurve {
    fn default() -> Self {
        Self {
            base_ms: 800,
            min_ms: 120,
            step_ms: 70,
        }
    }
}

impl FallCurve {
    /// Returns the fall interval at `level` (1-based).
    ///
    /// ```
    /// use std::time::Duration;
    ///
    /// use blockfall_engine::FallCurve;
    ///
    /// let curve = FallCurve::default();
    /// assert_eq!(curve.interval(1), Duration::from_millis(800));
    /// assert_eq!(curve.interval(2), Duration::from_millis(730));
    /// assert_eq!(curve.interval(11), Duration::from_millis(120));
    /// ```
    #[must_use]
    pub fn interval(&self, level: usize) -> Duration {
        let steps = u64::try_from(level.saturating_sub(1)).unwrap_or(u64::MAX);
        let millis = self
            .base_ms
            .saturating_sub(steps.saturating_mul(self.step_ms))
            .max(self.min_ms);
        Duration::from_millis(millis)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_ms == 0 {
            return Err(ConfigError::ZeroFallInterval);
        }
        if self.min_ms > self.base_ms {
            return Err(ConfigError::InvertedFallCurve {
                min_ms: self.min_ms,
                base_ms: self.base_ms,
            });
        }
        Ok(())
    }
}

/// Piece selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorKind {
    /// Each piece drawn independently and uniformly.
    #[default]
    Uniform,
    /// Shuffled bags of all seven kinds.
    Bag,
}
