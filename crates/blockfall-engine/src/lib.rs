pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Construction constants that cannot drive a playable session.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("grid must be between {min}x{min} and {max}x{max} cells, got {cols}x{rows}")]
    GridSize {
        cols: usize,
        rows: usize,
        min: usize,
        max: usize,
    },
    #[display("cell size must be positive")]
    ZeroCellSize,
    #[display("fall interval must be positive")]
    ZeroFallInterval,
    #[display("minimum fall interval ({min_ms} ms) exceeds base interval ({base_ms} ms)")]
    InvertedFallCurve { min_ms: u64, base_ms: u64 },
    #[display("line score table must start at 0 and strictly increase, got {table:?}")]
    LineScoreTable { table: [u64; 5] },
    #[display("lines per level must be positive")]
    ZeroLinesPerLevel,
}

/// Failure to parse a [`PieceSeed`] from its hex form.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: {reason}")]
pub struct ParseSeedError {
    #[error(not(source))]
    reason: String,
}

impl ParseSeedError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
