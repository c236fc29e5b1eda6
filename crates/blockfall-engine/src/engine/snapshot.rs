use std::time::Duration;

use serde::Serialize;

use crate::{ActivePiece, PieceKind};

use super::game_session::{GameSession, SessionState};

/// Owned, serializable view of a session at one instant.
///
/// Renderers draw from it and the headless simulator prints it; neither
/// touches the session itself.
///
/// ```
/// use blockfall_engine::{EngineConfig, GameSession, PieceKind, SequenceGenerator};
///
/// let mut session = GameSession::with_generator(
///     EngineConfig::default(),
///     Box::new(SequenceGenerator::new([PieceKind::O])),
/// )?;
/// session.start();
/// session.hard_drop();
///
/// let snapshot = session.snapshot();
/// assert_eq!(snapshot.grid[19], "....OO....");
/// // The next O would land on top of the first.
/// assert_eq!(snapshot.ghost_y, Some(16));
///
/// let json = serde_json::to_value(&snapshot).unwrap();
/// assert_eq!(json["state"], "running");
/// assert_eq!(json["stats"]["level"], 1);
/// # Ok::<(), blockfall_engine::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub state: SessionState,
    /// Grid rows, top to bottom, one piece letter per cell and `.` for empty.
    pub grid: Vec<String>,
    pub falling_piece: Option<ActivePiece>,
    /// Anchor row the falling piece would land on.
    pub ghost_y: Option<i32>,
    pub next_piece: Option<PieceKind>,
    pub stats: StatsSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub score: u64,
    pub lines: usize,
    pub level: usize,
    pub fall_interval_ms: u64,
    pub completed_pieces: usize,
    pub line_cleared_counter: [usize; 5],
    pub play_time_ms: u64,
}

impl Snapshot {
    pub(crate) fn capture(session: &GameSession) -> Self {
        let stats = session.stats();
        Self {
            state: session.session_state(),
            grid: session
                .grid()
                .rows()
                .map(|row| row.iter().map(|block| block.as_char()).collect())
                .collect(),
            falling_piece: session.falling_piece().copied(),
            ghost_y: session.ghost_piece().map(|ghost| ghost.y()),
            next_piece: session.next_piece(),
            stats: StatsSnapshot {
                score: stats.score(),
                lines: stats.total_cleared_lines(),
                level: stats.level(),
                fall_interval_ms: duration_millis(stats.fall_interval()),
                completed_pieces: stats.completed_pieces(),
                line_cleared_counter: *stats.line_cleared_counter(),
                play_time_ms: duration_millis(stats.play_time()),
            },
        }
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
