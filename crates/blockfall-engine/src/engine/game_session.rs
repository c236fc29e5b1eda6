use std::time::Duration;

use serde::Serialize;

use crate::{
    ConfigError,
    core::{
        grid::Grid,
        piece::{ActivePiece, PieceKind},
    },
};

use super::{
    config::EngineConfig,
    game_stats::GameStats,
    piece_generator::{PieceGenerator, PieceSeed},
    snapshot::Snapshot,
};

/// Horizontal nudges tried, in order, when committing a rotation.
const ROTATION_KICKS: [i32; 3] = [0, 1, -1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    /// Constructed, never started.
    Idle,
    Running,
    Paused,
    /// A spawned piece collided; only [`GameSession::start`] has effect.
    Over,
}

/// Result of a lock: the clear it produced and whether the next spawn failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    pub cleared_lines: usize,
    pub score_delta: u64,
    pub level: usize,
    pub level_changed: bool,
    pub game_over: bool,
}

/// Result of a one-row descent attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    Moved,
    Locked(LockOutcome),
}

/// A complete single-player game.
///
/// Owns the grid, the falling piece, the queued next piece, the generator,
/// the statistics and the run state. Every mutation goes through a method on
/// this type; observers read [`GameSession::snapshot`] or the accessors.
///
/// Control commands only act while the session is [`SessionState::Running`]
/// and are silently ignored otherwise. Blocked moves are ignored too: the
/// returned `bool`/`Option` tells callers what happened but nothing fails.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{EngineConfig, GameSession, PieceKind, SequenceGenerator};
///
/// let mut session = GameSession::with_generator(
///     EngineConfig::default(),
///     Box::new(SequenceGenerator::new([PieceKind::O])),
/// )?;
/// session.start();
///
/// session.move_left();
/// session.rotate();
/// let outcome = session.hard_drop().unwrap();
/// assert_eq!(outcome.cleared_lines, 0);
///
/// // The scheduler advances time; gravity drops the new piece one row.
/// assert!(session.tick(Duration::from_millis(801)).unwrap().is_moved());
/// # Ok::<(), blockfall_engine::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct GameSession {
    config: EngineConfig,
    grid: Grid,
    falling_piece: Option<ActivePiece>,
    next_piece: Option<PieceKind>,
    generator: Box<dyn PieceGenerator>,
    stats: GameStats,
    session_state: SessionState,
    drop_timer: Duration,
}

impl GameSession {
    /// Creates an idle session whose generator is seeded randomly.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, PieceSeed::random())
    }

    /// Like [`Self::new`], but with a fixed seed for a reproducible piece sequence.
    pub fn with_seed(config: EngineConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        let generator = config.generator.build(seed);
        Self::with_generator(config, generator)
    }

    /// Creates an idle session drawing pieces from `generator`.
    pub fn with_generator(
        config: EngineConfig,
        generator: Box<dyn PieceGenerator>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            grid: Grid::new(config.cols, config.rows),
            stats: GameStats::new(&config),
            config,
            falling_piece: None,
            next_piece: None,
            generator,
            session_state: SessionState::Idle,
            drop_timer: Duration::ZERO,
        })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// Returns the falling piece; `None` only before the first start.
    #[must_use]
    pub fn falling_piece(&self) -> Option<&ActivePiece> {
        self.falling_piece.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next_piece
    }

    /// Returns where the falling piece would rest if hard-dropped now.
    #[must_use]
    pub fn ghost_piece(&self) -> Option<ActivePiece> {
        self.falling_piece.map(|piece| self.drop_position(piece))
    }

    /// Captures the observable state for renderers and logs.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Starts a fresh game from any state.
    ///
    /// Clears the grid and statistics, fills the next slot, and spawns the
    /// first piece.
    pub fn start(&mut self) {
        self.grid.reset();
        self.stats.reset();
        self.drop_timer = Duration::ZERO;
        self.next_piece = Some(self.generator.next_kind());
        self.session_state = SessionState::Running;
        self.spawn_next();
    }

    /// Switches between running and paused; no effect when idle or over.
    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Running => SessionState::Paused,
            SessionState::Paused => SessionState::Running,
            state @ (SessionState::Idle | SessionState::Over) => state,
        };
    }

    pub fn pause(&mut self) {
        if self.session_state.is_running() {
            self.session_state = SessionState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.session_state.is_paused() {
            self.session_state = SessionState::Running;
        }
    }

    /// Returns whether control commands are accepted right now.
    #[must_use]
    pub fn can_control(&self) -> bool {
        self.session_state.is_running()
    }

    pub fn move_left(&mut self) -> bool {
        self.try_shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_shift(1)
    }

    /// Rotates clockwise, nudging one column right, then one left, if needed.
    pub fn rotate(&mut self) -> bool {
        let Some(piece) = self.controllable_piece() else {
            return false;
        };
        let rotated = piece.rotated();
        let kicked = ROTATION_KICKS
            .iter()
            .map(|&dx| rotated.shifted(dx, 0))
            .find(|candidate| !self.grid.collides(candidate));
        match kicked {
            Some(candidate) => {
                self.falling_piece = Some(candidate);
                true
            }
            None => false,
        }
    }

    /// Moves the piece down one row, locking it if it cannot move.
    ///
    /// Also restarts the gravity timer.
    pub fn soft_drop(&mut self) -> Option<DropOutcome> {
        let piece = self.controllable_piece()?;
        self.drop_timer = Duration::ZERO;
        Some(self.step_down(piece))
    }

    /// Drops the piece as far as it goes and locks it.
    ///
    /// Also restarts the gravity timer.
    pub fn hard_drop(&mut self) -> Option<LockOutcome> {
        let piece = self.controllable_piece()?;
        let landed = self.drop_position(piece);
        let rows = u64::from((landed.y() - piece.y()).unsigned_abs());
        self.stats
            .add_drop_score(rows.saturating_mul(self.config.hard_drop_score_per_row));
        self.drop_timer = Duration::ZERO;
        Some(self.lock(landed))
    }

    /// Advances the clock by `elapsed`.
    ///
    /// Time only accumulates while running. Once the accumulated time exceeds
    /// the current fall interval, the piece soft-drops and the accumulator
    /// restarts from zero.
    pub fn tick(&mut self, elapsed: Duration) -> Option<DropOutcome> {
        let piece = self.controllable_piece()?;
        self.stats.add_play_time(elapsed);
        self.drop_timer = self.drop_timer.saturating_add(elapsed);
        if self.drop_timer <= self.stats.fall_interval() {
            return None;
        }
        self.drop_timer = Duration::ZERO;
        Some(self.step_down(piece))
    }

    fn controllable_piece(&self) -> Option<ActivePiece> {
        self.falling_piece.filter(|_| self.can_control())
    }

    fn try_shift(&mut self, dx: i32) -> bool {
        let Some(piece) = self.controllable_piece() else {
            return false;
        };
        let candidate = piece.shifted(dx, 0);
        if self.grid.collides(&candidate) {
            return false;
        }
        self.falling_piece = Some(candidate);
        true
    }

    fn step_down(&mut self, piece: ActivePiece) -> DropOutcome {
        let candidate = piece.down();
        if self.grid.collides(&candidate) {
            return DropOutcome::Locked(self.lock(piece));
        }
        self.falling_piece = Some(candidate);
        self.stats.add_drop_score(self.config.soft_drop_score);
        DropOutcome::Moved
    }

    fn drop_position(&self, piece: ActivePiece) -> ActivePiece {
        let mut dropped = piece;
        while !self.grid.collides(&dropped.down()) {
            dropped = dropped.down();
        }
        dropped
    }

    fn lock(&mut self, piece: ActivePiece) -> LockOutcome {
        self.grid.merge(&piece);
        let cleared_lines = self.grid.sweep_rows();
        let clear = self.stats.complete_piece_drop(cleared_lines);
        let spawned = self.spawn_next();
        LockOutcome {
            cleared_lines: clear.cleared_lines,
            score_delta: clear.score_delta,
            level: clear.level,
            level_changed: clear.level_changed,
            game_over: !spawned,
        }
    }

    /// Promotes the queued piece to the falling piece and refills the queue.
    ///
    /// Returns `false` and ends the game if the new piece collides at spawn.
    fn spawn_next(&mut self) -> bool {
        let kind = self
            .next_piece
            .replace(self.generator.next_kind())
            .unwrap_or_else(|| self.generator.next_kind());
        let piece = ActivePiece::spawn(kind, self.grid.width());
        self.falling_piece = Some(piece);
        if self.grid.collides(&piece) {
            self.session_state = SessionState::Over;
            return false;
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }
}

#[cfg(test)]
mod tests {
    use crate::{Block, SequenceGenerator};

    use super::*;

    fn session_with(kinds: &[PieceKind]) -> GameSession {
        let mut session = GameSession::with_generator(
            EngineConfig::default(),
            Box::new(SequenceGenerator::new(kinds.iter().copied())),
        )
        .unwrap();
        session.start();
        session
    }

    fn row_string(session: &GameSession, y: usize) -> String {
        session.grid().rows().nth(y).unwrap().iter().map(|b| b.as_char()).collect()
    }

    fn occupied(session: &GameSession) -> usize {
        session.grid().rows().flatten().filter(|b| !b.is_empty()).count()
    }

    #[test]
    fn test_new_session_is_idle_and_ignores_controls() {
        let mut session = GameSession::new(EngineConfig::default()).unwrap();
        assert!(session.session_state().is_idle());
        assert!(session.falling_piece().is_none());
        assert!(!session.move_left());
        assert!(!session.rotate());
        assert_eq!(session.soft_drop(), None);
        assert_eq!(session.hard_drop(), None);
        assert_eq!(session.tick(Duration::from_secs(5)), None);
        session.toggle_pause();
        assert!(session.session_state().is_idle());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            cols: 2,
            ..EngineConfig::default()
        };
        assert!(GameSession::new(config).is_err());
    }

    #[test]
    fn test_start_spawns_current_and_next() {
        let session = session_with(&[PieceKind::T, PieceKind::I, PieceKind::S]);
        let piece = session.falling_piece().unwrap();
        assert_eq!(piece.kind(), PieceKind::T);
        assert_eq!((piece.x(), piece.y()), (3, 0));
        assert_eq!(session.next_piece(), Some(PieceKind::I));
        assert!(session.session_state().is_running());
    }

    #[test]
    fn test_hard_drop_o_piece_on_empty_grid() {
        let mut session = session_with(&[PieceKind::O]);
        let outcome = session.hard_drop().unwrap();

        assert_eq!(outcome.cleared_lines, 0);
        assert!(!outcome.game_over);
        assert_eq!(row_string(&session, 18), "....OO....");
        assert_eq!(row_string(&session, 19), "....OO....");
        assert_eq!(occupied(&session), 4);
        assert_eq!(session.stats().score(), 0);
        assert_eq!(session.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_moves_are_blocked_by_walls() {
        let mut session = session_with(&[PieceKind::O]);
        for _ in 0..4 {
            assert!(session.move_left());
        }
        assert!(!session.move_left());
        assert_eq!(session.falling_piece().unwrap().x(), 0);
        for _ in 0..8 {
            assert!(session.move_right());
        }
        assert!(!session.move_right());
        assert_eq!(session.falling_piece().unwrap().x(), 8);
    }

    #[test]
    fn test_rotate_in_open_space_keeps_anchor() {
        let mut session = session_with(&[PieceKind::T]);
        let before = *session.falling_piece().unwrap();
        assert!(session.rotate());
        let after = *session.falling_piece().unwrap();
        assert_eq!((after.x(), after.y()), (before.x(), before.y()));
        assert_eq!(*after.shape(), before.shape().rotated_clockwise());
    }

    #[test]
    fn test_rotate_kicks_right_off_left_wall() {
        let mut session = session_with(&[PieceKind::T]);
        // Upright T with its stem against the left wall.
        assert!(session.rotate());
        while session.move_left() {}
        assert_eq!(session.falling_piece().unwrap().x(), -1);

        // The downward T needs column -1 unshifted; the +1 kick fits.
        assert!(session.rotate());
        assert_eq!(session.falling_piece().unwrap().x(), 0);
    }

    #[test]
    fn test_rotate_against_wall_fails_when_kicks_fall_short() {
        let mut session = session_with(&[PieceKind::I]);
        assert!(session.rotate());
        while session.move_left() {}
        let vertical = *session.falling_piece().unwrap();
        assert_eq!(vertical.x(), -2);

        assert!(!session.rotate());
        assert_eq!(*session.falling_piece().unwrap(), vertical);
    }

    #[test]
    fn test_rotate_kick_order_prefers_right() {
        let mut session = session_with(&[PieceKind::T]);
        // T spawn at x=3 covers columns 3..=5. Block the rotated T's stem cell
        // at (4, 2) only for the unshifted candidate.
        session.grid_mut().set_block(4, 2, Block::Piece(PieceKind::Z));
        assert!(session.rotate());
        assert_eq!(session.falling_piece().unwrap().x(), 4);
    }

    #[test]
    fn test_rotate_kick_falls_back_to_left() {
        let mut session = session_with(&[PieceKind::T]);
        session.grid_mut().set_block(4, 2, Block::Piece(PieceKind::Z));
        session.grid_mut().set_block(5, 2, Block::Piece(PieceKind::Z));
        assert!(session.rotate());
        assert_eq!(session.falling_piece().unwrap().x(), 2);
    }

    #[test]
    fn test_rotate_fails_when_all_kicks_collide() {
        let mut session = session_with(&[PieceKind::T]);
        for x in 3..=5 {
            session.grid_mut().set_block(x, 2, Block::Piece(PieceKind::Z));
        }
        let before = *session.falling_piece().unwrap();
        assert!(!session.rotate());
        assert_eq!(*session.falling_piece().unwrap(), before);
    }

    #[test]
    fn test_soft_drop_scores_then_locks() {
        let mut session = session_with(&[PieceKind::O, PieceKind::T]);
        for step in 1..=18 {
            assert_eq!(session.soft_drop(), Some(DropOutcome::Moved));
            assert_eq!(session.stats().score(), step);
        }
        let Some(DropOutcome::Locked(outcome)) = session.soft_drop() else {
            panic!("expected lock");
        };
        assert_eq!(outcome.cleared_lines, 0);
        assert_eq!(session.stats().score(), 18);
        assert_eq!(session.falling_piece().unwrap().kind(), PieceKind::T);
        assert_eq!(session.next_piece(), Some(PieceKind::O));
    }

    #[test]
    fn test_filling_gap_clears_one_row() {
        // Two I pieces cover columns 0-3 and 6-9; an O fills 4-5.
        let mut session = session_with(&[PieceKind::I, PieceKind::I, PieceKind::O]);
        for _ in 0..3 {
            assert!(session.move_left());
        }
        session.hard_drop().unwrap();
        for _ in 0..3 {
            assert!(session.move_right());
        }
        session.hard_drop().unwrap();
        assert_eq!(row_string(&session, 19), "IIII..IIII");

        let outcome = session.hard_drop().unwrap();
        assert_eq!(outcome.cleared_lines, 1);
        assert_eq!(outcome.score_delta, 100);
        assert_eq!(session.stats().total_cleared_lines(), 1);
        assert_eq!(session.stats().level(), 1);
        assert_eq!(session.stats().score(), 100);
        assert_eq!(row_string(&session, 19), "....OO....");
        assert_eq!(row_string(&session, 18), "..........");
    }

    #[test]
    fn test_spawn_collision_ends_game() {
        let mut session = session_with(&[PieceKind::O]);
        let mut last = None;
        for _ in 0..10 {
            last = session.hard_drop();
        }
        assert!(last.unwrap().game_over);
        assert!(session.session_state().is_over());

        let grid_before = session.grid().clone();
        let piece_before = *session.falling_piece().unwrap();
        assert!(!session.move_left());
        assert!(!session.move_right());
        assert!(!session.rotate());
        assert_eq!(session.soft_drop(), None);
        assert_eq!(session.hard_drop(), None);
        assert_eq!(session.tick(Duration::from_secs(10)), None);
        session.toggle_pause();
        assert!(session.session_state().is_over());
        assert_eq!(session.grid(), &grid_before);
        assert_eq!(*session.falling_piece().unwrap(), piece_before);

        session.start();
        assert!(session.session_state().is_running());
        assert!(session.grid().is_empty());
        assert_eq!(session.stats().completed_pieces(), 0);
    }

    #[test]
    fn test_start_restarts_running_and_paused_games() {
        let mut session = session_with(&[PieceKind::O]);
        for pause in [false, true] {
            session.hard_drop();
            session.soft_drop();
            session.tick(Duration::from_millis(300));
            assert!(!session.grid().is_empty());
            assert!(session.stats().score() > 0);
            if pause {
                session.pause();
                assert!(session.session_state().is_paused());
            }

            session.start();
            assert!(session.session_state().is_running());
            assert!(session.grid().is_empty());
            assert_eq!(session.stats().score(), 0);
            assert_eq!(session.stats().completed_pieces(), 0);
            assert_eq!(session.stats().play_time(), Duration::ZERO);
            assert_eq!(session.falling_piece().unwrap().y(), 0);
        }
    }

    #[test]
    fn test_pause_freezes_controls_and_clock() {
        let mut session = session_with(&[PieceKind::T]);
        session.pause();
        assert!(session.session_state().is_paused());
        assert!(!session.move_left());
        assert_eq!(session.tick(Duration::from_secs(10)), None);
        assert_eq!(session.falling_piece().unwrap().y(), 0);

        session.resume();
        assert!(session.session_state().is_running());
        // Paused time was not accumulated.
        assert_eq!(session.tick(Duration::from_millis(10)), None);

        session.toggle_pause();
        assert!(session.session_state().is_paused());
        session.toggle_pause();
        assert!(session.session_state().is_running());
    }

    #[test]
    fn test_tick_drops_after_interval_is_exceeded() {
        let mut session = session_with(&[PieceKind::T]);
        assert_eq!(session.tick(Duration::from_millis(500)), None);
        assert_eq!(session.tick(Duration::from_millis(300)), None);
        assert_eq!(session.tick(Duration::from_millis(1)), Some(DropOutcome::Moved));
        assert_eq!(session.falling_piece().unwrap().y(), 1);
        // Accumulator restarted from zero.
        assert_eq!(session.tick(Duration::from_millis(800)), None);
        assert_eq!(session.stats().play_time(), Duration::from_millis(1601));
    }

    #[test]
    fn test_manual_drop_restarts_gravity_timer() {
        let mut session = session_with(&[PieceKind::T]);
        assert_eq!(session.tick(Duration::from_millis(700)), None);
        session.soft_drop();
        assert_eq!(session.tick(Duration::from_millis(700)), None);
        assert_eq!(session.falling_piece().unwrap().y(), 1);
    }

    #[test]
    fn test_ghost_tracks_landing_row() {
        let mut session = session_with(&[PieceKind::I]);
        let ghost = session.ghost_piece().unwrap();
        // Horizontal I occupies local row 1.
        assert_eq!(ghost.y(), 18);
        assert_eq!(ghost.x(), session.falling_piece().unwrap().x());

        session.grid_mut().set_block(4, 10, Block::Piece(PieceKind::Z));
        assert_eq!(session.ghost_piece().unwrap().y(), 8);
    }

    #[test]
    fn test_hard_drop_bonus_is_configurable() {
        let config = EngineConfig {
            hard_drop_score_per_row: 2,
            ..EngineConfig::default()
        };
        let mut session =
            GameSession::with_generator(config, Box::new(SequenceGenerator::new([PieceKind::O])))
                .unwrap();
        session.start();
        session.hard_drop().unwrap();
        assert_eq!(session.stats().score(), 18 * 2);
    }

    #[test]
    fn test_seeded_sessions_match() {
        let seed = PieceSeed::random();
        let mut a = GameSession::with_seed(EngineConfig::default(), seed).unwrap();
        let mut b = GameSession::with_seed(EngineConfig::default(), seed).unwrap();
        a.start();
        b.start();
        for _ in 0..30 {
            if a.session_state().is_over() {
                break;
            }
            assert_eq!(a.snapshot(), b.snapshot());
            a.hard_drop();
            b.hard_drop();
        }
    }
}
