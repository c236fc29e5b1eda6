//! Game rules and session state.
//!
//! This module builds a playable game on top of the [`core`](crate::core)
//! data structures:
//!
//! - [`GameSession`] - the state machine: falling piece, next piece, clock, run state
//! - [`GameStats`] - score, cleared lines, level and fall interval
//! - [`EngineConfig`] - construction-time constants with classic defaults
//! - [`PieceGenerator`] - pluggable source of upcoming pieces
//! - [`Snapshot`] - serializable read model for renderers
//!
//! # Game Flow
//!
//! 1. Build a [`GameSession`] from an [`EngineConfig`] and call
//!    [`GameSession::start`]
//! 2. Forward player commands (move, rotate, soft drop, hard drop)
//! 3. Call [`GameSession::tick`] with the elapsed time; gravity drops the
//!    piece once per fall interval
//! 4. A piece that cannot descend locks, full rows clear, and the next piece
//!    spawns
//! 5. The game ends when a freshly spawned piece collides
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{EngineConfig, GameSession, PieceSeed};
//!
//! let seed: PieceSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
//! let mut session = GameSession::with_seed(EngineConfig::default(), seed)?;
//! session.start();
//!
//! while !session.session_state().is_over() {
//!     session.rotate();
//!     session.move_left();
//!     session.tick(Duration::from_millis(16));
//!     session.hard_drop();
//! }
//!
//! assert!(session.stats().completed_pieces() > 0);
//! # Ok::<(), blockfall_engine::ConfigError>(())
//! ```

pub use self::{config::*, game_session::*, game_stats::*, piece_generator::*, snapshot::*};

mod config;
mod game_session;
mod game_stats;
mod piece_generator;
mod snapshot;
