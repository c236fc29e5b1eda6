//! Minimal terminal application runtime.
//!
//! Drives an [`App`] with fixed-rate ticks that carry the wall-clock time
//! since the previous tick, throttled redraws, and terminal input. Game logic
//! lives in the app; the runtime only schedules.

pub use self::{app::App, runtime::Runtime};

mod app;
mod event;
mod event_loop;
mod runtime;
