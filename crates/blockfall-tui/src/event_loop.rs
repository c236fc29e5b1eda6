use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::event::TuiEvent;

/// Schedules ticks and throttled redraws between terminal input events.
///
/// A redraw is due once something changed (a tick, input, or startup) and at
/// least `frame_interval` has passed since the previous one.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Duration,
    frame_interval: Duration,
    last_tick: Instant,
    last_render: Instant,
    dirty: bool,
}

impl EventLoop {
    pub(super) fn new(tick_interval: Duration, frame_interval: Duration) -> Self {
        Self::starting_at(Instant::now(), tick_interval, frame_interval)
    }

    fn starting_at(now: Instant, tick_interval: Duration, frame_interval: Duration) -> Self {
        Self {
            tick_interval,
            frame_interval,
            last_tick: now,
            // Draw the first frame immediately.
            last_render: now.checked_sub(frame_interval).unwrap_or(now),
            dirty: true,
        }
    }

    /// Blocks until a tick or redraw is due or terminal input arrives.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.due_event(now) {
                return Ok(event);
            }
            if event::poll(self.timeout(now))? {
                self.dirty = true;
                return Ok(event::read()?.into());
            }
        }
    }

    /// Returns the tick or redraw scheduled at or before `now`.
    ///
    /// A tick reports the real time since the previous tick, which exceeds the
    /// tick interval when the loop was held up.
    fn due_event(&mut self, now: Instant) -> Option<TuiEvent> {
        let since_tick = now.saturating_duration_since(self.last_tick);
        if since_tick >= self.tick_interval {
            self.last_tick = now;
            self.dirty = true;
            return Some(TuiEvent::Tick(since_tick));
        }

        if self.dirty && now.saturating_duration_since(self.last_render) >= self.frame_interval {
            self.last_render = now;
            self.dirty = false;
            return Some(TuiEvent::Render);
        }
        None
    }

    fn timeout(&self, now: Instant) -> Duration {
        let next_tick = self.last_tick + self.tick_interval;
        let wake_at = if self.dirty {
            next_tick.min(self.last_render + self.frame_interval)
        } else {
            next_tick
        };
        wake_at.saturating_duration_since(now)
    }
}
