use std::{io, time::Duration};

use crate::{App, event::TuiEvent, event_loop::EventLoop};

/// Runs an [`App`] at a fixed tick rate with redraws capped at a frame rate.
#[derive(Debug)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    /// Creates a runtime ticking `tick_rate` times per second and redrawing
    /// at most `frame_rate` times per second.
    #[must_use]
    pub fn new(tick_rate: f64, frame_rate: f64) -> Self {
        Self {
            events: EventLoop::new(rate_to_interval(tick_rate), rate_to_interval(frame_rate)),
        }
    }

    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick(elapsed) => app.update(elapsed),
                    TuiEvent::Render => {
                        terminal.draw(|f| app.draw(f))?;
                    }
                    TuiEvent::Input(event) => app.handle_event(event),
                }
            }
            Ok(())
        })
    }
}

fn rate_to_interval(rate: f64) -> Duration {
    Duration::try_from_secs_f64(rate.recip()).unwrap_or(Duration::ZERO)
}
