use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

/// Application driven by [`Runtime::run`](crate::Runtime::run).
pub trait App {
    fn should_exit(&self) -> bool;

    /// Handles terminal input. Resize events only mark the screen dirty.
    fn handle_event(&mut self, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances app logic by the wall-clock time since the previous tick.
    fn update(&mut self, elapsed: Duration);
}
