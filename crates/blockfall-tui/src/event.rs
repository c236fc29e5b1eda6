use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub(super) enum TuiEvent {
    #[from(ignore)]
    Tick(Duration),
    Render,
    Input(CrosstermEvent),
}
