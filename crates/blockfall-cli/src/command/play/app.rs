use std::time::Duration;

use blockfall_engine::{GameSession, SessionState};
use blockfall_tui::App;
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};

use crate::ui::widgets::SessionDisplay;

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    show_ghost: bool,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession, show_ghost: bool) -> Self {
        Self {
            session,
            show_ghost,
            is_exiting: false,
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => _ = self.session.move_left(),
            KeyCode::Right => _ = self.session.move_right(),
            KeyCode::Up => _ = self.session.rotate(),
            KeyCode::Down => _ = self.session.soft_drop(),
            KeyCode::Char(' ') => _ = self.session.hard_drop(),
            KeyCode::Char('p') => self.session.toggle_pause(),
            KeyCode::Enter => self.session.start(),
            KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
            _ => {}
        }
    }
}

impl App for PlayApp {
    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, event: Event) {
        if let Some(key) = event.as_key_press_event() {
            self.handle_key(key.code);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.session.snapshot();
        let session_display = SessionDisplay::new(&snapshot, self.show_ghost);
        let help_text = match snapshot.state {
            SessionState::Running => {
                "Controls: ← → (Move) | ↑ (Rotate) | ↓ (Soft Drop) | Space (Hard Drop) | P (Pause) | Q (Quit)"
            }
            SessionState::Paused => "Controls: P (Resume) | Enter (Restart) | Q (Quit)",
            SessionState::Idle => "Controls: Enter (Start) | Q (Quit)",
            SessionState::Over => "Controls: Enter (Restart) | Q (Quit)",
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, elapsed: Duration) {
        self.session.tick(elapsed);
    }
}
