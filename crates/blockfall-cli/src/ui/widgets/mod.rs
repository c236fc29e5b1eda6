use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    block_display::*, board_display::*, piece_display::*, session_display::*,
    session_stats_display::*,
};

mod block_display;
mod board_display;
mod piece_display;
mod session_display;
mod session_stats_display;

mod palette {
    use blockfall_engine::PieceKind;
    use ratatui::style::{Color, Style};

    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);

    pub const TEXT: Style = Style::new().fg(WHITE).bg(BLACK);
    pub const EMPTY: Style = Style::new().fg(BLACK).bg(BLACK);
    pub const GRID_DOT: Style = Style::new().fg(GRAY).bg(BLACK);

    /// Solid two-column fill for a locked or falling cell.
    pub const fn piece(kind: PieceKind) -> Style {
        let color = match kind {
            PieceKind::I => Color::Rgb(0, 255, 255),
            PieceKind::O => YELLOW,
            PieceKind::S => Color::Rgb(0, 255, 0),
            PieceKind::Z => RED,
            PieceKind::J => Color::Rgb(0, 0, 255),
            PieceKind::L => Color::Rgb(255, 127, 0),
            PieceKind::T => Color::Rgb(255, 0, 255),
        };
        Style::new().fg(color).bg(color)
    }
}

/// Columns and rows taken by `block`'s borders and padding.
fn block_margin(block: Option<&BlockWidget>) -> (u16, u16) {
    let outer = Rect::new(0, 0, 100, 100);
    let inner = block.map_or(outer, |block| block.inner(outer));
    (outer.width - inner.width, outer.height - inner.height)
}

/// Converts a cell count to terminal units, saturating on absurd sizes.
fn cells_to_u16(cells: usize) -> u16 {
    u16::try_from(cells).unwrap_or(u16::MAX)
}
