use std::iter;

use blockfall_engine::{ActivePiece, Block, PieceKind, Snapshot};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::{BlockDisplay, block_margin, cells_to_u16};

/// The playfield: locked blocks, the ghost, and the falling piece on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    cells: Vec<Vec<BlockDisplay>>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(snapshot: &Snapshot, show_ghost: bool) -> Self {
        Self {
            cells: board_cells(snapshot, show_ghost),
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn cols(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn width(&self) -> u16 {
        cells_to_u16(self.cols()) * BlockDisplay::width() + block_margin(self.block.as_ref()).0
    }

    pub fn height(&self) -> u16 {
        cells_to_u16(self.cells.len()) * BlockDisplay::height() + block_margin(self.block.as_ref()).1
    }
}

fn board_cells(snapshot: &Snapshot, show_ghost: bool) -> Vec<Vec<BlockDisplay>> {
    let mut cells: Vec<Vec<_>> = snapshot
        .grid
        .iter()
        .map(|row| {
            row.chars()
                .map(|c| {
                    let block = PieceKind::from_char(c).map_or(Block::Empty, Block::Piece);
                    BlockDisplay::from_block(block, true)
                })
                .collect()
        })
        .collect();

    if let Some(piece) = snapshot.falling_piece {
        if show_ghost && let Some(ghost_y) = snapshot.ghost_y {
            let ghost = piece.shifted(0, ghost_y - piece.y());
            paint(&mut cells, &ghost, BlockDisplay::ghost());
        }
        paint(&mut cells, &piece, BlockDisplay::piece(piece.kind()));
    }
    cells
}

fn paint(cells: &mut [Vec<BlockDisplay>], piece: &ActivePiece, display: BlockDisplay) {
    for (x, y) in piece.cells() {
        let cell = usize::try_from(x)
            .ok()
            .zip(usize::try_from(y).ok())
            .and_then(|(x, y)| cells.get_mut(y)?.get_mut(x));
        if let Some(cell) = cell {
            *cell = display;
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..self.cols()).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..self.cells.len()).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, &self.cells) {
            for (grid_cell, block_display) in iter::zip(grid_row, row) {
                block_display.render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{EngineConfig, GameSession, SequenceGenerator};

    use super::*;

    fn running_session() -> GameSession {
        let mut session = GameSession::with_generator(
            EngineConfig::default(),
            Box::new(SequenceGenerator::new([PieceKind::O])),
        )
        .unwrap();
        session.start();
        session
    }

    #[test]
    fn test_board_overlays_piece_and_ghost() {
        let session = running_session();
        let cells = board_cells(&session.snapshot(), true);

        assert_eq!(cells.len(), 20);
        assert_eq!(cells[0][4], BlockDisplay::piece(PieceKind::O));
        assert_eq!(cells[19][5], BlockDisplay::ghost());
        assert_eq!(cells[10][4], BlockDisplay::empty(true));
    }

    #[test]
    fn test_board_hides_ghost_on_request() {
        let session = running_session();
        let cells = board_cells(&session.snapshot(), false);
        assert_eq!(cells[19][5], BlockDisplay::empty(true));
    }

    #[test]
    fn test_board_draws_locked_blocks() {
        let mut session = running_session();
        session.hard_drop();
        let cells = board_cells(&session.snapshot(), true);
        assert_eq!(cells[19][4], BlockDisplay::piece(PieceKind::O));
        // New ghost rests on the locked piece.
        assert_eq!(cells[17][4], BlockDisplay::ghost());
    }

    #[test]
    fn test_board_size_follows_grid() {
        let config = EngineConfig {
            cols: 6,
            rows: 8,
            ..EngineConfig::default()
        };
        let session = GameSession::new(config).unwrap();
        let board = BoardDisplay::new(&session.snapshot(), true).block(BlockWidget::bordered());
        assert_eq!(board.width(), 6 * 2 + 2);
        assert_eq!(board.height(), 8 + 2);
    }
}
