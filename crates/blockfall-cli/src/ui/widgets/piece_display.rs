use blockfall_engine::PieceKind;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{BlockDisplay, block_margin, cells_to_u16};

/// A preview of one piece in its spawn orientation.
#[derive(Debug)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self {
            piece: None,
            block: None,
        }
    }

    pub fn piece(self, piece: PieceKind) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * BlockDisplay::width() + block_margin(self.block.as_ref()).0
    }

    pub fn height(&self) -> u16 {
        2 * BlockDisplay::height() + block_margin(self.block.as_ref()).1
    }
}

/// Occupancy of `kind`'s spawn shape cropped to its occupied rows and columns.
fn preview_cells(kind: PieceKind) -> Vec<Vec<bool>> {
    let shape = kind.template();
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (usize::MAX, 0, usize::MAX, 0);
    for (x, y) in shape.occupied_cells() {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    (min_y..=max_y)
        .map(|y| (min_x..=max_x).map(|x| shape.is_occupied(x, y)).collect())
        .collect()
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let empty_block = BlockDisplay::empty(false);
        let Some(piece) = self.piece else {
            Widget::render(&empty_block, area, buf);
            return;
        };

        let cells = preview_cells(piece);
        let piece_width = cells_to_u16(cells.first().map_or(0, Vec::len));
        let piece_height = cells_to_u16(cells.len());
        let piece_area = area.centered(
            Constraint::Length(piece_width * BlockDisplay::width()),
            Constraint::Length(piece_height * BlockDisplay::height()),
        );

        let col_constraints = (0..piece_width).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..piece_height).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let occupied_block = BlockDisplay::piece(piece);
        for (grid_row, row) in grid_rows.zip(&cells) {
            for (grid_cell, &occupied) in grid_row.into_iter().zip(row) {
                if occupied {
                    Widget::render(&occupied_block, grid_cell, buf);
                } else {
                    Widget::render(&empty_block, grid_cell, buf);
                }
            }
        }
    }
}
