use std::iter;

use blockfall_engine::Snapshot;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{block_margin, cells_to_u16, palette};

pub struct SessionStatsDisplay<'a> {
    snapshot: &'a Snapshot,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            snapshot,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + block_margin(self.block.as_ref()).0
    }

    pub fn height(&self) -> u16 {
        cells_to_u16(ROWS.len()) + block_margin(self.block.as_ref()).1
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&Snapshot) -> String),
    LabelValue(&'static str, &'static dyn Fn(&Snapshot) -> String),
}

fn format_play_time(millis: u64) -> String {
    let secs = millis / 1000;
    format!("{}:{:0>2}.{:0>2}", secs / 60, secs % 60, (millis % 1000) / 10)
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|snapshot| snapshot.stats.score.to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(&|snapshot| format_play_time(snapshot.stats.play_time_ms)),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|snapshot| snapshot.stats.level.to_string()),
    Row::LabelValue("LINES:", &|snapshot| snapshot.stats.lines.to_string()),
    Row::LabelValue("SPEED:", &|snapshot| {
        format!("{}ms", snapshot.stats.fall_interval_ms)
    }),
    Row::Empty,
    Row::LabelValue("PIECES:", &|snapshot| {
        snapshot.stats.completed_pieces.to_string()
    }),
    Row::LabelValue("SINGLES:", &|snapshot| {
        snapshot.stats.line_cleared_counter[1].to_string()
    }),
    Row::LabelValue("DOUBLES:", &|snapshot| {
        snapshot.stats.line_cleared_counter[2].to_string()
    }),
    Row::LabelValue("TRIPLES:", &|snapshot| {
        snapshot.stats.line_cleared_counter[3].to_string()
    }),
    Row::LabelValue("QUADS:", &|snapshot| {
        snapshot.stats.line_cleared_counter[4].to_string()
    }),
];

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = palette::TEXT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.snapshot), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.snapshot), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
