//! Terminal rendering of the insights aggregates. Every function returns the text instead of
//! printing so it can be checked without a terminal.

pub mod charts;
pub mod heatmap;

use ansi_term::Colour;

use crate::{history::entities::Status, insights::series::PointStatus};

/// Painting is skipped for plain output (tests, `--plain`, piping into files).
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub colored: bool,
}

impl Palette {
    pub fn paint(&self, status: PointStatus, text: &str) -> String {
        if !self.colored {
            return text.to_string();
        }
        let colour = match status {
            PointStatus::None => Colour::Fixed(238),
            PointStatus::Green => Colour::Green,
            PointStatus::Blue => Colour::Blue,
            PointStatus::Red => Colour::Red,
        };
        colour.paint(text).to_string()
    }

    pub fn paint_status(&self, status: Status, text: &str) -> String {
        self.paint(point_status(status), text)
    }
}

pub fn point_status(status: Status) -> PointStatus {
    match status {
        Status::Green => PointStatus::Green,
        Status::Blue => PointStatus::Blue,
        Status::Red => PointStatus::Red,
    }
}

/// Glyph for a calendar square when colors are off.
pub fn status_glyph(status: PointStatus) -> &'static str {
    match status {
        PointStatus::None => "·",
        PointStatus::Green => "G",
        PointStatus::Blue => "B",
        PointStatus::Red => "R",
    }
}
