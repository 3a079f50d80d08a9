//! Plain-text rendering of highlighted rows.

use crate::filters::FilterColumn;
use crate::highlight::Span;
use crate::projector::HighlightedRow;

/// How matched spans are emphasised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Bold yellow ANSI escape codes.
    Ansi,
    /// `[match]`
    Brackets,
}

impl Emphasis {
    fn wrap(self, text: &str) -> String {
        match self {
            Emphasis::Ansi => format!("\x1b[1;33m{text}\x1b[0m"),
            Emphasis::Brackets => format!("[{text}]"),
        }
    }
}

pub const EMPTY_MESSAGE: &str = "No clinics found.";
pub const LOADING_MESSAGE: &str = "Loading...";

const COLUMN_GAP: &str = "  ";

fn visible_width(spans: &[Span], emphasis: Emphasis) -> usize {
    let text: usize = spans.iter().map(|s| s.text.chars().count()).sum();
    let markers = match emphasis {
        Emphasis::Ansi => 0,
        Emphasis::Brackets => spans.iter().filter(|s| s.is_match).count() * 2,
    };
    text + markers
}

fn render_cell(spans: &[Span], emphasis: Emphasis) -> String {
    spans
        .iter()
        .map(|s| {
            if s.is_match {
                emphasis.wrap(&s.text)
            } else {
                s.text.clone()
            }
        })
        .collect()
}

/// Render rows as an aligned table with a header line.
pub fn render_table(rows: &[HighlightedRow], emphasis: Emphasis) -> String {
    if rows.is_empty() {
        return EMPTY_MESSAGE.to_owned();
    }

    let mut widths: Vec<usize> = FilterColumn::ALL
        .iter()
        .map(|c| c.header().chars().count())
        .collect();
    for row in rows {
        for (i, column) in FilterColumn::ALL.iter().enumerate() {
            widths[i] = widths[i].max(visible_width(row.cell(*column), emphasis));
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(
        FilterColumn::ALL
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c.header(), w = *w))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP)
            .trim_end()
            .to_owned(),
    );
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP),
    );

    for row in rows {
        let cells: Vec<String> = FilterColumn::ALL
            .iter()
            .zip(&widths)
            .map(|(column, width)| {
                let spans = row.cell(*column);
                let pad = width.saturating_sub(visible_width(spans, emphasis));
                format!("{}{}", render_cell(spans, emphasis), " ".repeat(pad))
            })
            .collect();
        lines.push(cells.join(COLUMN_GAP).trim_end().to_owned());
    }

    lines.join("\n")
}
