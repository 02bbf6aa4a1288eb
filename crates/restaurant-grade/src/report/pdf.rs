//! Single-page US-letter report: title, Field/Value table, recommendation.
//!
//! Only the base-14 Helvetica faces are used, so every string goes through
//! [`printable`] first. Layout is computed as a list of [`Mark`]s before
//! anything is drawn; text that would leave the page is cut with an ellipsis.

use super::ReportError;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb,
};

const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 25.4;
const FIELD_COLUMN_WIDTH: f32 = 52.9;
const VALUE_COLUMN_WIDTH: f32 = 123.5;
const LINE_HEIGHT: f32 = 5.0;
const CELL_PADDING: f32 = 2.0;
const BODY_FONT_SIZE: f32 = 11.0;
const TITLE_FONT_SIZE: f32 = 18.0;
const HEADING_FONT_SIZE: f32 = 14.0;
const GRID_THICKNESS: f32 = 0.5;
const TITLE_SPACING: f32 = 14.0;
const SECTION_SPACING: f32 = 7.0;
const HEADING_SPACING: f32 = 3.5;
// Cap height of Helvetica is roughly 0.35 mm per point.
const CAP_HEIGHT_RATIO: f32 = 0.35;

const FIELD_WRAP: usize = 30;
const VALUE_WRAP: usize = 60;
const PARAGRAPH_WRAP: usize = 90;
const MAX_CELL_LINES: usize = 4;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shade {
    Header,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ink {
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Face {
    Regular,
    Bold,
}

/// One positioned drawing instruction, in millimetres from the bottom left.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Mark {
    Text {
        text: String,
        size: f32,
        x: f32,
        y: f32,
        face: Face,
        ink: Ink,
    },
    Cell {
        left: f32,
        bottom: f32,
        right: f32,
        top: f32,
        shade: Shade,
    },
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

const GRID_RGB: (u8, u8, u8) = (0x80, 0x80, 0x80);

impl Shade {
    fn rgb(self) -> (u8, u8, u8) {
        match self {
            Shade::Header => (0x4C, 0xAF, 0x50),
            Shade::Body => (0xF5, 0xF5, 0xF5),
        }
    }
}

impl Ink {
    fn rgb(self) -> (u8, u8, u8) {
        match self {
            Ink::Dark => (0x00, 0x00, 0x00),
            Ink::Light => (0xFF, 0xFF, 0xFF),
        }
    }
}

fn pdf_error(err: impl std::fmt::Display) -> ReportError {
    ReportError::Pdf(err.to_string())
}

/// Renders `fields` as a two-column table under `title`, followed by an
/// optional recommendation paragraph.
pub fn render_pdf(
    title: &str,
    fields: &[(String, String)],
    recommendation: Option<&str>,
) -> Result<Vec<u8>, ReportError> {
    let marks = layout(title, fields, recommendation);
    let title = printable(title);
    let (document, page, layer) =
        PdfDocument::new(title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Report");
    let regular = document
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = document
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;
    let canvas = document.get_page(page).get_layer(layer);

    canvas.set_outline_color(rgb(GRID_RGB));
    canvas.set_outline_thickness(GRID_THICKNESS);
    for mark in &marks {
        draw(&canvas, mark, &regular, &bold);
    }

    document.save_to_bytes().map_err(pdf_error)
}

fn draw(
    canvas: &PdfLayerReference,
    mark: &Mark,
    regular: &IndirectFontRef,
    bold: &IndirectFontRef,
) {
    match mark {
        Mark::Text {
            text,
            size,
            x,
            y,
            face,
            ink,
        } => {
            let font = match face {
                Face::Regular => regular,
                Face::Bold => bold,
            };
            canvas.set_fill_color(rgb(ink.rgb()));
            canvas.use_text(text.as_str(), *size, Mm(*x), Mm(*y), font);
        }
        Mark::Cell {
            left,
            bottom,
            right,
            top,
            shade,
        } => {
            canvas.set_fill_color(rgb(shade.rgb()));
            canvas.add_rect(
                Rect::new(Mm(*left), Mm(*bottom), Mm(*right), Mm(*top))
                    .with_mode(PaintMode::FillStroke),
            );
        }
    }
}

/// Positions every element of the report on a single page.
pub(crate) fn layout(
    title: &str,
    fields: &[(String, String)],
    recommendation: Option<&str>,
) -> Vec<Mark> {
    let mut marks = Vec::new();

    let mut cursor = PAGE_HEIGHT - MARGIN - TITLE_FONT_SIZE * CAP_HEIGHT_RATIO;
    marks.push(Mark::Text {
        text: printable(title),
        size: TITLE_FONT_SIZE,
        x: MARGIN,
        y: cursor,
        face: Face::Bold,
        ink: Ink::Dark,
    });
    cursor -= TITLE_SPACING;

    let header = Row {
        field: vec!["Field".to_string()],
        value: vec!["Value".to_string()],
    };
    cursor = place_row(&mut marks, &header, cursor, Shade::Header, Ink::Light, Face::Bold);
    for (field, value) in fields {
        let row = Row {
            field: cell_lines(&printable(field), FIELD_WRAP),
            value: cell_lines(&printable(value), VALUE_WRAP),
        };
        if cursor - row.height() < MARGIN {
            break;
        }
        cursor = place_row(&mut marks, &row, cursor, Shade::Body, Ink::Dark, Face::Regular);
    }

    let Some(recommendation) = recommendation.map(printable).filter(|text| !text.is_empty())
    else {
        return marks;
    };
    cursor -= SECTION_SPACING + HEADING_FONT_SIZE * CAP_HEIGHT_RATIO;
    let room = ((cursor - HEADING_SPACING - MARGIN) / LINE_HEIGHT).floor();
    if room < 1.0 {
        return marks;
    }
    marks.push(Mark::Text {
        text: "Recommendations / Actions".to_string(),
        size: HEADING_FONT_SIZE,
        x: MARGIN,
        y: cursor,
        face: Face::Bold,
        ink: Ink::Dark,
    });
    cursor -= HEADING_SPACING;
    for line in clip(wrap(&recommendation, PARAGRAPH_WRAP), room as usize, PARAGRAPH_WRAP) {
        cursor -= LINE_HEIGHT;
        marks.push(Mark::Text {
            text: line,
            size: BODY_FONT_SIZE,
            x: MARGIN,
            y: cursor,
            face: Face::Regular,
            ink: Ink::Dark,
        });
    }
    marks
}

struct Row {
    field: Vec<String>,
    value: Vec<String>,
}

impl Row {
    fn height(&self) -> f32 {
        let lines = self.field.len().max(self.value.len()).max(1);
        lines as f32 * LINE_HEIGHT + 2.0 * CELL_PADDING
    }
}

/// Places one table row with its top edge at `top` and returns its bottom edge.
fn place_row(
    marks: &mut Vec<Mark>,
    row: &Row,
    top: f32,
    shade: Shade,
    ink: Ink,
    face: Face,
) -> f32 {
    let bottom = top - row.height();
    let columns = [
        (MARGIN, FIELD_COLUMN_WIDTH, &row.field),
        (MARGIN + FIELD_COLUMN_WIDTH, VALUE_COLUMN_WIDTH, &row.value),
    ];

    for (left, width, lines) in columns {
        marks.push(Mark::Cell {
            left,
            bottom,
            right: left + width,
            top,
            shade,
        });
        let mut baseline = top - CELL_PADDING;
        for line in lines {
            baseline -= LINE_HEIGHT * 0.8;
            marks.push(Mark::Text {
                text: line.clone(),
                size: BODY_FONT_SIZE,
                x: left + CELL_PADDING,
                y: baseline,
                face,
                ink,
            });
            baseline -= LINE_HEIGHT * 0.2;
        }
    }

    bottom
}

fn cell_lines(text: &str, width: usize) -> Vec<String> {
    clip(wrap(text, width), MAX_CELL_LINES, width)
}

/// Keeps at most `max_lines`, marking the cut on the last kept line.
pub(crate) fn clip(mut lines: Vec<String>, max_lines: usize, width: usize) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.pop() {
        lines.push(ellipsize(last, width));
    }
    lines
}

fn ellipsize(mut line: String, width: usize) -> String {
    while !line.is_empty() && line.len() + ELLIPSIS.len() > width {
        line.pop();
    }
    format!("{}{ELLIPSIS}", line.trim_end())
}

/// Maps typographic punctuation to ASCII and drops what Helvetica cannot show.
pub(crate) fn printable(text: &str) -> String {
    let mapped: String = text
        .chars()
        .filter_map(|ch| match ch {
            '\u{2018}' | '\u{2019}' => Some('\''),
            '\u{201C}' | '\u{201D}' => Some('"'),
            '\u{2013}' | '\u{2014}' => Some('-'),
            ch if ch.is_ascii_graphic() || ch == ' ' => Some(ch),
            ch if ch.is_whitespace() => Some(' '),
            _ => None,
        })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Greedy word wrap; words longer than `width` get a line of their own.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
