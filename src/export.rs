//! PDF export of a rendered report table
//!
//! The document is a single page drawn with the standard Helvetica fonts,
//! so no font file has to be embedded. Text is encoded as WinAnsi; characters
//! outside Latin-1 are replaced by '?'.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::report::{DayKind, RenderedTable, ReportMetadata};

/// US letter in landscape, in points
const LETTER_LANDSCAPE: (f32, f32) = (792.0, 612.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub page_width: f32,
    pub page_height: f32,
    /// Page margin in points
    pub margin: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        let (page_width, page_height) = LETTER_LANDSCAPE;
        ExportOptions {
            page_width,
            page_height,
            margin: 0.0,
        }
    }
}

impl ExportOptions {
    pub fn page_size(&self) -> (f32, f32) {
        (self.page_width, self.page_height)
    }
}

// Inner padding of the drawn table, independent of the page margin
const PADDING: f32 = 36.0;
const LABEL_WIDTH: f32 = 70.0;
const TOTAL_WIDTH: f32 = 50.0;
const ROW_HEIGHT: f32 = 22.0;
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 10.0;
const CELL_SIZE: f32 = 8.0;

/// Write `table` as `CRA <MonthName> <Year>.pdf` into `output_dir`
pub fn export_to_document(
    table: Option<&RenderedTable>,
    metadata: &ReportMetadata,
    output_dir: &Path,
) -> Result<PathBuf, ExportError> {
    export_with_options(table, metadata, output_dir, &ExportOptions::default())
}

pub fn export_with_options(
    table: Option<&RenderedTable>,
    metadata: &ReportMetadata,
    output_dir: &Path,
    options: &ExportOptions,
) -> Result<PathBuf, ExportError> {
    let table = table
        .filter(|table| !table.is_empty())
        .ok_or(ExportError::TableUnavailable)?;

    let mut document = build_document(table, options)?;
    document.compress();
    let mut bytes = Vec::new();
    document.save_to(&mut bytes).map_err(lopdf::Error::from)?;

    let path = output_dir.join(metadata.file_name());
    let write_failed = |source| ExportError::WriteFailed {
        path: path.display().to_string(),
        source,
    };
    fs::create_dir_all(output_dir).map_err(write_failed)?;
    fs::write(&path, bytes).map_err(write_failed)?;

    tracing::info!(path = %path.display(), "Exported report");
    Ok(path)
}

/// Build the one-page document for `table`
pub fn build_document(
    table: &RenderedTable,
    options: &ExportOptions,
) -> Result<Document, ExportError> {
    let (page_width, page_height) = options.page_size();

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let content = Content {
        operations: page_operations(table, options),
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
}

/// Encode `text` for a WinAnsi Type1 font
fn pdf_string(text: &str) -> Object {
    let bytes = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect();
    Object::String(bytes, StringFormat::Literal)
}

// Helvetica glyphs average a little over half the font size
fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.55
}

fn text(ops: &mut Vec<Operation>, font: &str, size: f32, x: f32, y: f32, value: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new("Tj", vec![pdf_string(value)]));
    ops.push(Operation::new("ET", vec![]));
}

fn centered_text(ops: &mut Vec<Operation>, font: &str, size: f32, cell: Cell, value: &str) {
    let x = cell.x + (cell.width - approx_text_width(value, size)) / 2.0;
    let y = cell.y + (cell.height - size) / 2.0 + 1.5;
    text(ops, font, size, x, y, value);
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

fn fill_rect(ops: &mut Vec<Operation>, gray: f32, cell: Cell) {
    ops.push(Operation::new("g", vec![gray.into()]));
    ops.push(Operation::new(
        "re",
        vec![
            cell.x.into(),
            cell.y.into(),
            cell.width.into(),
            cell.height.into(),
        ],
    ));
    ops.push(Operation::new("f", vec![]));
    ops.push(Operation::new("g", vec![0.0_f32.into()]));
}

fn stroke_rect(ops: &mut Vec<Operation>, cell: Cell) {
    ops.push(Operation::new(
        "re",
        vec![
            cell.x.into(),
            cell.y.into(),
            cell.width.into(),
            cell.height.into(),
        ],
    ));
    ops.push(Operation::new("S", vec![]));
}

fn shade_for(kind: DayKind) -> Option<f32> {
    match kind {
        DayKind::Working => None,
        DayKind::Weekend => Some(0.85),
        DayKind::Holiday => Some(0.72),
    }
}

fn page_operations(table: &RenderedTable, options: &ExportOptions) -> Vec<Operation> {
    let (page_width, page_height) = options.page_size();
    let left = options.margin + PADDING;
    let right = page_width - options.margin - PADDING;
    let top = page_height - options.margin - PADDING;

    let mut ops = Vec::new();
    ops.push(Operation::new("w", vec![0.5_f32.into()]));

    // Title and identity block
    let mut y = top - TITLE_SIZE;
    text(&mut ops, "F2", TITLE_SIZE, left, y, &table.title);
    y -= 10.0;
    for (label, value) in &table.header {
        y -= BODY_SIZE + 6.0;
        text(&mut ops, "F2", BODY_SIZE, left, y, &format!("{}:", label));
        text(&mut ops, "F1", BODY_SIZE, left + 90.0, y, value);
    }

    // Table: weekday, day number and activity rows
    let day_count = table.columns.len().max(1) as f32;
    let day_width = (right - left - LABEL_WIDTH - TOTAL_WIDTH) / day_count;
    let table_top = y - 30.0;
    let row_y = |row: usize| table_top - ROW_HEIGHT * (row as f32 + 1.0);

    let labels = ["Day", "Date", "Activity"];
    for (row, label) in labels.iter().enumerate() {
        let cell = Cell {
            x: left,
            y: row_y(row),
            width: LABEL_WIDTH,
            height: ROW_HEIGHT,
        };
        stroke_rect(&mut ops, cell);
        text(&mut ops, "F2", CELL_SIZE, cell.x + 4.0, cell.y + 8.0, label);
    }

    for (index, column) in table.columns.iter().enumerate() {
        let x = left + LABEL_WIDTH + day_width * index as f32;
        let values = [
            column.day_name.as_str(),
            column.day_number.as_str(),
            column.activity.as_str(),
        ];
        for (row, value) in values.iter().enumerate() {
            let cell = Cell {
                x,
                y: row_y(row),
                width: day_width,
                height: ROW_HEIGHT,
            };
            if let Some(gray) = shade_for(column.kind) {
                fill_rect(&mut ops, gray, cell);
            }
            stroke_rect(&mut ops, cell);
            if !value.is_empty() {
                centered_text(&mut ops, "F1", CELL_SIZE, cell, value);
            }
        }
    }

    let total_x = right - TOTAL_WIDTH;
    let total_header = Cell {
        x: total_x,
        y: row_y(1),
        width: TOTAL_WIDTH,
        height: ROW_HEIGHT * 2.0,
    };
    stroke_rect(&mut ops, total_header);
    centered_text(&mut ops, "F2", CELL_SIZE, total_header, "Total");
    let total_cell = Cell {
        x: total_x,
        y: row_y(2),
        width: TOTAL_WIDTH,
        height: ROW_HEIGHT,
    };
    stroke_rect(&mut ops, total_cell);
    centered_text(&mut ops, "F2", CELL_SIZE, total_cell, &table.total);

    // Legend, signatures and generation date
    let legend_y = row_y(2) - 24.0;
    fill_rect(
        &mut ops,
        0.85,
        Cell {
            x: left,
            y: legend_y,
            width: 10.0,
            height: 10.0,
        },
    );
    text(&mut ops, "F1", CELL_SIZE, left + 14.0, legend_y + 2.0, "Weekend");
    fill_rect(
        &mut ops,
        0.72,
        Cell {
            x: left + 80.0,
            y: legend_y,
            width: 10.0,
            height: 10.0,
        },
    );
    text(
        &mut ops,
        "F1",
        CELL_SIZE,
        left + 94.0,
        legend_y + 2.0,
        "Public holiday",
    );

    let signature_y = legend_y - 60.0;
    let half = (right - left) / 2.0;
    text(&mut ops, "F2", BODY_SIZE, left, signature_y, "Employee signature");
    text(
        &mut ops,
        "F2",
        BODY_SIZE,
        left + half,
        signature_y,
        "Manager signature",
    );

    let footer = format!("Generated on {}", table.generated_at);
    text(
        &mut ops,
        "F1",
        CELL_SIZE,
        left,
        options.margin + PADDING / 2.0,
        &footer,
    );

    ops
}
