//! Styled XLSX export of the guest list.
//!
//! The sheet follows a fixed plan. Content and looks are decided separately:
//! [`layout`] produces the cell values row by row, and [`style_for`] decides
//! how any cell looks from its position and value. Only [`render_spreadsheet`]
//! touches `rust_xlsxwriter`.
//!
//! ```text
//! row 0   title (merged A:E)
//! row 1   "Generado: …" (merged A:E)
//! row 2
//! row 3   RESUMEN
//! row 4-7 label | value
//! row 8
//! row 9   column headers
//! row 10+ one row per guest, in input order
//! ```

use crate::labels;
use crate::summary::summarize;
use crate::types::{GuestRsvp, ReportSummary};
use chrono::{DateTime, FixedOffset};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, XlsxError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("XLSX error: {0}")]
    Xlsx(#[from] XlsxError),
}

pub const TITLE_ROW: u32 = 0;
pub const GENERATED_ROW: u32 = 1;
pub const SUMMARY_HEADER_ROW: u32 = 3;
pub const SUMMARY_FIRST_ROW: u32 = 4;
pub const SUMMARY_LAST_ROW: u32 = 7;
pub const HEADER_ROW: u32 = 9;
pub const FIRST_DATA_ROW: u32 = 10;

const LAST_COL: u16 = 4;
const COUNT_COL: u16 = 1;
const ATTENDING_COL: u16 = 4;

const COLUMN_WIDTHS: [u16; 5] = [35, 16, 18, 45, 14];
/// Heights in points for rows 0 through 9; guest rows keep the default.
const ROW_HEIGHTS: [u16; 10] = [28, 18, 8, 22, 20, 20, 20, 20, 8, 24];

// Palette
const BRAND: u32 = 0x00674F;
const BRAND_SOFT: u32 = 0xE8F4F0;
const BRAND_RULE: u32 = 0x006F54;
const MUTED: u32 = 0x5D514B;
const CREAM: u32 = 0xFDFAF7;
const INK: u32 = 0x1F1A17;
const WHITE: u32 = 0xFFFFFF;
const MINT: u32 = 0xF0FDF9;
const RULE: u32 = 0xE6DCD5;
const BAND: u32 = 0xFBF7F2;
const AFFIRMATIVE: u32 = 0x0F7B5C;
const NEGATIVE: u32 = 0xB3532F;

/// Value of a single cell in the plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Number(u64),
    Empty,
}

impl CellValue {
    fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeWeight {
    Thin,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub weight: EdgeWeight,
    pub color: u32,
}

impl Edge {
    const fn thin(color: u32) -> Self {
        Self {
            weight: EdgeWeight::Thin,
            color,
        }
    }

    const fn medium(color: u32) -> Self {
        Self {
            weight: EdgeWeight::Medium,
            color,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Borders {
    pub top: Option<Edge>,
    pub bottom: Option<Edge>,
    pub left: Option<Edge>,
    pub right: Option<Edge>,
}

impl Borders {
    const fn boxed(edge: Edge) -> Self {
        Self {
            top: Some(edge),
            bottom: Some(edge),
            left: Some(edge),
            right: Some(edge),
        }
    }
}

/// How a cell looks, independent of the XLSX writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleSpec {
    pub bold: bool,
    pub italic: bool,
    /// Font size in points; `None` keeps the workbook default.
    pub font_size: Option<u8>,
    pub font_color: Option<u32>,
    pub fill: Option<u32>,
    pub align: Option<Align>,
    pub v_center: bool,
    pub borders: Borders,
}

impl StyleSpec {
    fn to_format(self) -> Format {
        let mut format = Format::new();
        if self.bold {
            format = format.set_bold();
        }
        if self.italic {
            format = format.set_italic();
        }
        if let Some(size) = self.font_size {
            format = format.set_font_size(size);
        }
        if let Some(color) = self.font_color {
            format = format.set_font_color(Color::RGB(color));
        }
        if let Some(color) = self.fill {
            format = format.set_background_color(Color::RGB(color));
        }
        format = match self.align {
            Some(Align::Left) => format.set_align(FormatAlign::Left),
            Some(Align::Center) => format.set_align(FormatAlign::Center),
            None => format,
        };
        if self.v_center {
            format = format.set_align(FormatAlign::VerticalCenter);
        }
        if let Some(edge) = self.borders.top {
            format = format
                .set_border_top(edge.weight.into())
                .set_border_top_color(Color::RGB(edge.color));
        }
        if let Some(edge) = self.borders.bottom {
            format = format
                .set_border_bottom(edge.weight.into())
                .set_border_bottom_color(Color::RGB(edge.color));
        }
        if let Some(edge) = self.borders.left {
            format = format
                .set_border_left(edge.weight.into())
                .set_border_left_color(Color::RGB(edge.color));
        }
        if let Some(edge) = self.borders.right {
            format = format
                .set_border_right(edge.weight.into())
                .set_border_right_color(Color::RGB(edge.color));
        }
        format
    }
}

impl From<EdgeWeight> for FormatBorder {
    fn from(weight: EdgeWeight) -> Self {
        match weight {
            EdgeWeight::Thin => FormatBorder::Thin,
            EdgeWeight::Medium => FormatBorder::Medium,
        }
    }
}

/// Lay out every populated cell of the sheet, row-major from row 0.
///
/// Spacer rows are empty vectors. Guest rows always have five cells.
pub fn layout(rows: &[GuestRsvp], summary: &ReportSummary, generated_on: &str) -> Vec<Vec<CellValue>> {
    let mut sheet = Vec::with_capacity(FIRST_DATA_ROW as usize + rows.len());

    sheet.push(vec![CellValue::text(labels::SPREADSHEET_TITLE)]);
    sheet.push(vec![CellValue::text(format!("Generado: {generated_on}"))]);
    sheet.push(vec![]);
    sheet.push(vec![CellValue::text(labels::SUMMARY_HEADING)]);
    for (label, value) in [
        (labels::REGISTERED, summary.total as u64),
        (labels::CONFIRMED, summary.confirmed as u64),
        (labels::PENDING, summary.pending as u64),
        (labels::DECLARED_GUESTS, summary.guests),
    ] {
        sheet.push(vec![CellValue::text(label), CellValue::Number(value)]);
    }
    sheet.push(vec![]);
    sheet.push(labels::COLUMNS.iter().map(|h| CellValue::text(*h)).collect());

    for row in rows {
        sheet.push(vec![
            CellValue::text(row.full_name.as_str()),
            row.guests_count
                .map_or(CellValue::Empty, |n| CellValue::Number(u64::from(n))),
            row.phone().map_or(CellValue::Empty, CellValue::text),
            row.notes().map_or(CellValue::Empty, CellValue::text),
            CellValue::text(labels::attending_label(row.attending)),
        ]);
    }

    sheet
}

/// Decide the look of the cell at `(row, col)` holding `value`.
pub fn style_for(row: u32, col: u16, value: &CellValue) -> StyleSpec {
    match (row, col) {
        (TITLE_ROW, _) => StyleSpec {
            bold: true,
            font_size: Some(16),
            font_color: Some(BRAND),
            fill: Some(BRAND_SOFT),
            align: Some(Align::Center),
            v_center: true,
            ..StyleSpec::default()
        },
        (GENERATED_ROW, _) => StyleSpec {
            italic: true,
            font_size: Some(10),
            font_color: Some(MUTED),
            fill: Some(CREAM),
            align: Some(Align::Center),
            v_center: true,
            ..StyleSpec::default()
        },
        (SUMMARY_HEADER_ROW, 0) => StyleSpec {
            bold: true,
            font_size: Some(12),
            font_color: Some(BRAND),
            fill: Some(BRAND_SOFT),
            borders: Borders {
                bottom: Some(Edge::medium(BRAND)),
                ..Borders::default()
            },
            ..StyleSpec::default()
        },
        (SUMMARY_FIRST_ROW..=SUMMARY_LAST_ROW, 0) => StyleSpec {
            bold: true,
            font_size: Some(11),
            font_color: Some(INK),
            fill: Some(WHITE),
            align: Some(Align::Left),
            v_center: true,
            borders: Borders::boxed(Edge::thin(RULE)),
            ..StyleSpec::default()
        },
        (SUMMARY_FIRST_ROW..=SUMMARY_LAST_ROW, 1) => StyleSpec {
            bold: true,
            font_size: Some(14),
            font_color: Some(BRAND),
            fill: Some(MINT),
            align: Some(Align::Center),
            v_center: true,
            borders: Borders::boxed(Edge::thin(RULE)),
            ..StyleSpec::default()
        },
        (HEADER_ROW, 0..=LAST_COL) => StyleSpec {
            bold: true,
            font_size: Some(11),
            font_color: Some(WHITE),
            fill: Some(BRAND),
            align: Some(Align::Center),
            v_center: true,
            borders: Borders {
                top: Some(Edge::medium(BRAND)),
                bottom: Some(Edge::medium(BRAND)),
                left: Some(Edge::thin(BRAND_RULE)),
                right: Some(Edge::thin(BRAND_RULE)),
            },
            ..StyleSpec::default()
        },
        (r, 0..=LAST_COL) if r >= FIRST_DATA_ROW => data_style(r - FIRST_DATA_ROW, col, value),
        _ => StyleSpec::default(),
    }
}

/// Guest-table cell: banded by position inside the table, attendance colored by value.
fn data_style(index: u32, col: u16, value: &CellValue) -> StyleSpec {
    let base = StyleSpec {
        fill: Some(if index % 2 == 0 { WHITE } else { BAND }),
        align: Some(match col {
            COUNT_COL | ATTENDING_COL => Align::Center,
            _ => Align::Left,
        }),
        v_center: true,
        borders: Borders::boxed(Edge::thin(RULE)),
        ..StyleSpec::default()
    };

    if col == ATTENDING_COL {
        let affirmative = value.as_text() == Some(labels::YES);
        StyleSpec {
            bold: true,
            font_color: Some(if affirmative { AFFIRMATIVE } else { NEGATIVE }),
            ..base
        }
    } else {
        StyleSpec {
            font_color: Some(INK),
            ..base
        }
    }
}

/// Build the guest-list workbook and serialize it to XLSX bytes.
pub fn render_spreadsheet(
    rows: &[GuestRsvp],
    generated_at: &DateTime<FixedOffset>,
) -> Result<Vec<u8>, SpreadsheetError> {
    let summary = summarize(rows);
    let generated_on = labels::format_generated_at(generated_at);
    let cells = layout(rows, &summary, &generated_on);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(labels::SHEET_NAME)?;

    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }
    for (row, height) in ROW_HEIGHTS.iter().enumerate() {
        sheet.set_row_height(row as u32, *height)?;
    }

    for (r, values) in cells.iter().enumerate() {
        let row = r as u32;
        if row == TITLE_ROW || row == GENERATED_ROW {
            let value = values.first().cloned().unwrap_or(CellValue::Empty);
            let format = style_for(row, 0, &value).to_format();
            sheet.merge_range(row, 0, row, LAST_COL, value.as_text().unwrap_or(""), &format)?;
            continue;
        }

        for (c, value) in values.iter().enumerate() {
            let col = c as u16;
            let format = style_for(row, col, value).to_format();
            match value {
                CellValue::Text(text) => sheet.write_string_with_format(row, col, text, &format)?,
                CellValue::Number(n) => {
                    sheet.write_number_with_format(row, col, *n as f64, &format)?
                }
                CellValue::Empty => sheet.write_blank(row, col, &format)?,
            };
        }
    }

    log::debug!("laid out {} guest rows", rows.len());
    Ok(workbook.save_to_buffer()?)
}
