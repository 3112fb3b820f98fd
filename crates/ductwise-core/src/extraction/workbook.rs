use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Range, Reader};
use tracing::debug;

use crate::error::DuctError;
use crate::extraction::{RawSheet, WorkbookReader};
use crate::parsing::dates::{excel_serial_to_datetime, parse_datetime, to_canonical};

/// Reads xlsx/xlsm/xlsb/xls/ods workbooks through calamine.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalamineReader;

impl CalamineReader {
    pub fn new() -> Self {
        Self
    }
}

impl WorkbookReader for CalamineReader {
    fn read_sheets(&self, name: &str, bytes: &[u8]) -> Result<Vec<RawSheet>, DuctError> {
        let cursor = Cursor::new(bytes);
        let mut workbook =
            calamine::open_workbook_auto_from_rs(cursor).map_err(|e| DuctError::Workbook {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        let mut sheets = Vec::new();
        for (sheet_name, range) in workbook.worksheets() {
            match range_to_raw_sheet(&sheet_name, &range) {
                Some(sheet) => {
                    debug!(file = name, sheet = %sheet_name, rows = sheet.rows.len(), "read sheet");
                    sheets.push(sheet);
                }
                None => debug!(file = name, sheet = %sheet_name, "skipping empty sheet"),
            }
        }
        Ok(sheets)
    }

    fn backend_name(&self) -> &str {
        "calamine"
    }
}

/// Convert a calamine Range into a RawSheet. First row = headers.
/// Returns None for sheets with no data rows.
fn range_to_raw_sheet(name: &str, range: &Range<Data>) -> Option<RawSheet> {
    let mut row_iter = range.rows();
    let header_row = row_iter.next()?;
    let headers = header_names(header_row);

    let rows: Vec<Vec<Option<String>>> = row_iter
        .map(|row| row.iter().map(cell_as_string).collect::<Vec<_>>())
        .filter(|values| values.iter().any(Option::is_some))
        .collect();

    if rows.is_empty() {
        return None;
    }

    Some(RawSheet {
        name: name.to_string(),
        headers,
        rows,
    })
}

/// Blank headers become `Unnamed: <index>`; repeats get `.1`, `.2`, ...
fn header_names(row: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    row.iter()
        .enumerate()
        .map(|(idx, cell)| {
            let base = cell_as_string(cell).unwrap_or_else(|| format!("Unnamed: {idx}"));
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

/// Render any cell as text; blank cells and error cells are `None`.
fn cell_as_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            if s.trim().is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(float_text(*f)),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(
            excel_serial_to_datetime(dt.as_f64())
                .map(|d| to_canonical(&d))
                .unwrap_or_else(|| float_text(dt.as_f64())),
        ),
        Data::DateTimeIso(s) => Some(
            parse_datetime(s)
                .map(|d| to_canonical(&d))
                .unwrap_or_else(|| s.clone()),
        ),
        Data::DurationIso(s) => Some(s.clone()),
    }
}

/// Whole floats print without a trailing `.0`.
fn float_text(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{f}")
    }
}
