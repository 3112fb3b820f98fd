use std::io::Cursor;

use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use crate::error::DuctError;
use crate::model::{CellValue, Sheet};
use crate::parsing::dates::to_canonical;

const SHEET_NAME: &str = "Sheet1";

/// Render a report as a single-sheet xlsx workbook.
///
/// Row 1 holds the column names. Numbers become numeric cells, date-times
/// are written as `YYYY-MM-DD HH:MM:SS` text, empty cells stay blank.
pub fn to_xlsx_bytes(sheet: &Sheet) -> Result<Vec<u8>, DuctError> {
    let mut book = umya_spreadsheet::new_file();
    let ws = book
        .get_sheet_by_name_mut(SHEET_NAME)
        .ok_or_else(|| DuctError::Export(format!("new workbook has no '{SHEET_NAME}'")))?;

    for (col, name) in sheet.columns.iter().enumerate() {
        ws.get_cell_mut((col as u32 + 1, 1))
            .set_value_string(name.clone());
    }

    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let excel_row = row_idx as u32 + 2;
        for (col, value) in row.iter().enumerate() {
            let coord = (col as u32 + 1, excel_row);
            match value {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    ws.get_cell_mut(coord).set_value_string(s.clone());
                }
                CellValue::Number(d) => {
                    let f = d.to_f64().ok_or_else(|| {
                        DuctError::Export(format!("number {d} does not fit a spreadsheet cell"))
                    })?;
                    ws.get_cell_mut(coord).set_value_number(f);
                }
                CellValue::DateTime(dt) => {
                    ws.get_cell_mut(coord).set_value_string(to_canonical(dt));
                }
            }
        }
    }

    let mut buf = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buf)
        .map_err(|e| DuctError::Export(e.to_string()))?;

    let bytes = buf.into_inner();
    debug!(rows = sheet.len(), bytes = bytes.len(), "wrote xlsx");
    Ok(bytes)
}
