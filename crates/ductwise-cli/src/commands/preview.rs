use ductwise_core::error::DuctError;
use ductwise_core::model::{CellValue, Dataset, Sheet, DUCT_NO, UNIT_NO, WBS_CODE};

use super::{load_dataset, record_filter};
use crate::output;
use crate::InputArgs;

const DERIVED_DUCT_KEY: &str = "Duct Key";

pub fn run(input: &InputArgs, limit: usize) -> Result<(), DuctError> {
    let dataset = load_dataset(input)?;
    if dataset.is_empty() {
        return Err(DuctError::NoUsableData);
    }

    let filtered = record_filter(input).apply(&dataset);
    if filtered.is_empty() {
        return Err(DuctError::EmptyAfterFilter);
    }

    eprintln!("Filtered rows: {}", filtered.records.len());
    println!("{}", output::table::format_sheet(&preview_sheet(&filtered), limit));
    Ok(())
}

const DERIVED_COLUMNS: [&str; 4] = [DUCT_NO, UNIT_NO, WBS_CODE, DERIVED_DUCT_KEY];

/// Raw columns followed by the derived keys, including rows that no report
/// will pick up. A raw column named like a derived one is replaced by it.
fn preview_sheet(dataset: &Dataset) -> Sheet {
    let raw: Vec<&String> = dataset
        .columns
        .iter()
        .filter(|c| !DERIVED_COLUMNS.contains(&c.as_str()))
        .collect();
    let mut columns: Vec<String> = raw.iter().map(|c| c.to_string()).collect();
    columns.extend(DERIVED_COLUMNS.map(String::from));

    let rows = dataset
        .records
        .iter()
        .map(|r| {
            let mut row: Vec<CellValue> = raw.iter().map(|c| CellValue::text(r.get(c))).collect();
            row.push(CellValue::text(r.duct_no.as_deref()));
            row.push(CellValue::text(r.unit_no.as_deref()));
            row.push(CellValue::text(r.wbs_code.as_deref()));
            row.push(CellValue::text(r.duct_key.as_deref()));
            row
        })
        .collect();

    Sheet { columns, rows }
}
