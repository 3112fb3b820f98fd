use tracing::{debug, info, warn};

use crate::error::DuctError;
use crate::extraction::{InputFile, RawSheet, WorkbookReader};
use crate::grouping::prefix::assign_duct_keys;
use crate::model::{
    Dataset, Record, SkippedFile, DU_CODE, MODIFIED_ON, PACKAGE_CODE_OF_MR, REQUIRED_COLUMNS,
    TOTAL_WEIGHT,
};
use crate::parsing::dates::parse_datetime;
use crate::parsing::values::parse_weight;
use crate::parsing::{extract_duct_no, extract_unit_wbs};

/// Read every sheet of every file into one dataset and derive grouping keys.
///
/// Files that fail to open are skipped and listed in `Dataset::skipped`.
/// When no file yields rows the dataset comes back empty; otherwise a
/// missing required column is an error.
pub fn load_workbooks(
    files: &[InputFile],
    reader: &dyn WorkbookReader,
) -> Result<Dataset, DuctError> {
    let mut dataset = Dataset::default();

    for file in files {
        match reader.read_sheets(&file.name, &file.bytes) {
            Ok(sheets) => {
                debug!(file = %file.name, sheets = sheets.len(), backend = reader.backend_name(), "read workbook");
                for sheet in sheets {
                    append_sheet(&mut dataset, sheet);
                }
            }
            Err(e) => {
                let reason = match e {
                    DuctError::Workbook { reason, .. } => reason,
                    other => other.to_string(),
                };
                warn!(file = %file.name, %reason, "skipping unreadable file");
                dataset.skipped.push(SkippedFile {
                    name: file.name.clone(),
                    reason,
                });
            }
        }
    }

    if dataset.records.is_empty() {
        return Ok(dataset);
    }

    check_required_columns(&dataset.columns)?;
    derive_fields(&mut dataset.records);

    info!(
        files = files.len(),
        rows = dataset.records.len(),
        skipped = dataset.skipped.len(),
        "loaded workbooks"
    );
    Ok(dataset)
}

/// Concatenate one sheet; header names are trimmed and merged by name.
fn append_sheet(dataset: &mut Dataset, sheet: RawSheet) {
    let headers: Vec<String> = sheet.headers.iter().map(|h| h.trim().to_string()).collect();
    for header in &headers {
        if !dataset.has_column(header) {
            dataset.columns.push(header.clone());
        }
    }

    for row in sheet.rows {
        let mut record = Record::default();
        for (header, value) in headers.iter().zip(row) {
            if let Some(value) = value {
                record.cells.entry(header.clone()).or_insert(value);
            }
        }
        dataset.records.push(record);
    }
}

fn check_required_columns(columns: &[String]) -> Result<(), DuctError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|req| !columns.iter().any(|c| c == *req))
        .map(|req| req.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DuctError::MissingColumns(missing))
    }
}

/// Fill Duct No, Unit No, WBS Code, Duct Key and the coerced weight/date.
pub fn derive_fields(records: &mut [Record]) {
    for record in records.iter_mut() {
        record.duct_no = extract_duct_no(record.get(DU_CODE));
        let (unit_no, wbs_code) = extract_unit_wbs(record.get(PACKAGE_CODE_OF_MR));
        record.unit_no = unit_no;
        record.wbs_code = wbs_code;
        record.total_weight = parse_weight(record.get(TOTAL_WEIGHT));
        record.modified_on = record.get(MODIFIED_ON).and_then(parse_datetime);
    }
    assign_duct_keys(records);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct FixedReader;

    impl WorkbookReader for FixedReader {
        fn read_sheets(&self, name: &str, _bytes: &[u8]) -> Result<Vec<RawSheet>, DuctError> {
            match name {
                "broken.xlsx" => Err(DuctError::Workbook {
                    name: name.into(),
                    reason: "invalid zip header".into(),
                }),
                "partial.xlsx" => Ok(vec![sheet(&["DU Code", "Mark No"], &[&["AHU-637X01", "P1"]])]),
                _ => Ok(vec![
                    sheet(
                        &REQUIRED_COLUMNS,
                        &[&[
                            "Acme", "PO-1", "PKG", "AHU-04-637X01", "AB123 duct", "12.5",
                            "2024-01-05", "U1-WBS20-XYZ", "P2",
                        ]],
                    ),
                    sheet(&[" Vendor Name ", "DU Code", "Remark"], &[&["Beta", "BAD", "late"]]),
                ]),
            }
        }

        fn backend_name(&self) -> &str {
            "fixed"
        }
    }

    fn sheet(headers: &[&str], rows: &[&[&str]]) -> RawSheet {
        RawSheet {
            name: "Sheet1".into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| {
                    r.iter()
                        .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
                        .collect()
                })
                .collect(),
        }
    }

    fn file(name: &str) -> InputFile {
        InputFile::new(name, vec![])
    }

    #[test]
    fn test_concatenates_sheets_and_derives() {
        let ds = load_workbooks(&[file("good.xlsx")], &FixedReader).unwrap();
        assert_eq!(ds.records.len(), 2);
        assert_eq!(ds.columns.last().map(String::as_str), Some("Remark"));
        assert_eq!(ds.columns.iter().filter(|c| *c == "Vendor Name").count(), 1);

        let first = &ds.records[0];
        assert_eq!(first.duct_no.as_deref(), Some("637"));
        assert_eq!(first.duct_key.as_deref(), Some("AB637"));
        assert_eq!(first.unit_no.as_deref(), Some("U1"));
        assert_eq!(first.wbs_code.as_deref(), Some("U1-WBS20"));
        assert_eq!(first.total_weight, dec!(12.5));
        assert!(first.modified_on.is_some());

        let second = &ds.records[1];
        assert_eq!(second.get("Vendor Name"), Some("Beta"));
        assert_eq!(second.duct_no, None);
        assert_eq!(second.duct_key, None);
        assert_eq!(second.total_weight, dec!(0));
    }

    #[test]
    fn test_derive_keeps_huge_weights() {
        let mut records = vec![Record::default()];
        records[0].cells.insert(DU_CODE.into(), "AHU-04-637X01".into());
        records[0].cells.insert(TOTAL_WEIGHT.into(), "1e30".into());
        derive_fields(&mut records);
        assert_eq!(records[0].duct_no.as_deref(), Some("637"));
        assert_eq!(records[0].total_weight, rust_decimal::Decimal::MAX);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let ds = load_workbooks(&[file("broken.xlsx"), file("good.xlsx")], &FixedReader).unwrap();
        assert_eq!(ds.records.len(), 2);
        assert_eq!(
            ds.skipped,
            vec![SkippedFile {
                name: "broken.xlsx".into(),
                reason: "invalid zip header".into(),
            }]
        );
    }

    #[test]
    fn test_no_rows_is_empty_not_error() {
        let ds = load_workbooks(&[file("broken.xlsx")], &FixedReader).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.skipped.len(), 1);
    }

    #[test]
    fn test_missing_columns_is_error() {
        let err = load_workbooks(&[file("partial.xlsx")], &FixedReader).unwrap_err();
        match err {
            DuctError::MissingColumns(missing) => {
                assert!(missing.contains(&"Vendor Name".to_string()));
                assert!(!missing.contains(&"DU Code".to_string()));
                assert_eq!(missing.len(), 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
