use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::grouping::cmp_nulls_last;
use crate::model::{
    CellValue, Record, Sheet, DUCT_NO, LATEST_MODIFIED_ON, PACKAGE_CODE_OF_DESCRIPTION, PO_NO,
    TOTAL_WEIGHT, UNIT_NO, VENDOR_NAME, WBS_CODE,
};

pub const SUMMARY_COLUMNS: [&str; 8] = [
    DUCT_NO,
    UNIT_NO,
    WBS_CODE,
    VENDOR_NAME,
    PO_NO,
    PACKAGE_CODE_OF_DESCRIPTION,
    TOTAL_WEIGHT,
    LATEST_MODIFIED_ON,
];

/// One line of the detailed summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// The duct key, prefix included.
    pub duct_no: String,
    pub unit_no: Option<String>,
    pub wbs_code: Option<String>,
    pub vendor_name: Option<String>,
    pub po_no: Option<String>,
    pub package_code: Option<String>,
    pub total_weight: Decimal,
    pub latest_modified_on: Option<NaiveDateTime>,
}

/// Grouping tuple; a missing value is its own group and sorts last.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupKey {
    duct_key: String,
    unit_no: Option<String>,
    wbs_code: Option<String>,
    vendor_name: Option<String>,
    po_no: Option<String>,
    package_code: Option<String>,
}

impl GroupKey {
    fn of(record: &Record, duct_key: &str) -> Self {
        Self {
            duct_key: duct_key.to_string(),
            unit_no: record.unit_no.clone(),
            wbs_code: record.wbs_code.clone(),
            vendor_name: record.get(VENDOR_NAME).map(String::from),
            po_no: record.get(PO_NO).map(String::from),
            package_code: record.get(PACKAGE_CODE_OF_DESCRIPTION).map(String::from),
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.duct_key
            .cmp(&other.duct_key)
            .then_with(|| cmp_nulls_last(self.unit_no.as_deref(), other.unit_no.as_deref()))
            .then_with(|| cmp_nulls_last(self.wbs_code.as_deref(), other.wbs_code.as_deref()))
            .then_with(|| cmp_nulls_last(self.vendor_name.as_deref(), other.vendor_name.as_deref()))
            .then_with(|| cmp_nulls_last(self.po_no.as_deref(), other.po_no.as_deref()))
            .then_with(|| cmp_nulls_last(self.package_code.as_deref(), other.package_code.as_deref()))
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    total_weight: Decimal,
    latest_modified_on: Option<NaiveDateTime>,
}

/// Sum weights and take the latest modified date per
/// (Duct Key, Unit, WBS, Vendor, PO, Package Code of Description).
pub fn summarize_by_duct_vendor_po(records: &[Record]) -> Vec<SummaryRow> {
    let mut groups: BTreeMap<GroupKey, Accumulator> = BTreeMap::new();

    for record in records.iter().filter(|r| r.is_reportable()) {
        let Some(duct_key) = record.duct_key.as_deref() else {
            continue;
        };
        let acc = groups.entry(GroupKey::of(record, duct_key)).or_default();
        // Sums past the Decimal range pin at its bound
        acc.total_weight = acc.total_weight.saturating_add(record.total_weight);
        // None < Some, so max skips missing dates
        acc.latest_modified_on = acc.latest_modified_on.max(record.modified_on);
    }

    let mut rows: Vec<SummaryRow> = groups
        .into_iter()
        .map(|(key, acc)| SummaryRow {
            duct_no: key.duct_key,
            unit_no: key.unit_no,
            wbs_code: key.wbs_code,
            vendor_name: key.vendor_name,
            po_no: key.po_no,
            package_code: key.package_code,
            total_weight: acc.total_weight,
            latest_modified_on: acc.latest_modified_on,
        })
        .collect();

    rows.sort_by(|a, b| {
        a.duct_no
            .cmp(&b.duct_no)
            .then_with(|| cmp_nulls_last(a.unit_no.as_deref(), b.unit_no.as_deref()))
            .then_with(|| cmp_nulls_last(a.vendor_name.as_deref(), b.vendor_name.as_deref()))
            .then_with(|| cmp_nulls_last(a.po_no.as_deref(), b.po_no.as_deref()))
    });
    rows
}

/// Lay the summary out as the "Detailed Summary" report.
pub fn summary_sheet(rows: &[SummaryRow]) -> Sheet {
    let mut sheet = Sheet::new(SUMMARY_COLUMNS.iter().map(|c| c.to_string()).collect());
    for row in rows {
        sheet.rows.push(vec![
            CellValue::Text(row.duct_no.clone()),
            CellValue::text(row.unit_no.as_deref()),
            CellValue::text(row.wbs_code.as_deref()),
            CellValue::text(row.vendor_name.as_deref()),
            CellValue::text(row.po_no.as_deref()),
            CellValue::text(row.package_code.as_deref()),
            CellValue::Number(row.total_weight),
            row.latest_modified_on
                .map(CellValue::DateTime)
                .unwrap_or(CellValue::Empty),
        ]);
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::dates::parse_datetime;
    use rust_decimal_macros::dec;

    fn record(duct_key: Option<&str>, vendor: &str, weight: Decimal, date: Option<&str>) -> Record {
        let mut r = Record {
            duct_no: duct_key.map(|k| k.trim_start_matches(char::is_alphabetic).to_string()),
            duct_key: duct_key.map(String::from),
            unit_no: Some("U1".into()),
            wbs_code: Some("U1-WBS20".into()),
            total_weight: weight,
            modified_on: date.and_then(parse_datetime),
            ..Default::default()
        };
        r.cells.insert(VENDOR_NAME.into(), vendor.into());
        r.cells.insert(PO_NO.into(), "PO-1".into());
        r.cells.insert(PACKAGE_CODE_OF_DESCRIPTION.into(), "PKG-A".into());
        r
    }

    #[test]
    fn test_weights_sum_and_latest_date() {
        let records = vec![
            record(Some("AB637"), "Acme", dec!(10), Some("2024-01-05")),
            record(Some("AB637"), "Acme", dec!(15), None),
            record(Some("AB637"), "Acme", dec!(0), Some("2024-02-01")),
        ];
        let rows = summarize_by_duct_vendor_po(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].duct_no, "AB637");
        assert_eq!(rows[0].total_weight, dec!(25));
        assert_eq!(rows[0].latest_modified_on, parse_datetime("2024-02-01"));
    }

    #[test]
    fn test_overflowing_total_saturates() {
        let huge = Decimal::from_str_exact("50000000000000000000000000000").unwrap();
        let records = vec![
            record(Some("AB637"), "Acme", huge, None),
            record(Some("AB637"), "Acme", huge, None),
        ];
        let rows = summarize_by_duct_vendor_po(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_weight, Decimal::MAX);
    }

    #[test]
    fn test_all_dates_missing_is_none() {
        let records = vec![record(Some("637"), "Acme", dec!(1), None)];
        let rows = summarize_by_duct_vendor_po(&records);
        assert_eq!(rows[0].latest_modified_on, None);
    }

    #[test]
    fn test_rows_without_duct_are_dropped() {
        let records = vec![
            record(None, "Acme", dec!(10), None),
            record(Some("512"), "Acme", dec!(3), None),
        ];
        let rows = summarize_by_duct_vendor_po(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_weight, dec!(3));
    }

    #[test]
    fn test_missing_key_value_is_its_own_group() {
        let mut with_wbs = record(Some("637"), "Acme", dec!(1), None);
        let mut without_wbs = record(Some("637"), "Acme", dec!(2), None);
        without_wbs.wbs_code = None;
        let mut no_vendor = record(Some("637"), "Acme", dec!(4), None);
        no_vendor.cells.remove(VENDOR_NAME);
        with_wbs.unit_no = Some("U1".into());

        let rows = summarize_by_duct_vendor_po(&[no_vendor, without_wbs, with_wbs]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].wbs_code.as_deref(), Some("U1-WBS20"));
        assert_eq!(rows[1].wbs_code, None);
        assert_eq!(rows[2].vendor_name, None);
        assert_eq!(rows[2].total_weight, dec!(4));
    }

    #[test]
    fn test_sorted_by_duct_unit_vendor_po() {
        let records = vec![
            record(Some("GB700"), "Acme", dec!(1), None),
            record(Some("637"), "Zeta", dec!(1), None),
            record(Some("637"), "Acme", dec!(1), None),
        ];
        let rows = summarize_by_duct_vendor_po(&records);
        let order: Vec<(&str, Option<&str>)> = rows
            .iter()
            .map(|r| (r.duct_no.as_str(), r.vendor_name.as_deref()))
            .collect();
        assert_eq!(
            order,
            vec![("637", Some("Acme")), ("637", Some("Zeta")), ("GB700", Some("Acme"))]
        );
    }

    #[test]
    fn test_summary_sheet_layout() {
        let rows = summarize_by_duct_vendor_po(&[record(
            Some("AB637"),
            "Acme",
            dec!(7.5),
            Some("2024-01-05"),
        )]);
        let sheet = summary_sheet(&rows);
        assert_eq!(sheet.columns, SUMMARY_COLUMNS.to_vec());
        assert_eq!(sheet.rows[0][0], CellValue::Text("AB637".into()));
        assert_eq!(sheet.rows[0][6], CellValue::Number(dec!(7.5)));
        assert!(matches!(sheet.rows[0][7], CellValue::DateTime(_)));
    }
}
