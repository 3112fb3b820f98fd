use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const VENDOR_NAME: &str = "Vendor Name";
pub const PO_NO: &str = "PO No";
pub const PACKAGE_CODE_OF_DESCRIPTION: &str = "Package Code of Description";
pub const DU_CODE: &str = "DU Code";
pub const DU_DESCRIPTION: &str = "DU Description";
pub const TOTAL_WEIGHT: &str = "Total Weight";
pub const MODIFIED_ON: &str = "Modified On";
pub const CREATED_ON: &str = "Created On";
pub const PACKAGE_CODE_OF_MR: &str = "Package Code of MR";
pub const MARK_NO: &str = "Mark No";

pub const DUCT_NO: &str = "Duct No";
pub const UNIT_NO: &str = "Unit No";
pub const WBS_CODE: &str = "WBS Code";
pub const LATEST_MODIFIED_ON: &str = "Latest Modified On";

/// Columns every ingested dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    VENDOR_NAME,
    PO_NO,
    PACKAGE_CODE_OF_DESCRIPTION,
    DU_CODE,
    DU_DESCRIPTION,
    TOTAL_WEIGHT,
    MODIFIED_ON,
    PACKAGE_CODE_OF_MR,
    MARK_NO,
];

/// One ingested spreadsheet row with its derived grouping fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Raw cell text keyed by trimmed column name. Blank cells are absent.
    pub cells: BTreeMap<String, String>,
    pub duct_no: Option<String>,
    pub unit_no: Option<String>,
    pub wbs_code: Option<String>,
    pub duct_key: Option<String>,
    pub total_weight: Decimal,
    pub modified_on: Option<NaiveDateTime>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Value of a grouping column, preferring derived fields over raw cells.
    pub fn field(&self, column: &str) -> Option<&str> {
        match column {
            DUCT_NO => self.duct_key.as_deref(),
            UNIT_NO => self.unit_no.as_deref(),
            WBS_CODE => self.wbs_code.as_deref(),
            _ => self.get(column),
        }
    }

    /// Rows lacking a duct number or key never reach either report.
    pub fn is_reportable(&self) -> bool {
        self.duct_no.is_some() && self.duct_key.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub name: String,
    pub reason: String,
}

/// All sheets of all uploaded files, concatenated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Union of columns in first-seen order.
    pub columns: Vec<String>,
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedFile>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Same columns and skip list, different rows.
    pub fn with_records(&self, records: Vec<Record>) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            records,
            skipped: self.skipped.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Empty,
    Text(String),
    Number(Decimal),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn text(value: Option<&str>) -> CellValue {
        match value {
            Some(s) => CellValue::Text(s.to_string()),
            None => CellValue::Empty,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(d) => write!(f, "{}", d.normalize()),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// A rectangular report ready for display or export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(columns: Vec<String>) -> Sheet {
        Sheet {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&CellValue>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }
}
