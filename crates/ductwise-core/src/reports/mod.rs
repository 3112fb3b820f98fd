pub mod master;
pub mod summary;

use serde::{Deserialize, Serialize};

use crate::model::Sheet;
use summary::SummaryRow;

pub const OUTPUT_DETAILED: &str = "duct_summary_detailed.xlsx";
pub const OUTPUT_MASTER: &str = "duct_master_sheet.xlsx";

/// Both reports for one filtered dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reports {
    /// Rows left after the unit/vendor filters.
    pub filtered_rows: usize,
    pub summary_rows: Vec<SummaryRow>,
    pub summary: Sheet,
    pub master: Sheet,
}
