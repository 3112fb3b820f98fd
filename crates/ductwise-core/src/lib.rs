pub mod cache;
pub mod error;
pub mod export;
pub mod extraction;
pub mod filter;
pub mod grouping;
pub mod ingest;
pub mod model;
pub mod parsing;
pub mod reports;

use tracing::info;

use error::DuctError;
use extraction::workbook::CalamineReader;
use extraction::InputFile;
use filter::RecordFilter;
use model::Dataset;
use reports::master::build_master_sheet;
use reports::summary::{summarize_by_duct_vendor_po, summary_sheet};
use reports::Reports;

/// Main API entry point: read uploaded workbooks with the default backend.
pub fn load_files(files: &[InputFile]) -> Result<Dataset, DuctError> {
    ingest::load_workbooks(files, &CalamineReader::new())
}

/// Filter the dataset and build both reports.
///
/// An empty dataset, or one the filters empty out, halts generation with
/// an empty-result error rather than producing blank reports.
pub fn generate_reports(dataset: &Dataset, filter: &RecordFilter) -> Result<Reports, DuctError> {
    if dataset.is_empty() {
        return Err(DuctError::NoUsableData);
    }

    let filtered = filter.apply(dataset);
    if filtered.is_empty() {
        return Err(DuctError::EmptyAfterFilter);
    }

    let summary_rows = summarize_by_duct_vendor_po(&filtered.records);
    let summary = summary_sheet(&summary_rows);
    let master = build_master_sheet(&filtered);

    info!(
        filtered_rows = filtered.records.len(),
        summary_rows = summary.len(),
        master_rows = master.len(),
        "generated reports"
    );

    Ok(Reports {
        filtered_rows: filtered.records.len(),
        summary_rows,
        summary,
        master,
    })
}
