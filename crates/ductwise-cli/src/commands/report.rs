use ductwise_core::error::DuctError;
use ductwise_core::export::to_xlsx_bytes;
use ductwise_core::model::Sheet;
use ductwise_core::reports::{OUTPUT_DETAILED, OUTPUT_MASTER};
use std::path::Path;

use super::{load_dataset, open_cache, record_filter};
use crate::output;
use crate::InputArgs;

pub fn run(input: &InputArgs, out_dir: &Path, output_format: &str) -> Result<(), DuctError> {
    let dataset = load_dataset(input)?;
    let reports = ductwise_core::generate_reports(&dataset, &record_filter(input))?;

    std::fs::create_dir_all(out_dir)?;
    let detailed_path = out_dir.join(OUTPUT_DETAILED);
    let master_path = out_dir.join(OUTPUT_MASTER);
    std::fs::write(&detailed_path, render(input, &reports.summary)?)?;
    std::fs::write(&master_path, render(input, &reports.master)?)?;

    match output_format {
        "json" => output::json::print(&reports)?,
        _ => output::table::print_reports(&reports),
    }

    eprintln!(
        "Filtered rows: {}. Written {} ({} rows) and {} ({} rows)",
        reports.filtered_rows,
        detailed_path.display(),
        reports.summary.len(),
        master_path.display(),
        reports.master.len()
    );

    Ok(())
}

fn render(input: &InputArgs, sheet: &Sheet) -> Result<Vec<u8>, DuctError> {
    match open_cache(input)? {
        Some(cache) => cache.export_or_insert_with(sheet, to_xlsx_bytes),
        None => to_xlsx_bytes(sheet),
    }
}
