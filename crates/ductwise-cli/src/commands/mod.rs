pub mod cache;
pub mod options;
pub mod preview;
pub mod report;

use ductwise_core::cache::ReportCache;
use ductwise_core::error::DuctError;
use ductwise_core::extraction::InputFile;
use ductwise_core::filter::RecordFilter;
use ductwise_core::model::Dataset;

use crate::InputArgs;

/// Read the input files (through the cache when one is configured) and
/// report any workbook that had to be skipped.
pub fn load_dataset(input: &InputArgs) -> Result<Dataset, DuctError> {
    let files = input
        .files
        .iter()
        .map(|path| InputFile::from_path(path))
        .collect::<Result<Vec<_>, _>>()?;

    let dataset = match open_cache(input)? {
        Some(cache) => cache.dataset_or_insert_with(&files, || ductwise_core::load_files(&files))?,
        None => ductwise_core::load_files(&files)?,
    };

    if !dataset.skipped.is_empty() {
        eprintln!("Files skipped / errors:");
        for skipped in &dataset.skipped {
            eprintln!("  {}: {}", skipped.name, skipped.reason);
        }
    }

    Ok(dataset)
}

pub fn open_cache(input: &InputArgs) -> Result<Option<ReportCache>, DuctError> {
    input
        .cache_dir
        .as_ref()
        .map(|dir| ReportCache::open(dir))
        .transpose()
}

pub fn record_filter(input: &InputArgs) -> RecordFilter {
    RecordFilter::new(input.units.clone(), input.vendors.clone())
}
