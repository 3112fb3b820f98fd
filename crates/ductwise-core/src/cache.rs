use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::DuctError;
use crate::extraction::InputFile;
use crate::model::{Dataset, Sheet};

const DATASET_EXT: &str = "dataset.json";
const EXPORT_EXT: &str = "export.xlsx";

/// On-disk cache for ingested datasets and rendered xlsx reports.
///
/// Keys are SHA-256 digests of the inputs, so a hit always matches the
/// content it was built from. Entries never expire; `clear` drops them all.
#[derive(Debug, Clone)]
pub struct ReportCache {
    dir: PathBuf,
}

impl ReportCache {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, DuctError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Digest of the ordered file names and contents.
    pub fn files_key(files: &[InputFile]) -> String {
        let mut hasher = Sha256::new();
        for file in files {
            hasher.update((file.name.len() as u64).to_le_bytes());
            hasher.update(file.name.as_bytes());
            hasher.update((file.bytes.len() as u64).to_le_bytes());
            hasher.update(&file.bytes);
        }
        hex::encode(hasher.finalize())
    }

    /// Digest of a sheet's content.
    pub fn sheet_key(sheet: &Sheet) -> Result<String, DuctError> {
        let json = serde_json::to_vec(sheet)?;
        Ok(hex::encode(Sha256::digest(&json)))
    }

    /// Return the cached dataset for these files, or build and store it.
    pub fn dataset_or_insert_with<F>(
        &self,
        files: &[InputFile],
        build: F,
    ) -> Result<Dataset, DuctError>
    where
        F: FnOnce() -> Result<Dataset, DuctError>,
    {
        let path = self.entry_path(&Self::files_key(files), DATASET_EXT);
        if let Some(dataset) = read_json(&path) {
            debug!(path = %path.display(), "dataset cache hit");
            return Ok(dataset);
        }

        let dataset = build()?;
        fs::write(&path, serde_json::to_vec(&dataset)?)?;
        debug!(path = %path.display(), "dataset cached");
        Ok(dataset)
    }

    /// Return cached xlsx bytes for this sheet, or render and store them.
    pub fn export_or_insert_with<F>(&self, sheet: &Sheet, render: F) -> Result<Vec<u8>, DuctError>
    where
        F: FnOnce(&Sheet) -> Result<Vec<u8>, DuctError>,
    {
        let path = self.entry_path(&Self::sheet_key(sheet)?, EXPORT_EXT);
        if let Ok(bytes) = fs::read(&path) {
            if !bytes.is_empty() {
                debug!(path = %path.display(), "export cache hit");
                return Ok(bytes);
            }
        }

        let bytes = render(sheet)?;
        fs::write(&path, &bytes)?;
        Ok(bytes)
    }

    /// Remove every cache entry. Returns how many were removed.
    pub fn clear(&self) -> Result<usize, DuctError> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if is_cache_entry(&path) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn entry_path(&self, key: &str, ext: &str) -> PathBuf {
        self.dir.join(format!("{key}.{ext}"))
    }
}

fn is_cache_entry(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(DATASET_EXT) || n.ends_with(EXPORT_EXT))
        .unwrap_or(false)
}

/// Unreadable or corrupt entries count as misses.
fn read_json(path: &Path) -> Option<Dataset> {
    let bytes = fs::read(path).ok()?;
    match serde_json::from_slice(&bytes) {
        Ok(dataset) => Some(dataset),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring corrupt cache entry");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellValue, Record};
    use std::cell::Cell;

    fn files() -> Vec<InputFile> {
        vec![
            InputFile::new("a.xlsx", b"first".to_vec()),
            InputFile::new("b.xlsx", b"second".to_vec()),
        ]
    }

    fn sample_dataset() -> Dataset {
        let mut record = Record::default();
        record.cells.insert("DU Code".into(), "AHU-04-637X01".into());
        record.duct_no = Some("637".into());
        Dataset {
            columns: vec!["DU Code".into()],
            records: vec![record],
            skipped: vec![],
        }
    }

    #[test]
    fn test_files_key_depends_on_content_and_order() {
        let a = files();
        let mut b = files();
        b.reverse();
        let mut c = files();
        c[0].bytes = b"changed".to_vec();
        assert_eq!(ReportCache::files_key(&a), ReportCache::files_key(&files()));
        assert_ne!(ReportCache::files_key(&a), ReportCache::files_key(&b));
        assert_ne!(ReportCache::files_key(&a), ReportCache::files_key(&c));
    }

    #[test]
    fn test_dataset_hit_skips_build() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ReportCache::open(dir.path()).unwrap();
        let builds = Cell::new(0);

        let first = cache
            .dataset_or_insert_with(&files(), || {
                builds.set(builds.get() + 1);
                Ok(sample_dataset())
            })
            .unwrap();
        let second = cache
            .dataset_or_insert_with(&files(), || {
                builds.set(builds.get() + 1);
                Ok(Dataset::default())
            })
            .unwrap();

        assert_eq!(builds.get(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn test_corrupt_entry_is_rebuilt() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ReportCache::open(dir.path()).unwrap();
        let key = ReportCache::files_key(&files());
        fs::write(cache.entry_path(&key, DATASET_EXT), b"{not json").unwrap();

        let ds = cache
            .dataset_or_insert_with(&files(), || Ok(sample_dataset()))
            .unwrap();
        assert_eq!(ds, sample_dataset());
    }

    #[test]
    fn test_export_cache_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ReportCache::open(dir.path()).unwrap();
        let sheet = Sheet {
            columns: vec!["Duct No".into()],
            rows: vec![vec![CellValue::Text("637".into())]],
        };

        let bytes = cache
            .export_or_insert_with(&sheet, |_| Ok(b"xlsx".to_vec()))
            .unwrap();
        let again = cache
            .export_or_insert_with(&sheet, |_| Ok(b"other".to_vec()))
            .unwrap();
        assert_eq!(bytes, again);

        cache
            .dataset_or_insert_with(&files(), || Ok(sample_dataset()))
            .unwrap();
        fs::write(dir.path().join("unrelated.txt"), b"keep").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert!(dir.path().join("unrelated.txt").exists());
        assert_eq!(cache.clear().unwrap(), 0);
    }
}
