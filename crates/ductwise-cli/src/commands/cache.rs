use ductwise_core::cache::ReportCache;
use ductwise_core::error::DuctError;
use std::path::Path;

pub fn clear(dir: &Path) -> Result<(), DuctError> {
    let cache = ReportCache::open(dir)?;
    let removed = cache.clear()?;
    println!(
        "Removed {} cached item(s) from {}",
        removed,
        cache.dir().display()
    );
    Ok(())
}
