pub mod workbook;

use std::path::Path;

use crate::error::DuctError;

/// An uploaded spreadsheet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, DuctError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }
}

/// One worksheet: header row plus data rows, every cell as optional text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Trait for spreadsheet reading backends.
pub trait WorkbookReader: Send + Sync {
    /// Read every non-empty worksheet of a workbook.
    fn read_sheets(&self, name: &str, bytes: &[u8]) -> Result<Vec<RawSheet>, DuctError>;

    /// Name of this reading backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
