//! Engine configuration

use crate::error::{SheetError, SheetResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Rows per sheet of the legacy binary format; exports paginate on it.
pub const DEFAULT_SHEET_SIZE: usize = 65_536;

/// What to do when a cell cannot be coerced to its field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionPolicy {
    /// Drop the row, record a diagnostic per bad cell, keep importing
    #[default]
    SkipRow,
    /// Fail the whole import on the first bad cell
    Abort,
}

/// Import/export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcelConfig {
    /// Directory exported files are written to
    pub download_path: PathBuf,
    /// Data rows per sheet before export starts a new sheet
    pub sheet_size: usize,
    /// Last data row covered by dropdowns and prompts
    pub validation_rows: u32,
    /// Header text marking a column as a note (red on yellow)
    pub note_marker: String,
    pub coercion_policy: CoercionPolicy,
}

impl Default for ExcelConfig {
    fn default() -> Self {
        Self {
            download_path: PathBuf::from("download"),
            sheet_size: DEFAULT_SHEET_SIZE,
            validation_rows: 100,
            note_marker: "注：".to_string(),
            coercion_policy: CoercionPolicy::SkipRow,
        }
    }
}

impl ExcelConfig {
    /// Load settings from a YAML file; missing keys keep their defaults.
    pub fn from_yaml_file(path: &Path) -> SheetResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> SheetResult<Self> {
        let config: ExcelConfig = serde_yaml::from_str(content)
            .map_err(|e| SheetError::Configuration(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SheetResult<()> {
        if self.sheet_size == 0 {
            return Err(SheetError::Configuration(
                "sheet_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_download_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.download_path = path.into();
        self
    }

    pub fn with_policy(mut self, policy: CoercionPolicy) -> Self {
        self.coercion_policy = policy;
        self
    }
}
