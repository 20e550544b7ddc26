//! `ExcelUtil`: one handle per record type for both directions

use crate::config::ExcelConfig;
use crate::error::SheetResult;
use crate::excel::{ExcelExporter, ExcelImporter, ImportOutcome};
use crate::record::SheetRecord;
use crate::response::AjaxResult;
use crate::types::ColumnDescriptor;
use std::path::Path;

/// Message shown to users when an export fails
pub const EXPORT_FAILED: &str = "Excel export failed, please contact the administrator";

/// Import/export entry point for records of type `T`
pub struct ExcelUtil<T> {
    importer: ExcelImporter<T>,
    exporter: ExcelExporter<T>,
}

impl<T: SheetRecord> ExcelUtil<T> {
    pub fn new() -> SheetResult<Self> {
        Self::with_config(ExcelConfig::default())
    }

    pub fn with_config(config: ExcelConfig) -> SheetResult<Self> {
        let importer = ExcelImporter::new()?.with_policy(config.coercion_policy);
        let exporter = ExcelExporter::new(config)?;
        Ok(Self { importer, exporter })
    }

    /// Column descriptors shared by import and export
    pub fn columns(&self) -> &[ColumnDescriptor] {
        self.importer.columns()
    }

    /// Import the first sheet of a document
    pub fn import_excel(&self, bytes: impl Into<Vec<u8>>) -> SheetResult<ImportOutcome<T>> {
        self.importer.import_bytes(bytes, None)
    }

    /// Import a named sheet; an empty name means the first sheet
    pub fn import_excel_sheet(
        &self,
        sheet_name: &str,
        bytes: impl Into<Vec<u8>>,
    ) -> SheetResult<ImportOutcome<T>> {
        self.importer.import_bytes(bytes, Some(sheet_name))
    }

    pub fn import_excel_file<P: AsRef<Path>>(
        &self,
        path: P,
        sheet_name: Option<&str>,
    ) -> SheetResult<ImportOutcome<T>> {
        self.importer.import_file(path, sheet_name)
    }

    /// Export records; on success the envelope carries the generated filename
    pub fn export_excel(&self, list: &[T], sheet_name: &str) -> AjaxResult<String> {
        match self.exporter.export(list, sheet_name) {
            Ok(file) => AjaxResult::ok(file.filename),
            Err(e) => {
                tracing::error!("Excel export of '{}' failed: {}", sheet_name, e);
                AjaxResult::err(format!("{}: {}", EXPORT_FAILED, e))
            }
        }
    }

    /// Header-only workbook for users to fill in and import back
    pub fn import_template_excel(&self, sheet_name: &str) -> AjaxResult<String> {
        self.export_excel(&[], sheet_name)
    }

    pub fn exporter(&self) -> &ExcelExporter<T> {
        &self.exporter
    }

    pub fn importer(&self) -> &ExcelImporter<T> {
        &self.importer
    }
}
