//! Excel import/export for descriptor-mapped records
//!
//! This module provides bidirectional conversion:
//! - Export: records → Excel (.xlsx), paginated, with styled headers,
//!   dropdowns and prompts
//! - Import: Excel (.xls, .xlsx, .xlsb, .ods) → records

mod exporter;
mod importer;
mod util;

pub use exporter::{ExcelExporter, ExportedFile};
pub use importer::{number_to_column_letter, ExcelImporter, ImportOutcome, RowDiagnostic};
pub use util::{ExcelUtil, EXPORT_FAILED};
