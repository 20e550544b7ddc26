//! SheetBind - descriptor-driven Excel import/export for typed records
//!
//! A record type lists its fields once, each with optional column metadata
//! (header, width, date format, translation expression, nested path,
//! dropdown options, prompt, default, suffix). The engine then moves
//! records in and out of spreadsheets without per-type marshalling code.
//!
//! # Features
//!
//! - Import from .xls, .xlsx, .xlsb and .ods with typed coercion
//! - Per-row diagnostics instead of silently zeroed fields
//! - Paginated .xlsx export (65 536 rows per sheet)
//! - Styled headers, dropdown validation and prompts
//! - Translation expressions (`0=male,1=female`) and nested paths (`dept.leader`)
//!
//! # Example
//!
//! ```no_run
//! use sheetbind::excel::ExcelUtil;
//! use sheetbind::models::Dept;
//!
//! let util = ExcelUtil::<Dept>::new()?;
//!
//! let bytes = std::fs::read("depts.xlsx")?;
//! let outcome = util.import_excel(bytes)?;
//! println!("Imported {} departments", outcome.records.len());
//!
//! let result = util.export_excel(&outcome.records, "Departments");
//! println!("Download: {:?}", result.data);
//! # Ok::<(), sheetbind::error::SheetError>(())
//! ```

pub mod cli;
pub mod coerce;
pub mod config;
pub mod dates;
pub mod error;
pub mod excel;
pub mod models;
pub mod record;
pub mod registry;
pub mod resolver;
pub mod response;
pub mod types;

// Re-export commonly used types
pub use config::{CoercionPolicy, ExcelConfig};
pub use error::{SheetError, SheetResult};
pub use excel::{ExcelUtil, ImportOutcome};
pub use record::{PropertyAccess, SheetRecord, Value};
pub use types::{ColumnDescriptor, ColumnSpec, FieldDef, FieldKind};
