//! Excel importer implementation - spreadsheet → typed records

use crate::coerce::coerce;
use crate::config::CoercionPolicy;
use crate::error::{SheetError, SheetResult};
use crate::record::{SheetRecord, Value};
use crate::registry;
use crate::types::{ColumnDescriptor, FieldKind};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::fmt;
use std::io::{Cursor, Read, Seek};
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

/// A cell that could not be coerced; its row was left out of the import.
#[derive(Debug, Clone, PartialEq)]
pub struct RowDiagnostic {
    /// 0-based sheet row (row 0 is the header)
    pub row: u32,
    /// 0-based sheet column
    pub column: u32,
    pub field: &'static str,
    pub message: String,
}

impl RowDiagnostic {
    /// A1-style reference of the offending cell
    pub fn cell_ref(&self) -> String {
        format!("{}{}", number_to_column_letter(self.column as usize), self.row + 1)
    }
}

impl fmt::Display for RowDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.cell_ref(), self.field, self.message)
    }
}

/// Records read from one sheet, plus what was left out.
#[derive(Debug)]
pub struct ImportOutcome<T> {
    /// Name of the sheet that was read
    pub sheet: String,
    pub records: Vec<T>,
    pub diagnostics: Vec<RowDiagnostic>,
    /// Rows with every mapped cell empty
    pub blank_rows: usize,
    /// Rows dropped because a cell failed to coerce
    pub failed_rows: usize,
}

impl<T> ImportOutcome<T> {
    fn new(sheet: String) -> Self {
        Self {
            sheet,
            records: Vec::new(),
            diagnostics: Vec::new(),
            blank_rows: 0,
            failed_rows: 0,
        }
    }

    /// True when no row was dropped for a coercion failure
    pub fn is_clean(&self) -> bool {
        self.failed_rows == 0
    }
}

/// Excel importer building records of type `T` from a worksheet
pub struct ExcelImporter<T> {
    columns: Arc<[ColumnDescriptor]>,
    policy: CoercionPolicy,
    _record: PhantomData<fn() -> T>,
}

impl<T: SheetRecord> ExcelImporter<T> {
    /// Create a new importer for `T`
    pub fn new() -> SheetResult<Self> {
        Ok(Self {
            columns: registry::discover::<T>()?,
            policy: CoercionPolicy::default(),
            _record: PhantomData,
        })
    }

    pub fn with_policy(mut self, policy: CoercionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Import from an in-memory document (xls, xlsx, xlsb or ods).
    ///
    /// An empty `sheet_name` selects the first sheet.
    pub fn import_bytes(
        &self,
        bytes: impl Into<Vec<u8>>,
        sheet_name: Option<&str>,
    ) -> SheetResult<ImportOutcome<T>> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.into()))?;
        self.import_workbook(&mut workbook, sheet_name)
    }

    /// Import from a document on disk
    pub fn import_file<P: AsRef<Path>>(
        &self,
        path: P,
        sheet_name: Option<&str>,
    ) -> SheetResult<ImportOutcome<T>> {
        let mut workbook = open_workbook_auto(path.as_ref())?;
        self.import_workbook(&mut workbook, sheet_name)
    }

    fn import_workbook<RS: Read + Seek>(
        &self,
        workbook: &mut Sheets<RS>,
        sheet_name: Option<&str>,
    ) -> SheetResult<ImportOutcome<T>> {
        let sheet_names = workbook.sheet_names();

        let name = match sheet_name.filter(|s| !s.is_empty()) {
            Some(wanted) => sheet_names
                .iter()
                .find(|s| s.as_str() == wanted)
                .cloned()
                .ok_or_else(|| SheetError::NotFound(format!("sheet '{}' does not exist", wanted)))?,
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| SheetError::NotFound("workbook has no sheets".to_string()))?,
        };

        let range = workbook.worksheet_range(&name)?;
        self.import_range(name, &range)
    }

    /// Build records from a sheet's cells. Row 0 is the header.
    pub fn import_range(
        &self,
        sheet: String,
        range: &Range<Data>,
    ) -> SheetResult<ImportOutcome<T>> {
        let mut outcome = ImportOutcome::new(sheet);

        let last_row = match range.end() {
            Some((row, _)) => row,
            None => {
                tracing::debug!(sheet = %outcome.sheet, "sheet is empty");
                return Ok(outcome);
            }
        };

        for row in 1..=last_row {
            self.import_row(range, row, &mut outcome)?;
        }

        tracing::debug!(
            sheet = %outcome.sheet,
            records = outcome.records.len(),
            blank = outcome.blank_rows,
            failed = outcome.failed_rows,
            "sheet imported"
        );
        Ok(outcome)
    }

    fn import_row(
        &self,
        range: &Range<Data>,
        row: u32,
        outcome: &mut ImportOutcome<T>,
    ) -> SheetResult<()> {
        let mut values: Vec<(&'static str, Value)> = Vec::new();
        let mut problems: Vec<RowDiagnostic> = Vec::new();

        for column in self.columns.iter() {
            if column.kind == FieldKind::Object {
                continue;
            }
            let col = u32::from(column.column_index());
            let cell = range.get_value((row, col)).unwrap_or(&Data::Empty);

            match coerce(cell, column.kind, column.date_format.as_deref()) {
                Ok(Some(value)) => values.push((column.field, value)),
                Ok(None) => {}
                Err(e) if self.policy == CoercionPolicy::Abort => {
                    return Err(e.at(row as usize, col as usize));
                }
                Err(e) => problems.push(RowDiagnostic {
                    row,
                    column: col,
                    field: column.field,
                    message: match e {
                        SheetError::Format { message, .. } => message,
                        other => other.to_string(),
                    },
                }),
            }
        }

        if !problems.is_empty() {
            for problem in &problems {
                tracing::warn!(sheet = %outcome.sheet, "skipping row: {}", problem);
            }
            outcome.failed_rows += 1;
            outcome.diagnostics.extend(problems);
            return Ok(());
        }

        if values.is_empty() {
            outcome.blank_rows += 1;
            return Ok(());
        }

        // Allocate only once the row is known to carry data
        let mut record = T::default();
        for (field, value) in values {
            record.assign(field, value)?;
        }
        outcome.records.push(record);
        Ok(())
    }
}

/// Convert column index to Excel column letter (0→A, 1→B, 25→Z, 26→AA, etc.)
pub fn number_to_column_letter(n: usize) -> String {
    let mut result = String::new();
    let mut num = n;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}
