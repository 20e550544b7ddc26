//! Excel exporter implementation - typed records → paginated workbook

use crate::config::ExcelConfig;
use crate::error::{SheetError, SheetResult};
use crate::record::SheetRecord;
use crate::registry;
use crate::resolver;
use crate::types::ColumnDescriptor;
use rust_xlsxwriter::{
    Color, DataValidation, Format, FormatAlign, FormatPattern, Workbook, Worksheet,
};
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Width of note columns, in characters
const NOTE_COLUMN_WIDTH: f64 = 23.44;

/// Extra width added to every ordinary column, in characters
const COLUMN_PADDING: f64 = 0.72;

/// Sheet base name used when the caller passes an empty one
const DEFAULT_SHEET_NAME: &str = "Sheet";

/// A workbook written to the download directory
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    /// Generated file name, unique per export
    pub filename: String,
    pub path: PathBuf,
    pub sheets: usize,
    pub rows: usize,
}

/// Excel exporter writing records of type `T`
pub struct ExcelExporter<T> {
    columns: Arc<[ColumnDescriptor]>,
    config: ExcelConfig,
    _record: PhantomData<fn(&T)>,
}

impl<T: SheetRecord> ExcelExporter<T> {
    /// Create a new exporter for `T`
    pub fn new(config: ExcelConfig) -> SheetResult<Self> {
        config.validate()?;
        Ok(Self {
            columns: registry::discover::<T>()?,
            config,
            _record: PhantomData,
        })
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Number of sheets needed for `total` records; always at least one.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.config.sheet_size).max(1)
    }

    /// Sheet names for `total` records: `base` alone, or `base0`, `base1`, ...
    pub fn sheet_names(&self, base: &str, total: usize) -> Vec<String> {
        let base = if base.is_empty() { DEFAULT_SHEET_NAME } else { base };
        let pages = self.page_count(total);
        if pages == 1 {
            vec![base.to_string()]
        } else {
            (0..pages).map(|i| format!("{}{}", base, i)).collect()
        }
    }

    /// Render records into an in-memory .xlsx document
    pub fn render(&self, records: &[T], base: &str) -> SheetResult<Vec<u8>> {
        let rows: Vec<Option<&T>> = records.iter().map(Some).collect();
        self.render_rows(&rows, base).map_err(SheetError::export)
    }

    /// Like [`render`](Self::render); `None` entries become rows of empty cells
    pub fn render_sparse(&self, records: &[Option<T>], base: &str) -> SheetResult<Vec<u8>> {
        let rows: Vec<Option<&T>> = records.iter().map(Option::as_ref).collect();
        self.render_rows(&rows, base).map_err(SheetError::export)
    }

    /// Export records to a uniquely named file in the download directory
    pub fn export(&self, records: &[T], base: &str) -> SheetResult<ExportedFile> {
        let rows: Vec<Option<&T>> = records.iter().map(Some).collect();
        self.export_rows(&rows, base).map_err(SheetError::export)
    }

    /// Like [`export`](Self::export); `None` entries become rows of empty cells
    pub fn export_sparse(&self, records: &[Option<T>], base: &str) -> SheetResult<ExportedFile> {
        let rows: Vec<Option<&T>> = records.iter().map(Option::as_ref).collect();
        self.export_rows(&rows, base).map_err(SheetError::export)
    }

    fn export_rows(&self, rows: &[Option<&T>], base: &str) -> SheetResult<ExportedFile> {
        let bytes = self.render_rows(rows, base)?;
        let filename = encoding_filename(base);
        let path = self.store(&filename, &bytes)?;

        tracing::info!(file = %path.display(), rows = rows.len(), "exported workbook");
        Ok(ExportedFile {
            filename,
            path,
            sheets: self.page_count(rows.len()),
            rows: rows.len(),
        })
    }

    fn render_rows(&self, rows: &[Option<&T>], base: &str) -> SheetResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let sheet_size = self.config.sheet_size;

        for (page, name) in self.sheet_names(base, rows.len()).into_iter().enumerate() {
            let start = page * sheet_size;
            let end = (start + sheet_size).min(rows.len());

            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&name)?;
            self.write_header(worksheet)?;

            let format = Format::new()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter);
            let height = self.row_height();

            for (offset, record) in rows[start..end].iter().enumerate() {
                let row = (offset + 1) as u32;
                worksheet.set_row_height(row, height)?;
                self.write_row(worksheet, row, *record, &format)?;
            }

            tracing::debug!(sheet = %name, rows = end - start, "wrote sheet");
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// Header row: styled titles, column widths, dropdowns and prompts
    fn write_header(&self, worksheet: &mut Worksheet) -> SheetResult<()> {
        for column in self.columns.iter() {
            let col = column.column_index();

            let format = if column.is_note(&self.config.note_marker) {
                worksheet.set_column_width(col, NOTE_COLUMN_WIDTH)?;
                Format::new()
                    .set_font_color(Color::Red)
                    .set_background_color(Color::Yellow)
            } else {
                worksheet.set_column_width(col, column.width_hint + COLUMN_PADDING)?;
                Format::new()
                    .set_bold()
                    .set_background_color(Color::RGB(0xFFFFCC))
            };
            let format = format
                .set_pattern(FormatPattern::Solid)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap();

            worksheet.write_string_with_format(0, col, &column.display_name, &format)?;

            if let Some(validation) = self.validation_for(column)? {
                let last_row = self.config.validation_rows;
                worksheet.add_data_validation(1, col, last_row, col, &validation)?;
            }
        }

        worksheet.set_row_height(0, self.row_height())?;
        Ok(())
    }

    /// Dropdown and/or prompt covering the first data rows of a column
    fn validation_for(&self, column: &ColumnDescriptor) -> SheetResult<Option<DataValidation>> {
        let wanted = column.pick_list.is_some() || column.prompt.is_some();
        if self.config.validation_rows == 0 || !wanted {
            return Ok(None);
        }

        let mut validation = DataValidation::new();
        if let Some(options) = &column.pick_list {
            let options: Vec<&str> = options.iter().map(String::as_str).collect();
            validation = validation.allow_list_strings(&options)?;
        }
        if let Some(prompt) = &column.prompt {
            validation = validation.set_input_message(prompt)?;
        }
        Ok(Some(validation))
    }

    fn write_row(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        record: Option<&T>,
        format: &Format,
    ) -> SheetResult<()> {
        for column in self.columns.iter().filter(|c| c.is_exportable) {
            let text = match record {
                Some(record) => resolver::resolve(record, column)?,
                None => String::new(),
            };
            worksheet.write_string_with_format(row, column.column_index(), &text, format)?;
        }
        Ok(())
    }

    fn row_height(&self) -> f64 {
        self.columns
            .iter()
            .map(|c| c.height_hint)
            .fold(0.0, f64::max)
    }

    /// Write the rendered document; a failed write leaves no file behind.
    fn store(&self, filename: &str, bytes: &[u8]) -> SheetResult<PathBuf> {
        fs::create_dir_all(&self.config.download_path)?;
        let path = self.config.download_path.join(filename);

        if let Err(e) = fs::write(&path, bytes) {
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }
        Ok(path)
    }
}

/// Unique file name for an export: `<uuid>_<base>.xlsx`
fn encoding_filename(base: &str) -> String {
    let base = if base.is_empty() { DEFAULT_SHEET_NAME } else { base };
    let safe: String = base
        .chars()
        .map(|c| if is_reserved(c) { '_' } else { c })
        .collect();
    format!("{}_{}.xlsx", Uuid::new_v4(), safe)
}

/// Characters no common filesystem accepts in a file name
fn is_reserved(c: char) -> bool {
    c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}
