use thiserror::Error;

pub type SheetResult<T> = Result<T, SheetError>;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Format error{}: {message}", location(.row, .column))]
    Format {
        row: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    #[error("Access error: {0}")]
    Access(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unreadable workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Excel writer error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Export failed: {0}")]
    Export(Box<SheetError>),
}

impl SheetError {
    /// Coercion failure outside of any sheet position.
    pub fn format(message: impl Into<String>) -> Self {
        SheetError::Format {
            row: None,
            column: None,
            message: message.into(),
        }
    }

    /// Attach sheet coordinates to a coercion failure.
    pub fn at(self, row: usize, column: usize) -> Self {
        match self {
            SheetError::Format { message, .. } => SheetError::Format {
                row: Some(row),
                column: Some(column),
                message,
            },
            other => other,
        }
    }

    /// Wrap a failure raised while exporting. Already-wrapped errors pass through.
    pub fn export(cause: SheetError) -> Self {
        match cause {
            SheetError::Export(_) => cause,
            other => SheetError::Export(Box::new(other)),
        }
    }
}

fn location(row: &Option<usize>, column: &Option<usize>) -> String {
    match (row, column) {
        (Some(r), Some(c)) => format!(" at row {}, column {}", r, c),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_without_location() {
        let err = SheetError::format("'abc' is not a valid integer");
        assert_eq!(
            err.to_string(),
            "Format error: 'abc' is not a valid integer"
        );
    }

    #[test]
    fn test_format_error_with_location() {
        let err = SheetError::format("bad").at(3, 1);
        assert_eq!(err.to_string(), "Format error at row 3, column 1: bad");
    }

    #[test]
    fn test_at_leaves_other_errors_alone() {
        let err = SheetError::Access("no accessor 'x'".to_string()).at(1, 1);
        assert!(matches!(err, SheetError::Access(_)));
    }

    #[test]
    fn test_export_wraps_once() {
        let err = SheetError::export(SheetError::export(SheetError::Configuration(
            "x".to_string(),
        )));
        match err {
            SheetError::Export(inner) => {
                assert!(matches!(*inner, SheetError::Configuration(_)))
            }
            _ => panic!("Expected Export error"),
        }
    }
}
