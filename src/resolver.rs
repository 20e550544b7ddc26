//! Export value resolution
//!
//! Reads a column's value from a record, walks its nested path, and
//! renders it as the text that goes into the cell.

use crate::dates;
use crate::error::{SheetError, SheetResult};
use crate::record::{PropertyAccess, Value};
use crate::types::ColumnDescriptor;

/// Raw value of a column: the field accessor, then the nested path.
pub fn raw_value<T: PropertyAccess + ?Sized>(
    record: &T,
    column: &ColumnDescriptor,
) -> SheetResult<Value> {
    let value = record.property(column.field).ok_or_else(|| {
        SheetError::Access(format!("no accessor for field '{}'", column.field))
    })?;

    match &column.nested_path {
        Some(path) => follow_path(value, path),
        None => Ok(value),
    }
}

/// Walk a dotted accessor path. A null link short-circuits to null.
pub fn follow_path(mut value: Value, path: &str) -> SheetResult<Value> {
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        value = match value {
            Value::Null => return Ok(Value::Null),
            Value::Object(obj) => obj.property(segment).ok_or_else(|| {
                SheetError::Access(format!(
                    "no accessor '{}' in path '{}'",
                    segment, path
                ))
            })?,
            other => {
                return Err(SheetError::Access(format!(
                    "cannot read '{}' of a {} value in path '{}'",
                    segment,
                    other.type_name(),
                    path
                )))
            }
        };
    }
    Ok(value)
}

/// Text written into the cell for `column` of `record`.
pub fn resolve<T: PropertyAccess + ?Sized>(
    record: &T,
    column: &ColumnDescriptor,
) -> SheetResult<String> {
    let value = raw_value(record, column)?;
    format_value(&value, column)
}

/// Apply the column's formatting rule; only one branch applies.
pub fn format_value(value: &Value, column: &ColumnDescriptor) -> SheetResult<String> {
    if let Some(pattern) = &column.date_format {
        return match value {
            Value::DateTime(dt) => Ok(dates::format_datetime(dt, pattern)),
            Value::Null => Ok(String::new()),
            other => Err(SheetError::Configuration(format!(
                "column '{}' has a date format but holds a {} value",
                column.display_name,
                other.type_name()
            ))),
        };
    }

    if let Some(exp) = &column.translation_expr {
        return Ok(convert_by_exp(&value.to_string(), exp));
    }

    if value.is_null() {
        return Ok(column.default_value.clone().unwrap_or_default());
    }
    let mut text = value.to_string();
    if let Some(suffix) = &column.suffix {
        text.push_str(suffix);
    }
    Ok(text)
}

/// Translate a raw value through a `key=label,key=label` expression.
///
/// The first exact key match wins; without a match the value is returned
/// unchanged. A label ends at the next `=`, so `1=a=b` maps `1` to `a`.
pub fn convert_by_exp(value: &str, exp: &str) -> String {
    exp.split(',')
        .find_map(|item| {
            let mut parts = item.split('=');
            let key = parts.next()?;
            let label = parts.next()?;
            (key == value).then(|| label.to_string())
        })
        .unwrap_or_else(|| value.to_string())
}
