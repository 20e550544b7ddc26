//! Type coercion: spreadsheet cell → typed field value

use crate::dates;
use crate::error::{SheetError, SheetResult};
use crate::record::Value;
use crate::types::FieldKind;
use calamine::Data;
use std::str::FromStr;

/// Text of a cell, the way a user sees it typed in.
///
/// Numeric cells lose their trailing `.0`, date cells render as their
/// serial number.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        other => other.to_string(),
    }
}

/// Coerce one cell into a value of `kind`.
///
/// Returns `Ok(None)` for empty cells; the field keeps its default.
pub fn coerce(
    cell: &Data,
    kind: FieldKind,
    date_format: Option<&str>,
) -> SheetResult<Option<Value>> {
    if kind == FieldKind::DateTime {
        return coerce_datetime(cell, date_format);
    }
    coerce_text(&cell_text(cell), kind, date_format)
}

/// Coerce already-extracted cell text into a value of `kind`.
pub fn coerce_text(
    text: &str,
    kind: FieldKind,
    date_format: Option<&str>,
) -> SheetResult<Option<Value>> {
    if text.is_empty() {
        return Ok(None);
    }

    let value = match kind {
        FieldKind::Text => Value::Text(text.to_string()),
        FieldKind::Int => Value::Int(parse_integer(text, kind)?),
        FieldKind::Long => Value::Long(parse_integer(text, kind)?),
        FieldKind::Short => Value::Short(parse_integer(text, kind)?),
        FieldKind::Float => Value::Float(parse_decimal(text, kind)?),
        FieldKind::Double => Value::Double(parse_decimal(text, kind)?),
        FieldKind::Char => match text.chars().next() {
            Some(c) => Value::Char(c),
            None => return Ok(None),
        },
        FieldKind::DateTime => Value::DateTime(
            dates::parse_datetime(text, date_format).ok_or_else(|| invalid(text, kind))?,
        ),
        FieldKind::Decimal => Value::Decimal(text.to_string()),
        // Related records are export-only
        FieldKind::Object => return Ok(None),
    };

    Ok(Some(value))
}

fn coerce_datetime(cell: &Data, date_format: Option<&str>) -> SheetResult<Option<Value>> {
    let serial = match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::DateTime(dt) => Some(dt.as_f64()),
        _ => None,
    };

    // Serial dates go through their canonical text form first
    let text = match serial {
        Some(serial) => dates::serial_to_text(serial).ok_or_else(|| {
            SheetError::format(format!("{} is not a valid serial date", serial))
        })?,
        None => cell_text(cell),
    };

    coerce_text(&text, FieldKind::DateTime, date_format)
}

fn parse_integer<T>(text: &str, kind: FieldKind) -> SheetResult<T>
where
    T: FromStr + TryFrom<i64>,
{
    let trimmed = text.trim();
    if let Ok(v) = trimmed.parse::<T>() {
        return Ok(v);
    }

    // Accept integral decimals such as "3.0"
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
            T::try_from(f as i64).map_err(|_| out_of_range(text, kind))
        }
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Err(out_of_range(text, kind)),
        _ => Err(invalid(text, kind)),
    }
}

fn parse_decimal<T: FromStr>(text: &str, kind: FieldKind) -> SheetResult<T> {
    text.trim().parse::<T>().map_err(|_| invalid(text, kind))
}

fn invalid(text: &str, kind: FieldKind) -> SheetError {
    SheetError::format(format!("'{}' is not a valid {}", text, kind.type_name()))
}

fn out_of_range(text: &str, kind: FieldKind) -> SheetError {
    SheetError::format(format!("'{}' is out of range for {}", text, kind.type_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Float(3.0)), "3");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Int(-7)), "-7");
        assert_eq!(cell_text(&text("R&D")), "R&D");
    }

    #[test]
    fn test_text_passes_through_verbatim() {
        assert_eq!(
            coerce(&text("  padded "), FieldKind::Text, None).unwrap(),
            Some(Value::Text("  padded ".to_string()))
        );
    }

    #[test]
    fn test_integers() {
        assert_eq!(
            coerce(&text("42"), FieldKind::Int, None).unwrap(),
            Some(Value::Int(42))
        );
        assert_eq!(
            coerce(&Data::Float(100.0), FieldKind::Long, None).unwrap(),
            Some(Value::Long(100))
        );
        assert_eq!(
            coerce(&text("3.0"), FieldKind::Short, None).unwrap(),
            Some(Value::Short(3))
        );
        assert_eq!(
            coerce(&text("9000000000"), FieldKind::Long, None).unwrap(),
            Some(Value::Long(9_000_000_000))
        );
    }

    #[test]
    fn test_integer_format_errors() {
        let err = coerce(&text("abc"), FieldKind::Int, None).unwrap_err();
        assert!(matches!(err, SheetError::Format { .. }));
        assert!(err.to_string().contains("'abc' is not a valid Int"));

        assert!(coerce(&text("2.5"), FieldKind::Int, None).is_err());
        let err = coerce(&text("70000"), FieldKind::Short, None).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_decimals() {
        assert_eq!(
            coerce(&Data::Float(2.5), FieldKind::Double, None).unwrap(),
            Some(Value::Double(2.5))
        );
        assert_eq!(
            coerce(&text("1.25"), FieldKind::Float, None).unwrap(),
            Some(Value::Float(1.25))
        );
        assert!(coerce(&text("one"), FieldKind::Double, None).is_err());
    }

    #[test]
    fn test_char_takes_first_character() {
        assert_eq!(
            coerce(&text("Yes"), FieldKind::Char, None).unwrap(),
            Some(Value::Char('Y'))
        );
    }

    #[test]
    fn test_decimal_kind_is_left_as_text() {
        assert_eq!(
            coerce(&text("12.3400"), FieldKind::Decimal, None).unwrap(),
            Some(Value::Decimal("12.3400".to_string()))
        );
        assert_eq!(
            coerce(&Data::Float(12.5), FieldKind::Decimal, None).unwrap(),
            Some(Value::Decimal("12.5".to_string()))
        );
    }

    #[test]
    fn test_empty_cells_yield_nothing() {
        for kind in [
            FieldKind::Text,
            FieldKind::Int,
            FieldKind::Long,
            FieldKind::Short,
            FieldKind::Float,
            FieldKind::Double,
            FieldKind::Char,
            FieldKind::DateTime,
            FieldKind::Decimal,
        ] {
            assert_eq!(coerce(&Data::Empty, kind, None).unwrap(), None);
            assert_eq!(coerce(&text(""), kind, None).unwrap(), None);
        }
    }

    #[test]
    fn test_datetime_from_serial_cell() {
        let expected = NaiveDate::from_ymd_opt(2018, 3, 16)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(
            coerce(&Data::Float(43175.5), FieldKind::DateTime, Some("yyyy-MM-dd")).unwrap(),
            Some(Value::DateTime(expected))
        );
    }

    #[test]
    fn test_datetime_from_text_cell() {
        let expected = NaiveDate::from_ymd_opt(2018, 3, 16)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(
            coerce(&text("2018-03-16"), FieldKind::DateTime, Some("yyyy-MM-dd")).unwrap(),
            Some(Value::DateTime(expected))
        );
        assert!(coerce(&text("soon"), FieldKind::DateTime, None).is_err());
    }

    #[test]
    fn test_object_kind_is_never_coerced() {
        assert_eq!(coerce(&text("Sales"), FieldKind::Object, None).unwrap(), None);
    }
}
