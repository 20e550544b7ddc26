//! Date patterns and spreadsheet serial dates
//!
//! Column date formats use the familiar `yyyy-MM-dd HH:mm:ss` pattern
//! letters. They are translated to chrono format strings here.

use crate::record::DATETIME_FORMAT;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Fallback patterns tried after the column's own date format.
const FALLBACK_PATTERNS: [&str; 2] = ["yyyy-MM-dd HH:mm:ss", "yyyy-MM-dd"];

/// Serial of 9999-12-31, the last date a spreadsheet can hold.
const MAX_SERIAL: f64 = 2_958_465.0;

/// Translate a `yyyy-MM-dd HH:mm:ss` style pattern into a chrono format string.
///
/// Letters outside the supported set, and text quoted with `'`, are
/// copied through as literals.
pub fn to_chrono_format(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            // Quoted literal; '' is an escaped quote
            i += 1;
            if i < chars.len() && chars[i] == '\'' {
                out.push('\'');
                i += 1;
                continue;
            }
            while i < chars.len() && chars[i] != '\'' {
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        let spec = match (c, run) {
            ('y', 2) => Some("%y"),
            ('y', _) => Some("%Y"),
            ('M', 1) => Some("%-m"),
            ('M', 2) => Some("%m"),
            ('M', 3) => Some("%b"),
            ('M', _) => Some("%B"),
            ('d', 1) => Some("%-d"),
            ('d', _) => Some("%d"),
            ('H', 1) => Some("%-H"),
            ('H', _) => Some("%H"),
            ('h', 1) => Some("%-I"),
            ('h', _) => Some("%I"),
            ('m', 1) => Some("%-M"),
            ('m', _) => Some("%M"),
            ('s', 1) => Some("%-S"),
            ('s', _) => Some("%S"),
            ('S', _) => Some("%3f"),
            ('a', _) => Some("%p"),
            ('E', 1..=3) => Some("%a"),
            ('E', _) => Some("%A"),
            _ => None,
        };

        match spec {
            Some(s) => out.push_str(s),
            None => {
                for _ in 0..run {
                    push_literal(&mut out, c);
                }
            }
        }
        i += run;
    }

    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

/// Format a date-time with a column date pattern.
pub fn format_datetime(value: &NaiveDateTime, pattern: &str) -> String {
    value.format(&to_chrono_format(pattern)).to_string()
}

/// Parse text with the column pattern, then the fallback patterns.
///
/// Date-only patterns produce midnight of that day.
pub fn parse_datetime(text: &str, pattern: Option<&str>) -> Option<NaiveDateTime> {
    let text = text.trim();
    pattern
        .into_iter()
        .chain(FALLBACK_PATTERNS)
        .find_map(|p| parse_with(text, &to_chrono_format(p)))
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok())
}

fn parse_with(text: &str, fmt: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, fmt).ok().or_else(|| {
        NaiveDate::parse_from_str(text, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// Convert a spreadsheet serial date (1900 date system) to a date-time.
///
/// Counts days from 1899-12-30, which agrees with Excel from 1900-03-01
/// on. The fractional part is the time of day, rounded to the second.
pub fn from_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.floor();
    let seconds = ((serial - days) * 86_400.0).round() as i64;
    epoch
        .checked_add_signed(Duration::days(days as i64))?
        .checked_add_signed(Duration::seconds(seconds))
}

/// Serial date rendered in the canonical `yyyy-MM-dd HH:mm:ss` layout.
pub fn serial_to_text(serial: f64) -> Option<String> {
    from_serial(serial).map(|dt| dt.format(DATETIME_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_to_chrono_format_common_patterns() {
        assert_eq!(to_chrono_format("yyyy-MM-dd"), "%Y-%m-%d");
        assert_eq!(to_chrono_format("yyyy-MM-dd HH:mm:ss"), "%Y-%m-%d %H:%M:%S");
        assert_eq!(to_chrono_format("yy/M/d"), "%y/%-m/%-d");
        assert_eq!(to_chrono_format("hh:mm a"), "%I:%M %p");
        assert_eq!(to_chrono_format("HH:mm:ss.SSS"), "%H:%M:%S.%3f");
    }

    #[test]
    fn test_to_chrono_format_literals() {
        assert_eq!(to_chrono_format("yyyy'T'HH"), "%YT%H");
        assert_eq!(to_chrono_format("yyyy年MM月dd日"), "%Y年%m月%d日");
        assert_eq!(to_chrono_format("100%"), "100%%");
        assert_eq!(to_chrono_format("''yy"), "'%y");
    }

    #[test]
    fn test_format_datetime() {
        let value = dt(2018, 3, 16, 11, 33, 0);
        assert_eq!(format_datetime(&value, "yyyy-MM-dd"), "2018-03-16");
        assert_eq!(
            format_datetime(&value, "yyyy-MM-dd HH:mm:ss"),
            "2018-03-16 11:33:00"
        );
    }

    #[test]
    fn test_parse_datetime_with_pattern() {
        assert_eq!(
            parse_datetime("16/03/2018", Some("dd/MM/yyyy")),
            Some(dt(2018, 3, 16, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_datetime_fallbacks() {
        assert_eq!(
            parse_datetime("2018-03-16 11:33:00", Some("dd/MM/yyyy")),
            Some(dt(2018, 3, 16, 11, 33, 0))
        );
        assert_eq!(
            parse_datetime(" 2018-03-16 ", None),
            Some(dt(2018, 3, 16, 0, 0, 0))
        );
        assert_eq!(
            parse_datetime("2018-03-16T11:33:00", None),
            Some(dt(2018, 3, 16, 11, 33, 0))
        );
        assert_eq!(parse_datetime("yesterday", None), None);
    }

    #[test]
    fn test_from_serial() {
        assert_eq!(from_serial(1.0), Some(dt(1899, 12, 31, 0, 0, 0)));
        assert_eq!(from_serial(43175.0), Some(dt(2018, 3, 16, 0, 0, 0)));
        assert_eq!(from_serial(43175.5), Some(dt(2018, 3, 16, 12, 0, 0)));
        assert_eq!(from_serial(-1.0), None);
        assert_eq!(from_serial(f64::NAN), None);
        assert_eq!(from_serial(1e12), None);
    }

    #[test]
    fn test_serial_to_text() {
        assert_eq!(
            serial_to_text(43175.25).as_deref(),
            Some("2018-03-16 06:00:00")
        );
    }
}
