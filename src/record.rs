//! Record contract: the typed accessor table a record type registers
//! instead of being reflected over at runtime.

use crate::error::{SheetError, SheetResult};
use crate::types::FieldDef;
use chrono::NaiveDateTime;
use std::fmt;
use std::sync::Arc;

/// Canonical text layout of date-time values (`yyyy-MM-dd HH:mm:ss`).
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Named accessors of a record, used to read field values and walk
/// nested paths such as `dept.leader`.
pub trait PropertyAccess {
    /// Value of the accessor called `name`, or `None` if no such accessor
    /// exists.
    fn property(&self, name: &str) -> Option<Value>;

    /// Text used when the object itself ends up in a cell.
    fn label(&self) -> String {
        String::new()
    }
}

/// A record type the engine can import into and export from.
///
/// `Default` stands in for a zero-argument constructor: importing
/// allocates `Self::default()` and then assigns the coerced cells.
pub trait SheetRecord: PropertyAccess + Default + 'static {
    /// Every declared field, in declaration order.
    fn fields() -> Vec<FieldDef>;

    /// Store a coerced value into `field`.
    fn assign(&mut self, field: &str, value: Value) -> SheetResult<()>;
}

//==============================================================================
// Dynamic Values
//==============================================================================

/// A field value crossing the engine boundary.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    Int(i32),
    Long(i64),
    Short(i16),
    Float(f32),
    Double(f64),
    Char(char),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// Decimal kept in textual form
    Decimal(String),
    Object(Arc<dyn PropertyAccess + Send + Sync>),
}

impl Value {
    /// Wrap a related record so nested paths can reach into it.
    pub fn object<T: PropertyAccess + Send + Sync + 'static>(value: T) -> Self {
        Value::Object(Arc::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Text(_) => "Text",
            Value::Int(_) => "Int",
            Value::Long(_) => "Long",
            Value::Short(_) => "Short",
            Value::Float(_) => "Float",
            Value::Double(_) => "Double",
            Value::Char(_) => "Char",
            Value::Bool(_) => "Bool",
            Value::DateTime(_) => "DateTime",
            Value::Decimal(_) => "Decimal",
            Value::Object(_) => "Object",
        }
    }

    /// Convert into a concrete field type.
    pub fn take<T: FromValue>(self) -> SheetResult<T> {
        T::from_value(self)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) | Value::Decimal(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Short(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{}", n),
            Value::Char(c) => write!(f, "{}", c),
            Value::Bool(b) => write!(f, "{}", b),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Value::Object(obj) => f.write_str(&obj.label()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Object(obj) => write!(f, "Object({:?})", obj.label()),
            other => write!(f, "{}({:?})", other.type_name(), other.to_string()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    String => Text,
    i32 => Int,
    i64 => Long,
    i16 => Short,
    f32 => Float,
    f64 => Double,
    char => Char,
    bool => Bool,
    NaiveDateTime => DateTime,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

//==============================================================================
// Value → field conversion
//==============================================================================

/// Conversion used by [`SheetRecord::assign`] implementations.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> SheetResult<Self>;
}

fn mismatch(expected: &str, value: &Value) -> SheetError {
    SheetError::Configuration(format!(
        "cannot assign {} value to a {} field",
        value.type_name(),
        expected
    ))
}

impl FromValue for String {
    fn from_value(value: Value) -> SheetResult<Self> {
        match value {
            Value::Text(s) | Value::Decimal(s) => Ok(s),
            Value::Object(_) => Err(mismatch("String", &value)),
            other => Ok(other.to_string()),
        }
    }
}

macro_rules! from_value_exact {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> SheetResult<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(mismatch(stringify!($ty), &other)),
                    }
                }
            }
        )*
    };
}

from_value_exact! {
    i32 => Int,
    i64 => Long,
    i16 => Short,
    f32 => Float,
    f64 => Double,
    char => Char,
    bool => Bool,
    NaiveDateTime => DateTime,
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> SheetResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
