//==============================================================================
// Field Kinds
//==============================================================================

/// Declared type of a record field, as seen by the coercion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// UTF-8 text
    Text,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 16-bit signed integer
    Short,
    /// Single precision float
    Float,
    /// Double precision float
    Double,
    /// A single character
    Char,
    /// Date and time (chrono `NaiveDateTime`)
    DateTime,
    /// Arbitrary-precision decimal, carried as its textual form
    Decimal,
    /// Related record, only reachable through a nested path on export
    Object,
}

impl FieldKind {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "Text",
            FieldKind::Int => "Int",
            FieldKind::Long => "Long",
            FieldKind::Short => "Short",
            FieldKind::Float => "Float",
            FieldKind::Double => "Double",
            FieldKind::Char => "Char",
            FieldKind::DateTime => "DateTime",
            FieldKind::Decimal => "Decimal",
            FieldKind::Object => "Object",
        }
    }
}

//==============================================================================
// Column Metadata (per-field annotation)
//==============================================================================

/// Column metadata attached to one record field.
///
/// This is the whole configuration surface of a column. Empty strings and
/// empty lists mean "not set".
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Header text
    pub name: String,
    /// Column width in characters
    pub width: f64,
    /// Row height in points
    pub height: f64,
    /// Whether the column is written on export
    pub is_export: bool,
    /// Date pattern such as `yyyy-MM-dd`
    pub date_format: String,
    /// Translation expression, e.g. `0=normal,1=disabled`
    pub read_converter_exp: String,
    /// Dotted accessor path applied to the field value on export
    pub target_attr: String,
    /// Allowed values, rendered as a dropdown
    pub combo: Vec<String>,
    /// Tooltip shown when the cell is selected
    pub prompt: String,
    /// Exported when the value is null
    pub default_value: String,
    /// Appended to non-null exported values
    pub suffix: String,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: 16.0,
            height: 14.0,
            is_export: true,
            date_format: String::new(),
            read_converter_exp: String::new(),
            target_attr: String::new(),
            combo: Vec::new(),
            prompt: String::new(),
            default_value: String::new(),
            suffix: String::new(),
        }
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// Keep the column on import but leave it out of exports.
    pub fn import_only(mut self) -> Self {
        self.is_export = false;
        self
    }

    pub fn date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = pattern.into();
        self
    }

    pub fn read_converter_exp(mut self, exp: impl Into<String>) -> Self {
        self.read_converter_exp = exp.into();
        self
    }

    pub fn target_attr(mut self, path: impl Into<String>) -> Self {
        self.target_attr = path.into();
        self
    }

    pub fn combo<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.combo = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

/// One declared field of a record type, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    /// `None` for fields without column metadata
    pub column: Option<ColumnSpec>,
}

impl FieldDef {
    /// A field mapped to a spreadsheet column.
    pub fn column(name: &'static str, kind: FieldKind, spec: ColumnSpec) -> Self {
        Self {
            name,
            kind,
            column: Some(spec),
        }
    }

    /// A field the engine never touches.
    pub fn plain(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            column: None,
        }
    }
}

//==============================================================================
// Column Descriptors (derived)
//==============================================================================

/// How one record field maps to one spreadsheet column.
///
/// Derived once per record type by [`crate::registry::discover`]. The
/// accessor is re-resolved through `field` whenever a value is needed.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    /// 1-based position among annotated fields
    pub ordinal: usize,
    pub field: &'static str,
    pub kind: FieldKind,
    pub display_name: String,
    pub width_hint: f64,
    pub height_hint: f64,
    pub is_exportable: bool,
    pub date_format: Option<String>,
    pub translation_expr: Option<String>,
    pub nested_path: Option<String>,
    pub pick_list: Option<Vec<String>>,
    pub prompt: Option<String>,
    pub default_value: Option<String>,
    pub suffix: Option<String>,
}

impl ColumnDescriptor {
    pub fn new(ordinal: usize, field: &FieldDef, spec: &ColumnSpec) -> Self {
        Self {
            ordinal,
            field: field.name,
            kind: field.kind,
            display_name: spec.name.clone(),
            width_hint: spec.width,
            height_hint: spec.height,
            is_exportable: spec.is_export,
            date_format: non_empty(&spec.date_format),
            translation_expr: non_empty(&spec.read_converter_exp),
            nested_path: non_empty(&spec.target_attr),
            pick_list: if spec.combo.is_empty() {
                None
            } else {
                Some(spec.combo.clone())
            },
            prompt: non_empty(&spec.prompt),
            default_value: non_empty(&spec.default_value),
            suffix: non_empty(&spec.suffix),
        }
    }

    /// 0-based sheet column of this descriptor
    pub fn column_index(&self) -> u16 {
        (self.ordinal - 1) as u16
    }

    /// Whether the header carries the note marker (alternate styling)
    pub fn is_note(&self, marker: &str) -> bool {
        !marker.is_empty() && self.display_name.contains(marker)
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
