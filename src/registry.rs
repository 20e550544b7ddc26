//! Column metadata registry
//!
//! Turns a record type's field table into the ordered column descriptors
//! shared by import and export. Discovery is pure, so results are cached
//! per record type for the life of the process.

use crate::error::{SheetError, SheetResult};
use crate::record::SheetRecord;
use crate::types::{ColumnDescriptor, FieldDef};
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

type Columns = Arc<[ColumnDescriptor]>;

fn cache() -> &'static RwLock<HashMap<TypeId, Columns>> {
    static CACHE: OnceLock<RwLock<HashMap<TypeId, Columns>>> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Ordered column descriptors of `T`, discovered once and cached.
pub fn discover<T: SheetRecord>() -> SheetResult<Columns> {
    let key = TypeId::of::<T>();

    if let Ok(map) = cache().read() {
        if let Some(columns) = map.get(&key) {
            return Ok(Arc::clone(columns));
        }
    }

    let columns: Columns = build_columns(type_name::<T>(), &T::fields())?.into();
    tracing::debug!(
        record = type_name::<T>(),
        columns = columns.len(),
        "discovered column descriptors"
    );

    // A poisoned lock only costs us the cache entry
    if let Ok(mut map) = cache().write() {
        let entry = map.entry(key).or_insert_with(|| Arc::clone(&columns));
        return Ok(Arc::clone(entry));
    }
    Ok(columns)
}

/// Assign 1-based ordinals to the annotated fields, in declaration order.
pub fn build_columns(record: &str, fields: &[FieldDef]) -> SheetResult<Vec<ColumnDescriptor>> {
    let columns: Vec<ColumnDescriptor> = fields
        .iter()
        .filter_map(|field| field.column.as_ref().map(|spec| (field, spec)))
        .enumerate()
        .map(|(idx, (field, spec))| ColumnDescriptor::new(idx + 1, field, spec))
        .collect();

    if columns.is_empty() {
        return Err(SheetError::Configuration(format!(
            "{} has no fields with column metadata",
            record
        )));
    }
    if columns.len() > usize::from(u16::MAX) {
        return Err(SheetError::Configuration(format!(
            "{} declares {} columns, more than a sheet can hold",
            record,
            columns.len()
        )));
    }

    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PropertyAccess, Value};
    use crate::types::{ColumnSpec, FieldKind};

    #[derive(Default)]
    struct Sparse;

    impl PropertyAccess for Sparse {
        fn property(&self, _name: &str) -> Option<Value> {
            None
        }
    }

    impl SheetRecord for Sparse {
        fn fields() -> Vec<FieldDef> {
            vec![
                FieldDef::plain("id", FieldKind::Long),
                FieldDef::column("name", FieldKind::Text, ColumnSpec::new("Name")),
                FieldDef::plain("search", FieldKind::Text),
                FieldDef::column("age", FieldKind::Int, ColumnSpec::new("Age")),
            ]
        }

        fn assign(&mut self, _field: &str, _value: Value) -> SheetResult<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Bare;

    impl PropertyAccess for Bare {
        fn property(&self, _name: &str) -> Option<Value> {
            None
        }
    }

    impl SheetRecord for Bare {
        fn fields() -> Vec<FieldDef> {
            vec![FieldDef::plain("id", FieldKind::Long)]
        }

        fn assign(&mut self, _field: &str, _value: Value) -> SheetResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_ordinals_skip_unannotated_fields() {
        let columns = discover::<Sparse>().unwrap();
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].field, "name");
        assert_eq!(columns[0].ordinal, 1);
        assert_eq!(columns[1].field, "age");
        assert_eq!(columns[1].ordinal, 2);
    }

    #[test]
    fn test_discovery_is_stable() {
        let first = discover::<Sparse>().unwrap();
        let second = discover::<Sparse>().unwrap();
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_no_annotated_fields_is_configuration_error() {
        let err = discover::<Bare>().unwrap_err();
        assert!(matches!(err, SheetError::Configuration(_)));
        assert!(err.to_string().contains("no fields with column metadata"));
    }
}
