//! The [`Record`] trait: name-based field access over typed entities.
//!
//! Column accessors cover display, search and sort. Building the set of
//! available filter values, however, works from *declared* column names, so
//! the entity must be able to answer "what is your value for `family`?".

use std::collections::{BTreeMap, HashMap};

use crate::value::{CellValue, Primitive, RowId};

/// An entity that can be listed in a table.
///
/// # Example
///
/// ```
/// use gridkit::{CellValue, Record, RowId};
///
/// struct Animal {
///     id: i64,
///     name: String,
///     age: u32,
/// }
///
/// impl Record for Animal {
///     fn record_id(&self) -> RowId {
///         RowId::Int(self.id)
///     }
///
///     fn field(&self, name: &str) -> Option<CellValue> {
///         match name {
///             "name" => Some(self.name.as_str().into()),
///             "age" => Some(self.age.into()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the unique identifier of this record.
    fn record_id(&self) -> RowId;

    /// Returns the value of the field with the given normalized name.
    ///
    /// `None` means the record has no such field; callers report it as a
    /// missing column rather than failing.
    fn field(&self, name: &str) -> Option<CellValue>;

    /// Lists the field names this record answers to, for diagnostics.
    fn field_names(&self) -> Vec<String> {
        Vec::new()
    }
}

impl Record for HashMap<String, CellValue> {
    fn record_id(&self) -> RowId {
        id_from_field(self.get("id"))
    }

    fn field(&self, name: &str) -> Option<CellValue> {
        self.get(name).cloned()
    }

    fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Record for BTreeMap<String, CellValue> {
    fn record_id(&self) -> RowId {
        id_from_field(self.get("id"))
    }

    fn field(&self, name: &str) -> Option<CellValue> {
        self.get(name).cloned()
    }

    fn field_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}

fn id_from_field(value: Option<&CellValue>) -> RowId {
    match value.and_then(CellValue::as_single) {
        Some(Primitive::Number(n)) => RowId::Int(*n as i64),
        Some(other) => RowId::Text(other.to_string()),
        None => RowId::Text(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_records_answer_by_key() {
        let mut record: BTreeMap<String, CellValue> = BTreeMap::new();
        record.insert("id".into(), 3.into());
        record.insert("family".into(), "Feline".into());

        assert_eq!(record.record_id(), RowId::Int(3));
        assert_eq!(record.field("family"), Some(CellValue::from("Feline")));
        assert_eq!(record.field("type"), None);
        assert_eq!(record.field_names(), vec!["family", "id"]);
    }

    #[test]
    fn map_records_with_text_ids() {
        let mut record: HashMap<String, CellValue> = HashMap::new();
        record.insert("id".into(), "a-1".into());
        assert_eq!(record.record_id(), RowId::Text("a-1".into()));
    }
}
