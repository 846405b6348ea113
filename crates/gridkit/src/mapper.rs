//! Row mapper: projects records through columns into [`RowData`].
//!
//! Row data decouples the business record shape from the table shape.
//! Every later stage works on row data only and never mutates it.

use indexmap::IndexMap;

use crate::column::{Column, ColumnKind, Presenter};
use crate::normalize::normalized;
use crate::record::Record;
use crate::value::{CellValue, RowId};

/// One cell: the column's value for a record, plus how to show it.
#[derive(Debug, Clone, PartialEq)]
pub struct CellData {
    pub value: CellValue,
    pub presenter: Option<Presenter>,
    pub kind: ColumnKind,
}

impl CellData {
    /// Display text: presenter output if there is a presenter, else the
    /// value with list elements joined by `", "`.
    pub fn display(&self) -> String {
        match &self.presenter {
            Some(presenter) => presenter.present(&self.value),
            None => self.value.to_string(),
        }
    }
}

/// A record projected through the table's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RowData {
    pub id: RowId,
    /// Cells keyed by normalized column name, in column order.
    pub data: IndexMap<String, CellData>,
}

impl RowData {
    /// Looks up a cell by column name, case-insensitively.
    pub fn get(&self, column: &str) -> Option<&CellData> {
        self.data.get(&normalized(column))
    }

    /// Looks up a cell's value by column name, case-insensitively.
    pub fn value(&self, column: &str) -> Option<&CellValue> {
        self.get(column).map(|cell| &cell.value)
    }
}

/// Maps every record through every column.
///
/// Output order equals input order.
pub fn map_to_data<T: Record>(collection: &[T], columns: &[Column<T>]) -> Vec<RowData> {
    collection.iter().map(|item| map_row(item, columns)).collect()
}

fn map_row<T: Record>(item: &T, columns: &[Column<T>]) -> RowData {
    let data = columns
        .iter()
        .map(|column| {
            let cell = CellData {
                value: column.value(item),
                presenter: column.presenter().cloned(),
                kind: column.kind(),
            };
            (column.key().to_string(), cell)
        })
        .collect();

    RowData {
        id: item.record_id(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Animal {
        id: i64,
        name: &'static str,
        age: u32,
        tags: Vec<&'static str>,
    }

    impl Record for Animal {
        fn record_id(&self) -> RowId {
            RowId::Int(self.id)
        }

        fn field(&self, _name: &str) -> Option<CellValue> {
            None
        }
    }

    fn columns() -> Vec<Column<Animal>> {
        vec![
            Column::new("Name", |a: &Animal| a.name),
            Column::new("AGE", |a: &Animal| a.age)
                .with_kind(ColumnKind::Number)
                .with_presenter(|v| format!("{} yrs", v)),
            Column::new("Tags", |a: &Animal| a.tags.clone()),
        ]
    }

    fn animals() -> Vec<Animal> {
        vec![
            Animal {
                id: 2,
                name: "Dog",
                age: 5,
                tags: vec!["pet"],
            },
            Animal {
                id: 1,
                name: "Cat",
                age: 10,
                tags: vec!["pet", "indoor"],
            },
        ]
    }

    #[test]
    fn maps_in_input_order() {
        let rows = map_to_data(&animals(), &columns());
        let ids: Vec<RowId> = rows.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![RowId::Int(2), RowId::Int(1)]);
    }

    #[test]
    fn cells_are_keyed_by_normalized_name() {
        let rows = map_to_data(&animals(), &columns());
        let keys: Vec<&str> = rows[0].data.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "age", "tags"]);
        assert_eq!(rows[0].value("Name"), Some(&CellValue::from("Dog")));
        assert_eq!(rows[1].value("age"), Some(&CellValue::from(10u32)));
        assert_eq!(rows[1].get("age").map(|c| c.kind), Some(ColumnKind::Number));
        assert!(rows[0].get("colour").is_none());
    }

    #[test]
    fn display_uses_presenter() {
        let rows = map_to_data(&animals(), &columns());
        assert_eq!(rows[1].get("age").map(CellData::display).as_deref(), Some("10 yrs"));
        assert_eq!(rows[1].get("name").map(CellData::display).as_deref(), Some("Cat"));
        assert_eq!(rows[1].get("tags").map(CellData::display).as_deref(), Some("pet, indoor"));
    }

    #[test]
    fn empty_collection_maps_to_nothing() {
        assert!(map_to_data(&[], &columns()).is_empty());
    }
}
