//! Gridkit - search, filter, sort and paginate in-memory data tables.
//!
//! Gridkit is the data side of an interactive table. Given a collection of
//! records and the table's column definitions, it produces the rows a UI
//! should draw for the current search text, filter selections, sort and
//! page. It renders nothing itself.
//!
//! - Columns project records into normalized row data
//! - Checkbox filters over the distinct values of a column
//! - Range filters over numbers or dates, inclusive and fail-open
//! - Case-insensitive free-text search across every column
//! - Stable sorting of the whole result set, then page slicing
//! - Identity-keyed caching that keeps selections when the data changes
//!
//! # Quick Start
//!
//! ```rust
//! use gridkit::{CellValue, Column, FilterAction, FilterColumn, Record, RowId, Table, TableConfig};
//!
//! struct Animal {
//!     id: i64,
//!     name: &'static str,
//!     family: &'static str,
//!     age: i64,
//! }
//!
//! impl Record for Animal {
//!     fn record_id(&self) -> RowId {
//!         RowId::Int(self.id)
//!     }
//!
//!     fn field(&self, name: &str) -> Option<CellValue> {
//!         match name {
//!             "name" => Some(self.name.into()),
//!             "family" => Some(self.family.into()),
//!             "age" => Some(self.age.into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let columns = vec![
//!     Column::new("Name", |a: &Animal| a.name),
//!     Column::new("Family", |a: &Animal| a.family),
//!     Column::new("Age", |a: &Animal| a.age),
//! ];
//! let filters = vec![FilterColumn::checkboxes("Family"), FilterColumn::range("Age")];
//!
//! let config = TableConfig::default().with_items_per_page(10);
//! let mut table = Table::new(columns, filters, config).unwrap();
//! table.set_collection(vec![
//!     Animal { id: 1, name: "Cat", family: "Feline", age: 10 },
//!     Animal { id: 2, name: "Dog", family: "Canine", age: 5 },
//!     Animal { id: 3, name: "Lion", family: "Feline", age: 13 },
//! ]);
//!
//! table.dispatch(&FilterAction::toggle("family", "feline", true)).unwrap();
//! table.toggle_sort("age");
//! table.toggle_sort("age");
//!
//! let view = table.view();
//! let names: Vec<String> = view.rows.iter().map(|r| r.get("name").unwrap().display()).collect();
//! assert_eq!(names, ["Lion", "Cat"]);
//! assert_eq!(view.message().unwrap(), "Showing 1 to 2 of 2 records");
//! ```
//!
//! # Pipeline
//!
//! Each stage is a plain function over [`RowData`] and can be used on its
//! own:
//!
//! ```text
//! records ─map_to_data─▶ rows ─filter_data─▶ matching ─sort_and_paginate─▶ page
//!                                  ▲
//!          build_filter ──▶ TableFilter ◀── reduce(FilterAction)
//! ```
//!
//! A row is kept when it matches the search *and* every active filter:
//!
//! ```text
//! keep = (search blank OR some cell contains it)
//!      ∧ (every checked checkbox column lists the cell's value)
//!      ∧ (every bounded range column contains the cell's value)
//! ```
//!
//! # Data quality
//!
//! Malformed data never fails the pipeline. Missing columns and values that
//! cannot be read as numbers or dates are reported as [`Diagnostic`]s. The
//! `_with` variants of each stage take a [`DiagnosticSink`]; the others log
//! through `tracing` under the `gridkit` target.
//!
//! Caller mistakes, such as toggling a value on a range filter, are
//! returned as [`GridError`].

mod column;
mod config;
mod diagnostics;
mod error;
mod evaluate;
mod filter;
mod mapper;
mod memo;
mod normalize;
mod pagination;
mod pipeline;
mod record;
mod reducer;
mod sort;
mod structure;
mod value;

// Re-export public API
pub use column::{parse_date_millis, Column, ColumnKind, FilterColumn, Presenter, RangeParser};
pub use config::{TableConfig, DEFAULT_NO_ENTRIES_MESSAGE};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, SilentSink, TracingSink};
pub use error::{GridError, Result};
pub use evaluate::{filter_data, filter_data_with, filter_rows, row_matches, FilterArgs};
pub use filter::{build_filter, build_filter_with, reset_filter, Bound, ColumnFilter, TableFilter};
pub use mapper::{map_to_data, CellData, RowData};
pub use memo::{FilterCache, RowDataCache};
pub use normalize::{contains_normalized, normalized, same_normalized};
pub use pagination::{
    page_range, page_size_options, PageSummary, Pagination, DEFAULT_MAX_PAGE_LINKS,
    DEFAULT_PAGE_SIZE_OPTIONS,
};
pub use pipeline::{run, run_with, Table, TableQuery, TableView};
pub use record::Record;
pub use reducer::{reduce, FilterAction, RangeTarget};
pub use sort::{
    paginate, sort_and_paginate, sort_and_paginate_with, sort_rows, toggle_sort, SortArgs,
    SortDirection, SortSpec,
};
pub use structure::{
    build_filter_structure, build_filter_structure_with, FilterStructure, StructureEntry,
};
pub use value::{compare_primitives, parse_leading_number, CellValue, Primitive, RowId};
