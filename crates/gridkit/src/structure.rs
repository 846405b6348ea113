//! Filter structure: which filter controls exist and what they offer.
//!
//! The structure is derived from the declared [`FilterColumn`]s and the
//! current collection. Checkbox entries list the distinct values observed;
//! range entries only carry their parser. No user selection lives here;
//! see [`TableFilter`](crate::TableFilter) for that.

use indexmap::IndexMap;

use crate::column::{FilterColumn, RangeParser};
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::normalize::normalized;
use crate::record::Record;

/// The pristine shape of one column's filter.
#[derive(Debug, Clone, PartialEq)]
pub enum StructureEntry {
    /// Distinct normalized values, in order of first occurrence.
    Checkboxes { values: Vec<String> },
    /// A range control, optionally read through a parser.
    Range { parser: Option<RangeParser> },
}

impl StructureEntry {
    /// Returns `true` for range entries.
    pub fn is_range(&self) -> bool {
        matches!(self, StructureEntry::Range { .. })
    }
}

/// Available filters keyed by normalized column name, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterStructure {
    entries: IndexMap<String, StructureEntry>,
}

impl FilterStructure {
    /// Creates an empty structure.
    pub fn new() -> Self {
        FilterStructure::default()
    }

    /// Adds or replaces the entry for `column`.
    pub fn insert(&mut self, column: &str, entry: StructureEntry) {
        self.entries.insert(normalized(column), entry);
    }

    /// Looks up an entry by column name, case-insensitively.
    pub fn get(&self, column: &str) -> Option<&StructureEntry> {
        self.entries.get(&normalized(column))
    }

    /// Iterates over `(normalized name, entry)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StructureEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of filterable columns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no filter controls are available.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds the filter structure, reporting data anomalies through `tracing`.
pub fn build_filter_structure<R: Record>(
    columns: &[FilterColumn],
    collection: &[R],
) -> FilterStructure {
    build_filter_structure_with(columns, collection, &TracingSink)
}

/// Builds the filter structure, reporting data anomalies to `sink`.
///
/// An empty collection or an empty column list yields an empty structure.
pub fn build_filter_structure_with<R: Record>(
    columns: &[FilterColumn],
    collection: &[R],
    sink: &dyn DiagnosticSink,
) -> FilterStructure {
    let mut structure = FilterStructure::new();

    if collection.is_empty() || columns.is_empty() {
        return structure;
    }

    for column in columns {
        let entry = match column {
            FilterColumn::Range { parser, .. } => StructureEntry::Range {
                parser: parser.clone(),
            },
            FilterColumn::Checkboxes(name) => StructureEntry::Checkboxes {
                values: distinct_values(name, collection, sink),
            },
        };
        structure.insert(column.name(), entry);
    }

    structure
}

fn distinct_values<R: Record>(
    column: &str,
    collection: &[R],
    sink: &dyn DiagnosticSink,
) -> Vec<String> {
    let key = normalized(column);
    let mut values: Vec<String> = Vec::new();

    for record in collection {
        let Some(value) = record.field(&key) else {
            sink.report(Diagnostic::MissingColumn {
                column: key.clone(),
                record: record.record_id(),
                available: record.field_names(),
            });
            continue;
        };

        for element in value.elements() {
            let text = normalized(&element.to_string());
            if !text.is_empty() && !values.contains(&text) {
                values.push(text);
            }
        }
    }

    values
}
