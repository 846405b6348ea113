//! Live filter state: the structure plus the user's current selections.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::column::{FilterColumn, RangeParser};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::normalize::normalized;
use crate::record::Record;
use crate::structure::{build_filter_structure_with, FilterStructure, StructureEntry};
use crate::value::{parse_leading_number, Primitive};

/// One end of a range filter, as entered by the user.
///
/// Text bounds are kept verbatim when a parser will read them (dates, for
/// instance); otherwise the reducer stores numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Number(f64),
    Text(String),
}

impl Bound {
    /// Reads the bound as a number, through `parser` when one is given.
    ///
    /// Returns `None` for blank or unreadable bounds, which then impose no
    /// constraint.
    pub fn resolve(&self, parser: Option<&RangeParser>) -> Option<f64> {
        match (self, parser) {
            (Bound::Text(s), _) if s.trim().is_empty() => None,
            (Bound::Number(n), _) if n.is_nan() => None,
            (Bound::Number(n), Some(p)) => p.parse(&Primitive::Number(*n)),
            (Bound::Text(s), Some(p)) => p.parse(&Primitive::Text(s.clone())),
            (Bound::Number(n), None) => Some(*n),
            (Bound::Text(s), None) => parse_leading_number(s),
        }
    }
}

impl From<f64> for Bound {
    fn from(n: f64) -> Self {
        Bound::Number(n)
    }
}

impl From<i32> for Bound {
    fn from(n: i32) -> Self {
        Bound::Number(n as f64)
    }
}

impl From<&str> for Bound {
    fn from(s: &str) -> Self {
        Bound::Text(s.to_string())
    }
}

impl From<String> for Bound {
    fn from(s: String) -> Self {
        Bound::Text(s)
    }
}

/// The live filter for one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Checkbox selection over the column's observed values.
    Checkboxes {
        values: Vec<String>,
        checked: Vec<String>,
    },
    /// Inclusive numeric range.
    Range {
        min: Option<Bound>,
        max: Option<Bound>,
        parser: Option<RangeParser>,
    },
}

impl ColumnFilter {
    /// A checkboxes filter offering `values`, nothing checked.
    pub fn checkboxes(values: Vec<String>) -> Self {
        ColumnFilter::Checkboxes {
            values,
            checked: Vec::new(),
        }
    }

    /// A range filter with no bounds.
    pub fn range(parser: Option<RangeParser>) -> Self {
        ColumnFilter::Range {
            min: None,
            max: None,
            parser,
        }
    }

    /// `"checkboxes"` or `"range"`.
    pub fn kind(&self) -> &'static str {
        match self {
            ColumnFilter::Checkboxes { .. } => "checkboxes",
            ColumnFilter::Range { .. } => "range",
        }
    }

    /// Returns `true` if this filter currently constrains rows.
    pub fn is_active(&self) -> bool {
        match self {
            ColumnFilter::Checkboxes { checked, .. } => !checked.is_empty(),
            ColumnFilter::Range { min, max, .. } => min.is_some() || max.is_some(),
        }
    }

    /// The same filter with selections cleared, keeping values and parser.
    pub fn pristine(&self) -> Self {
        match self {
            ColumnFilter::Checkboxes { values, .. } => ColumnFilter::checkboxes(values.clone()),
            ColumnFilter::Range { parser, .. } => ColumnFilter::range(parser.clone()),
        }
    }
}

impl From<&StructureEntry> for ColumnFilter {
    fn from(entry: &StructureEntry) -> Self {
        match entry {
            StructureEntry::Checkboxes { values } => ColumnFilter::checkboxes(values.clone()),
            StructureEntry::Range { parser } => ColumnFilter::range(parser.clone()),
        }
    }
}

/// Live filter state keyed by normalized column name, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableFilter {
    entries: IndexMap<String, ColumnFilter>,
}

impl TableFilter {
    /// Creates an empty filter, which accepts every row.
    pub fn new() -> Self {
        TableFilter::default()
    }

    /// Pristine filter state for a structure.
    pub fn from_structure(structure: &FilterStructure) -> Self {
        let entries = structure
            .iter()
            .map(|(column, entry)| (column.to_string(), ColumnFilter::from(entry)))
            .collect();
        TableFilter { entries }
    }

    /// Adds or replaces the entry for `column`.
    pub fn insert(&mut self, column: &str, filter: ColumnFilter) {
        self.entries.insert(normalized(column), filter);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, column: &str, filter: ColumnFilter) -> Self {
        self.insert(column, filter);
        self
    }

    /// Looks up an entry by column name, case-insensitively.
    pub fn get(&self, column: &str) -> Option<&ColumnFilter> {
        self.entries.get(&normalized(column))
    }

    /// Iterates over `(normalized name, filter)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnFilter)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if any entry currently constrains rows.
    pub fn is_active(&self) -> bool {
        self.entries.values().any(ColumnFilter::is_active)
    }

    /// Lays a freshly built structure under the current selections.
    ///
    /// Entries come from `structure`. Checked values that the structure still
    /// offers are kept, and range bounds are kept when the column is still a
    /// range. Columns that disappeared are dropped.
    pub fn rebase(&self, structure: &FilterStructure) -> TableFilter {
        let entries = structure
            .iter()
            .map(|(column, entry)| {
                let fresh = ColumnFilter::from(entry);
                let merged = match (fresh, self.entries.get(column)) {
                    (
                        ColumnFilter::Checkboxes { values, .. },
                        Some(ColumnFilter::Checkboxes { checked, .. }),
                    ) => {
                        let checked = checked
                            .iter()
                            .filter(|c| values.contains(c))
                            .cloned()
                            .collect();
                        ColumnFilter::Checkboxes { values, checked }
                    }
                    (
                        ColumnFilter::Range { parser, .. },
                        Some(ColumnFilter::Range { min, max, .. }),
                    ) => {
                        ColumnFilter::Range {
                            min: min.clone(),
                            max: max.clone(),
                            parser,
                        }
                    }
                    (fresh, _) => fresh,
                };
                (column.to_string(), merged)
            })
            .collect();
        TableFilter { entries }
    }

    pub(crate) fn replace(&self, column: &str, filter: ColumnFilter) -> TableFilter {
        let mut next = self.clone();
        next.insert(column, filter);
        next
    }
}

/// Builds live filter state, reporting data anomalies through `tracing`.
pub fn build_filter<R: Record>(columns: &[FilterColumn], collection: &[R]) -> TableFilter {
    build_filter_with(columns, collection, &TracingSink)
}

/// Builds live filter state with nothing selected.
///
/// Same traversal as [`build_filter_structure`](crate::build_filter_structure):
/// checkbox entries start with `checked` empty, range entries without bounds.
pub fn build_filter_with<R: Record>(
    columns: &[FilterColumn],
    collection: &[R],
    sink: &dyn DiagnosticSink,
) -> TableFilter {
    TableFilter::from_structure(&build_filter_structure_with(columns, collection, sink))
}

/// Clears every selection while keeping checkbox values and range parsers.
pub fn reset_filter(filter: &TableFilter) -> TableFilter {
    let entries = filter
        .entries
        .iter()
        .map(|(column, entry)| (column.clone(), entry.pristine()))
        .collect();
    TableFilter { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableFilter {
        TableFilter::new()
            .with(
                "Family",
                ColumnFilter::Checkboxes {
                    values: vec!["feline".into(), "canine".into()],
                    checked: vec!["feline".into()],
                },
            )
            .with(
                "Age",
                ColumnFilter::Range {
                    min: Some(Bound::Number(8.0)),
                    max: None,
                    parser: None,
                },
            )
    }

    #[test]
    fn lookups_are_case_insensitive() {
        let filter = sample();
        assert!(filter.get("FAMILY").is_some());
        assert!(filter.get(" age").is_some());
        assert!(filter.get("type").is_none());
    }

    #[test]
    fn activity() {
        assert!(sample().is_active());
        assert!(!ColumnFilter::checkboxes(vec!["a".into()]).is_active());
        assert!(!ColumnFilter::range(None).is_active());
        assert!(!TableFilter::new().is_active());
    }

    #[test]
    fn reset_keeps_values_and_parsers() {
        let parser = RangeParser::date();
        let filter = sample().with(
            "Birth",
            ColumnFilter::Range {
                min: Some("2015-01-01".into()),
                max: Some("2020-01-01".into()),
                parser: Some(parser.clone()),
            },
        );

        let reset = reset_filter(&filter);

        assert_eq!(
            reset.get("family"),
            Some(&ColumnFilter::checkboxes(vec!["feline".into(), "canine".into()]))
        );
        assert_eq!(reset.get("age"), Some(&ColumnFilter::range(None)));
        assert_eq!(reset.get("birth"), Some(&ColumnFilter::range(Some(parser))));
        assert!(!reset.is_active());
    }

    #[test]
    fn bounds_resolve_to_numbers() {
        assert_eq!(Bound::from(8).resolve(None), Some(8.0));
        assert_eq!(Bound::from("15").resolve(None), Some(15.0));
        assert_eq!(Bound::from(" ").resolve(None), None);
        assert_eq!(Bound::from("soon").resolve(None), None);
        assert_eq!(Bound::Number(f64::NAN).resolve(None), None);

        let dates = RangeParser::date();
        assert_eq!(Bound::from("1970-01-02").resolve(Some(&dates)), Some(86_400_000.0));
    }

    #[test]
    fn rebase_keeps_surviving_selections() {
        let mut structure = FilterStructure::new();
        structure.insert(
            "family",
            StructureEntry::Checkboxes {
                values: vec!["canine".into(), "fish".into()],
            },
        );
        structure.insert("age", StructureEntry::Range { parser: None });

        let mut current = sample();
        current.insert(
            "family",
            ColumnFilter::Checkboxes {
                values: vec!["feline".into(), "canine".into()],
                checked: vec!["feline".into(), "canine".into()],
            },
        );

        let rebased = current.rebase(&structure);

        assert_eq!(
            rebased.get("family"),
            Some(&ColumnFilter::Checkboxes {
                values: vec!["canine".into(), "fish".into()],
                checked: vec!["canine".into()],
            })
        );
        assert_eq!(
            rebased.get("age"),
            Some(&ColumnFilter::Range {
                min: Some(Bound::Number(8.0)),
                max: None,
                parser: None,
            })
        );
    }

    #[test]
    fn rebase_drops_columns_that_changed_kind() {
        let mut structure = FilterStructure::new();
        structure.insert(
            "age",
            StructureEntry::Checkboxes {
                values: vec!["5".into()],
            },
        );

        let rebased = sample().rebase(&structure);

        assert_eq!(rebased.len(), 1);
        assert_eq!(rebased.get("age"), Some(&ColumnFilter::checkboxes(vec!["5".into()])));
    }
}
