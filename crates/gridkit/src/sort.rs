//! Sorting and page slicing.
//!
//! [`sort_and_paginate`] sorts the complete (already filtered) set, then
//! slices the requested page out of it, so page boundaries stay put when
//! the user moves between pages.
//!
//! The sort is stable. Rows that have no usable value for the sort column
//! (the column is missing, or a date/number column holds something that
//! cannot be read) go after every readable row in both directions, keeping
//! their input order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::column::{parse_date_millis, ColumnKind};
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::mapper::{CellData, RowData};
use crate::normalize::same_normalized;
use crate::pagination::{page_range, Pagination};
use crate::value::{CellValue, Primitive};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, SortDirection::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, SortDirection::Desc)
    }

    /// The other direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Orients an ascending comparison result for this direction.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// `"asc"` or `"desc"`.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The column to sort by and in which direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Column name, matched case-insensitively.
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on `column`.
    pub fn asc(column: impl Into<String>) -> Self {
        SortSpec::new(column, SortDirection::Asc)
    }

    /// Descending sort on `column`.
    pub fn desc(column: impl Into<String>) -> Self {
        SortSpec::new(column, SortDirection::Desc)
    }

    /// Sort on `column` in `direction`.
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        SortSpec {
            column: column.into(),
            direction,
        }
    }
}

/// Sort and page request for [`sort_and_paginate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortArgs {
    pub sort: Option<SortSpec>,
    pub pagination: Option<Pagination>,
}

impl SortArgs {
    /// No sort and no pagination.
    pub fn new() -> Self {
        SortArgs::default()
    }

    /// Sets the sort.
    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the page to slice out.
    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

/// Next sort after the user clicks `column`'s header.
///
/// Clicking the column already sorted on flips its direction; any other
/// column starts ascending.
pub fn toggle_sort(current: Option<&SortSpec>, column: &str) -> SortSpec {
    match current {
        Some(spec) if same_normalized(&spec.column, column) => {
            SortSpec::new(spec.column.clone(), spec.direction.toggled())
        }
        _ => SortSpec::asc(column),
    }
}

/// Sorts `rows` and returns the requested page, reporting unreadable dates
/// and numbers through `tracing`.
pub fn sort_and_paginate(rows: &[RowData], args: &SortArgs) -> Vec<RowData> {
    sort_and_paginate_with(rows, args, &TracingSink)
}

/// Like [`sort_and_paginate`], reporting to `sink`.
pub fn sort_and_paginate_with(
    rows: &[RowData],
    args: &SortArgs,
    sink: &dyn DiagnosticSink,
) -> Vec<RowData> {
    let mut refs: Vec<&RowData> = rows.iter().collect();
    if let Some(spec) = &args.sort {
        sort_rows(&mut refs, spec, sink);
    }
    paginate(&refs, args.pagination.as_ref())
        .iter()
        .map(|row| (*row).clone())
        .collect()
}

/// The page of `rows` selected by `pagination`.
pub fn paginate<'a, T>(rows: &'a [T], pagination: Option<&Pagination>) -> &'a [T] {
    &rows[page_range(pagination, rows.len())]
}

/// Stable in-place sort by `spec`.
///
/// Leaves the order untouched when no row has the sort column.
pub fn sort_rows(rows: &mut [&RowData], spec: &SortSpec, sink: &dyn DiagnosticSink) {
    if !rows.iter().any(|row| row.get(&spec.column).is_some()) {
        return;
    }

    let mut keyed: Vec<(SortKey<'_>, &RowData)> = rows
        .iter()
        .copied()
        .map(|row| (SortKey::of(row.get(&spec.column), &spec.column, sink), row))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| a.compare(b, spec.direction));

    for (slot, (_, row)) in rows.iter_mut().zip(keyed) {
        *slot = row;
    }
}

/// A row's precomputed position in the sort.
enum SortKey<'a> {
    Number(f64),
    Value(&'a CellValue),
    /// Missing or unreadable, always after readable keys.
    Last,
}

impl<'a> SortKey<'a> {
    fn of(cell: Option<&'a CellData>, column: &str, sink: &dyn DiagnosticSink) -> Self {
        let Some(cell) = cell else {
            return SortKey::Last;
        };

        match cell.kind {
            ColumnKind::Text => SortKey::Value(&cell.value),
            ColumnKind::Number => match cell.value.as_single().and_then(Primitive::to_number) {
                Some(n) => SortKey::Number(n),
                None => {
                    sink.report(Diagnostic::InvalidNumber {
                        column: column.to_string(),
                        value: cell.value.to_string(),
                    });
                    SortKey::Last
                }
            },
            ColumnKind::Date => match cell.value.as_single().and_then(date_millis) {
                Some(ms) => SortKey::Number(ms),
                None => {
                    sink.report(Diagnostic::InvalidDate {
                        column: column.to_string(),
                        value: cell.value.to_string(),
                    });
                    SortKey::Last
                }
            },
        }
    }

    fn compare(&self, other: &SortKey<'_>, direction: SortDirection) -> Ordering {
        match (self, other) {
            (SortKey::Last, SortKey::Last) => Ordering::Equal,
            (SortKey::Last, _) => Ordering::Greater,
            (_, SortKey::Last) => Ordering::Less,
            (SortKey::Number(a), SortKey::Number(b)) => direction.apply(a.total_cmp(b)),
            (SortKey::Value(a), SortKey::Value(b)) => direction.apply(a.compare(b)),
            (SortKey::Number(_), SortKey::Value(_)) => direction.apply(Ordering::Less),
            (SortKey::Value(_), SortKey::Number(_)) => direction.apply(Ordering::Greater),
        }
    }
}

fn date_millis(value: &Primitive) -> Option<f64> {
    match value {
        Primitive::Text(s) => parse_date_millis(s).map(|ms| ms as f64),
        Primitive::Number(n) if n.is_finite() => Some(*n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{CollectingSink, SilentSink};
    use crate::value::RowId;

    fn row(id: i64, cells: Vec<(&str, CellValue, ColumnKind)>) -> RowData {
        RowData {
            id: RowId::Int(id),
            data: cells
                .into_iter()
                .map(|(k, value, kind)| {
                    let cell = CellData {
                        value,
                        presenter: None,
                        kind,
                    };
                    (k.to_string(), cell)
                })
                .collect(),
        }
    }

    fn ids(rows: &[RowData]) -> Vec<i64> {
        rows.iter()
            .map(|r| match r.id {
                RowId::Int(n) => n,
                _ => -1,
            })
            .collect()
    }

    fn sorted_ids(rows: &[RowData], spec: SortSpec) -> Vec<i64> {
        ids(&sort_and_paginate_with(rows, &SortArgs::new().sort(spec), &SilentSink))
    }

    fn named(names: &[&str]) -> Vec<RowData> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| row(i as i64, vec![("name", (*name).into(), ColumnKind::Text)]))
            .collect()
    }

    #[test]
    fn direction_apply() {
        assert_eq!(SortDirection::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::default(), SortDirection::Asc);
        assert_eq!(SortDirection::Desc.to_string(), "desc");
    }

    #[test]
    fn direction_serde() {
        let spec: SortSpec = serde_json::from_str(r#"{"column":"age"}"#).unwrap();
        assert_eq!(spec, SortSpec::asc("age"));
        let json = r#"{"column":"age","direction":"desc"}"#;
        let spec: SortSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec, SortSpec::desc("age"));
    }

    #[test]
    fn text_sorts_case_insensitively() {
        let rows = named(&["banana", "Apple", "cherry"]);
        assert_eq!(sorted_ids(&rows, SortSpec::asc("Name")), vec![1, 0, 2]);
        assert_eq!(sorted_ids(&rows, SortSpec::desc("name")), vec![2, 0, 1]);
    }

    #[test]
    fn numbers_sort_numerically() {
        let rows: Vec<_> = [10, 5, 100]
            .iter()
            .enumerate()
            .map(|(i, n)| row(i as i64, vec![("age", (*n).into(), ColumnKind::Text)]))
            .collect();
        assert_eq!(sorted_ids(&rows, SortSpec::asc("age")), vec![1, 0, 2]);
    }

    #[test]
    fn booleans_sort_false_first() {
        let rows: Vec<_> = [true, false]
            .iter()
            .enumerate()
            .map(|(i, b)| row(i as i64, vec![("done", (*b).into(), ColumnKind::Text)]))
            .collect();
        assert_eq!(sorted_ids(&rows, SortSpec::asc("done")), vec![1, 0]);
    }

    #[test]
    fn sort_is_stable() {
        let rows = named(&["b", "a", "B", "a"]);
        assert_eq!(sorted_ids(&rows, SortSpec::asc("name")), vec![1, 3, 2, 0]);
    }

    #[test]
    fn unknown_column_keeps_order() {
        let rows = named(&["b", "a", "c"]);
        assert_eq!(sorted_ids(&rows, SortSpec::desc("colour")), vec![0, 1, 2]);
    }

    #[test]
    fn invalid_dates_sort_last_both_ways() {
        let rows = vec![
            row(0, vec![("birth", "2020-07-14".into(), ColumnKind::Date)]),
            row(1, vec![("birth", "soon".into(), ColumnKind::Date)]),
            row(2, vec![("birth", "2012-07-14".into(), ColumnKind::Date)]),
        ];

        let sink = CollectingSink::new();
        let args = SortArgs::new().sort(SortSpec::asc("birth"));
        let asc = sort_and_paginate_with(&rows, &args, &sink);
        assert_eq!(ids(&asc), vec![2, 0, 1]);
        assert_eq!(
            sink.take(),
            vec![Diagnostic::InvalidDate {
                column: "birth".into(),
                value: "soon".into(),
            }]
        );

        let args = SortArgs::new().sort(SortSpec::desc("birth"));
        let desc = sort_and_paginate_with(&rows, &args, &sink);
        assert_eq!(ids(&desc), vec![0, 2, 1]);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn unreadable_numbers_sort_last() {
        let rows = vec![
            row(0, vec![("age", "n/a".into(), ColumnKind::Number)]),
            row(1, vec![("age", "12".into(), ColumnKind::Number)]),
            row(2, vec![("age", "9".into(), ColumnKind::Number)]),
        ];
        let sink = CollectingSink::new();
        let args = SortArgs::new().sort(SortSpec::desc("age"));
        let desc = sort_and_paginate_with(&rows, &args, &sink);
        assert_eq!(ids(&desc), vec![1, 2, 0]);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn sorts_whole_set_before_slicing() {
        let rows = named(&["d", "c", "b", "a"]);
        let args = SortArgs::new()
            .sort(SortSpec::asc("name"))
            .pagination(Pagination::new(0, 2));
        assert_eq!(ids(&sort_and_paginate_with(&rows, &args, &SilentSink)), vec![3, 2]);

        let args = args.pagination(Pagination::new(1, 2));
        assert_eq!(ids(&sort_and_paginate_with(&rows, &args, &SilentSink)), vec![1, 0]);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let rows = named(&["a", "b"]);
        let args = SortArgs::new().pagination(Pagination::new(5, 2));
        assert!(sort_and_paginate_with(&rows, &args, &SilentSink).is_empty());
    }

    #[test]
    fn toggling() {
        let first = toggle_sort(None, "age");
        assert_eq!(first, SortSpec::asc("age"));

        let flipped = toggle_sort(Some(&first), "AGE");
        assert_eq!(flipped, SortSpec::desc("age"));

        let back = toggle_sort(Some(&flipped), "age");
        assert_eq!(back, SortSpec::asc("age"));

        assert_eq!(toggle_sort(Some(&flipped), "name"), SortSpec::asc("name"));
    }
}
