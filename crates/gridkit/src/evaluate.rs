//! Search and filter evaluation.
//!
//! A row is kept when it passes the search *and* every active column
//! filter:
//!
//! ```text
//! keep = (search blank OR some cell contains the search text)
//!      ∧ (for every active filter entry: the row's cell is accepted)
//! ```
//!
//! For list-valued cells every element must be accepted by the column's
//! filter. Filter entries for columns the row does not have impose no
//! constraint.

use crate::column::RangeParser;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::filter::{Bound, ColumnFilter, TableFilter};
use crate::mapper::RowData;
use crate::normalize::{contains_normalized, same_normalized};
use crate::value::{CellValue, Primitive};

/// Separator used when searching inside list-valued cells.
const SEARCH_LIST_SEPARATOR: &str = ",";

/// Search text and filter state for one evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterArgs<'a> {
    pub search: Option<&'a str>,
    pub filter: Option<&'a TableFilter>,
}

impl<'a> FilterArgs<'a> {
    /// Arguments that keep every row.
    pub fn new() -> Self {
        FilterArgs::default()
    }

    /// Sets the search text.
    pub fn search(mut self, search: &'a str) -> Self {
        self.search = Some(search);
        self
    }

    /// Sets the filter state.
    pub fn filter(mut self, filter: &'a TableFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Returns the rows passing search and filter, cloned, in input order.
pub fn filter_data(rows: &[RowData], args: &FilterArgs<'_>) -> Vec<RowData> {
    filter_data_with(rows, args, &TracingSink)
}

/// Like [`filter_data`], reporting unreadable range values to `sink`.
pub fn filter_data_with(
    rows: &[RowData],
    args: &FilterArgs<'_>,
    sink: &dyn DiagnosticSink,
) -> Vec<RowData> {
    filter_rows(rows, args, sink).into_iter().cloned().collect()
}

/// Returns references to the rows passing search and filter, in input order.
pub fn filter_rows<'r>(
    rows: &'r [RowData],
    args: &FilterArgs<'_>,
    sink: &dyn DiagnosticSink,
) -> Vec<&'r RowData> {
    rows.iter().filter(|row| row_matches(row, args, sink)).collect()
}

/// Tests a single row against search and filter.
pub fn row_matches(row: &RowData, args: &FilterArgs<'_>, sink: &dyn DiagnosticSink) -> bool {
    passes_search(row, args.search)
        && args
            .filter
            .map_or(true, |filter| passes_filter(row, filter, sink))
}

fn passes_search(row: &RowData, search: Option<&str>) -> bool {
    let Some(search) = search.filter(|s| !s.trim().is_empty()) else {
        return true;
    };

    row.data
        .values()
        .any(|cell| contains_normalized(&cell.value.join(SEARCH_LIST_SEPARATOR), search))
}

fn passes_filter(row: &RowData, filter: &TableFilter, sink: &dyn DiagnosticSink) -> bool {
    filter
        .iter()
        .filter(|(_, entry)| entry.is_active())
        .all(|(column, entry)| match row.data.get(column) {
            Some(cell) => accepts(column, entry, &cell.value, sink),
            None => true,
        })
}

fn accepts(
    column: &str,
    entry: &ColumnFilter,
    value: &CellValue,
    sink: &dyn DiagnosticSink,
) -> bool {
    match entry {
        ColumnFilter::Checkboxes { checked, .. } => value
            .elements()
            .iter()
            .all(|element| checkbox_accepts(checked, element)),
        ColumnFilter::Range { min, max, parser } => {
            let range = ResolvedRange::new(min.as_ref(), max.as_ref(), parser.as_ref());
            value
                .elements()
                .iter()
                .all(|element| range.accepts(column, element, sink))
        }
    }
}

fn checkbox_accepts(checked: &[String], value: &Primitive) -> bool {
    let text = value.to_string();
    checked.iter().any(|token| same_normalized(token, &text))
}

struct ResolvedRange<'a> {
    min: Option<f64>,
    max: Option<f64>,
    parser: Option<&'a RangeParser>,
}

impl<'a> ResolvedRange<'a> {
    fn new(min: Option<&Bound>, max: Option<&Bound>, parser: Option<&'a RangeParser>) -> Self {
        ResolvedRange {
            min: min.and_then(|b| b.resolve(parser)),
            max: max.and_then(|b| b.resolve(parser)),
            parser,
        }
    }

    fn accepts(&self, column: &str, value: &Primitive, sink: &dyn DiagnosticSink) -> bool {
        let number = match self.parser {
            Some(parser) => parser.parse(value),
            None => value.to_number(),
        };

        let Some(n) = number else {
            sink.report(Diagnostic::InvalidNumber {
                column: column.to_string(),
                value: value.to_string(),
            });
            return true;
        };

        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= n && n <= max,
            (Some(min), None) => n >= min,
            (None, Some(max)) => n <= max,
            (None, None) => true,
        }
    }
}
