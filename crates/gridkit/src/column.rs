//! Column definitions and filterable-column declarations.
//!
//! A [`Column`] projects an entity onto a cell value and optionally knows
//! how to present it. A [`FilterColumn`] declares which columns get a
//! filter control and of which kind.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::normalize::normalized;
use crate::value::{CellValue, Primitive};

type Accessor<T> = Arc<dyn Fn(&T) -> CellValue + Send + Sync>;

/// How a column's values should be compared when sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Values compare by their natural type.
    #[default]
    Text,
    /// Values compare numerically.
    Number,
    /// Text values are parsed as dates; unparseable dates sort last.
    Date,
}

/// Turns a cell value into display text.
#[derive(Clone)]
pub struct Presenter(Arc<dyn Fn(&CellValue) -> String + Send + Sync>);

impl Presenter {
    /// Wraps a presenting function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&CellValue) -> String + Send + Sync + 'static,
    {
        Presenter(Arc::new(f))
    }

    /// Presents a value.
    pub fn present(&self, value: &CellValue) -> String {
        (self.0)(value)
    }
}

impl fmt::Debug for Presenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Presenter(..)")
    }
}

impl PartialEq for Presenter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A table column: a named projection from `T` to a [`CellValue`].
///
/// # Example
///
/// ```
/// use gridkit::{Column, ColumnKind};
///
/// struct Animal { name: String, age: u32 }
///
/// let columns = vec![
///     Column::new("Name", |a: &Animal| a.name.clone()),
///     Column::new("Age", |a: &Animal| a.age).with_kind(ColumnKind::Number),
/// ];
///
/// assert_eq!(columns[1].key(), "age");
/// ```
pub struct Column<T> {
    name: String,
    key: String,
    accessor: Accessor<T>,
    presenter: Option<Presenter>,
    kind: ColumnKind,
}

impl<T> Column<T> {
    /// Creates a text column from a name and an accessor.
    pub fn new<F, V>(name: impl Into<String>, accessor: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<CellValue>,
    {
        let name = name.into();
        Column {
            key: normalized(&name),
            name,
            accessor: Arc::new(move |item: &T| accessor(item).into()),
            presenter: None,
            kind: ColumnKind::Text,
        }
    }

    /// Sets the presenter used to display this column's values.
    pub fn with_presenter<F>(mut self, presenter: F) -> Self
    where
        F: Fn(&CellValue) -> String + Send + Sync + 'static,
    {
        self.presenter = Some(Presenter::new(presenter));
        self
    }

    /// Sets the comparison kind.
    pub fn with_kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    /// The user-facing column label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The normalized name every lookup keys off.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The comparison kind.
    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// The presenter, if any.
    pub fn presenter(&self) -> Option<&Presenter> {
        self.presenter.as_ref()
    }

    /// Extracts this column's value from an entity.
    pub fn value(&self, item: &T) -> CellValue {
        (self.accessor)(item)
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Column {
            name: self.name.clone(),
            key: self.key.clone(),
            accessor: Arc::clone(&self.accessor),
            presenter: self.presenter.clone(),
            kind: self.kind,
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("presenter", &self.presenter.is_some())
            .finish()
    }
}

/// Maps a raw comparable (a date string, say) to a number for range filtering.
///
/// Two parsers are equal only if they share the same underlying function,
/// which is what filter-state comparisons need: a reset must keep the very
/// parser the filter was built with.
#[derive(Clone)]
pub struct RangeParser {
    label: &'static str,
    parse: Arc<dyn Fn(&Primitive) -> Option<f64> + Send + Sync>,
}

impl RangeParser {
    /// Wraps a parsing function under a label used in debug output.
    pub fn new<F>(label: &'static str, parse: F) -> Self
    where
        F: Fn(&Primitive) -> Option<f64> + Send + Sync + 'static,
    {
        RangeParser {
            label,
            parse: Arc::new(parse),
        }
    }

    /// Parses dates to milliseconds since the Unix epoch.
    ///
    /// Text goes through [`parse_date_millis`]; numbers are taken to be
    /// epoch milliseconds already.
    pub fn date() -> Self {
        RangeParser::new("date", |value| match value {
            Primitive::Text(s) => parse_date_millis(s).map(|ms| ms as f64),
            Primitive::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        })
    }

    /// Parses a value, returning `None` if it has no numeric reading.
    pub fn parse(&self, value: &Primitive) -> Option<f64> {
        (self.parse)(value)
    }

    /// The label given at construction.
    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl fmt::Debug for RangeParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RangeParser({})", self.label)
    }
}

impl PartialEq for RangeParser {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.parse, &other.parse)
    }
}

/// Parses a date or date-time string to milliseconds since the Unix epoch.
///
/// Accepts RFC 3339 (`2015-07-14T10:00:00Z`), `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DDTHH:MM:SS` and plain `YYYY-MM-DD`. Naive values are read as UTC.
pub fn parse_date_millis(raw: &str) -> Option<i64> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }

    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Declares a filterable column and the kind of control it gets.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterColumn {
    /// One checkbox per distinct value observed in the collection.
    Checkboxes(String),
    /// A `[min, max]` range, optionally read through a parser.
    Range {
        name: String,
        parser: Option<RangeParser>,
    },
}

impl FilterColumn {
    /// Declares a checkboxes filter.
    pub fn checkboxes(name: impl Into<String>) -> Self {
        FilterColumn::Checkboxes(name.into())
    }

    /// Declares a numeric range filter.
    pub fn range(name: impl Into<String>) -> Self {
        FilterColumn::Range {
            name: name.into(),
            parser: None,
        }
    }

    /// Declares a range filter whose values are read through `parser`.
    pub fn range_with(name: impl Into<String>, parser: RangeParser) -> Self {
        FilterColumn::Range {
            name: name.into(),
            parser: Some(parser),
        }
    }

    /// The declared column name.
    pub fn name(&self) -> &str {
        match self {
            FilterColumn::Checkboxes(name) | FilterColumn::Range { name, .. } => name,
        }
    }

    /// The normalized column name.
    pub fn key(&self) -> String {
        normalized(self.name())
    }

    /// Returns `true` for range declarations.
    pub fn is_range(&self) -> bool {
        matches!(self, FilterColumn::Range { .. })
    }
}

impl From<&str> for FilterColumn {
    fn from(name: &str) -> Self {
        FilterColumn::Checkboxes(name.to_string())
    }
}

impl From<String> for FilterColumn {
    fn from(name: String) -> Self {
        FilterColumn::Checkboxes(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Animal {
        name: String,
        age: u32,
    }

    #[test]
    fn column_keys_are_normalized() {
        let column = Column::new(" Name ", |a: &Animal| a.name.clone());
        assert_eq!(column.name(), " Name ");
        assert_eq!(column.key(), "name");
        assert_eq!(column.kind(), ColumnKind::Text);
    }

    #[test]
    fn column_extracts_and_presents() {
        let column = Column::new("Age", |a: &Animal| a.age)
            .with_kind(ColumnKind::Number)
            .with_presenter(|v| format!("{} years", v));
        let cat = Animal {
            name: "Cat".into(),
            age: 10,
        };

        let value = column.value(&cat);
        assert_eq!(value, CellValue::from(10u32));
        assert_eq!(column.presenter().map(|p| p.present(&value)).as_deref(), Some("10 years"));
    }

    #[test]
    fn cloned_columns_share_presenters() {
        let column = Column::new("Age", |a: &Animal| a.age).with_presenter(|v| v.to_string());
        let copy = column.clone();
        assert_eq!(column.presenter(), copy.presenter());
    }

    #[test]
    fn parses_dates() {
        assert_eq!(parse_date_millis("1970-01-02"), Some(86_400_000));
        assert_eq!(parse_date_millis("1970-01-01 00:00:01"), Some(1_000));
        assert_eq!(parse_date_millis("1970-01-01T00:00:01Z"), Some(1_000));
        assert_eq!(parse_date_millis("1970-01-01T02:00:00+02:00"), Some(0));
        assert_eq!(parse_date_millis("invalid"), None);
        assert_eq!(parse_date_millis("2015-13-40"), None);
    }

    #[test]
    fn date_parser_reads_text_and_numbers() {
        let parser = RangeParser::date();
        assert_eq!(parser.parse(&"1970-01-02".into()), Some(86_400_000.0));
        assert_eq!(parser.parse(&Primitive::Number(5.0)), Some(5.0));
        assert_eq!(parser.parse(&Primitive::Bool(true)), None);
        assert_eq!(parser.label(), "date");
    }

    #[test]
    fn parsers_compare_by_identity() {
        let a = RangeParser::date();
        let b = RangeParser::date();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn filter_column_declarations() {
        let family: FilterColumn = "Family".into();
        assert_eq!(family, FilterColumn::checkboxes("Family"));
        assert!(!family.is_range());
        assert_eq!(family.key(), "family");

        let age = FilterColumn::range("Age");
        assert!(age.is_range());
        assert_eq!(age.name(), "Age");
    }
}
