//! Filter-state reducer.
//!
//! [`reduce`] is the only way filter state changes: a pure function from the
//! current [`TableFilter`] and a [`FilterAction`] to the next state. The
//! input is never modified, so consumers can detect changes by comparing
//! the old and new values.
//!
//! Actions that address the wrong kind of filter, or a column that has no
//! filter, are caller bugs and come back as errors.

use serde::{Deserialize, Serialize};

use crate::column::RangeParser;
use crate::error::{GridError, Result};
use crate::filter::{reset_filter, Bound, ColumnFilter, TableFilter};
use crate::normalize::{normalized, same_normalized};
use crate::value::parse_leading_number;

/// Which end of a range an action sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeTarget {
    Min,
    Max,
}

/// A discrete change to filter state.
///
/// The serialized form is tagged the way UI code dispatches actions:
///
/// ```
/// use gridkit::FilterAction;
///
/// let json = r#"{
///     "type": "TOGGLE_COLUMN",
///     "payload": {"column": "Family", "value": "Feline", "selected": true}
/// }"#;
/// let action = FilterAction::from_json(json).unwrap();
///
/// assert_eq!(action, FilterAction::toggle("Family", "Feline", true));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterAction {
    /// Check or uncheck one value of a checkboxes filter.
    ToggleColumn {
        column: String,
        value: String,
        selected: bool,
    },
    /// Set one end of a range filter.
    SetColumnRange {
        column: String,
        target: RangeTarget,
        value: Bound,
        #[serde(skip)]
        parser: Option<RangeParser>,
    },
    /// Clear every selection.
    ResetFilter,
}

const ACTION_TAGS: [&str; 3] = ["TOGGLE_COLUMN", "SET_COLUMN_RANGE", "RESET_FILTER"];

impl FilterAction {
    /// A [`ToggleColumn`](FilterAction::ToggleColumn) action.
    pub fn toggle(column: impl Into<String>, value: impl Into<String>, selected: bool) -> Self {
        FilterAction::ToggleColumn {
            column: column.into(),
            value: value.into(),
            selected,
        }
    }

    /// A [`SetColumnRange`](FilterAction::SetColumnRange) action without a parser.
    pub fn set_range(
        column: impl Into<String>,
        target: RangeTarget,
        value: impl Into<Bound>,
    ) -> Self {
        FilterAction::SetColumnRange {
            column: column.into(),
            target,
            value: value.into(),
            parser: None,
        }
    }

    /// A [`SetColumnRange`](FilterAction::SetColumnRange) action whose text
    /// value is to be read by `parser`.
    pub fn set_range_parsed(
        column: impl Into<String>,
        target: RangeTarget,
        value: impl Into<Bound>,
        parser: RangeParser,
    ) -> Self {
        FilterAction::SetColumnRange {
            column: column.into(),
            target,
            value: value.into(),
            parser: Some(parser),
        }
    }

    /// Decodes an action from its tagged JSON form.
    ///
    /// An unrecognized `type` is reported as [`GridError::UnknownAction`];
    /// any other decoding problem as [`GridError::MalformedAction`].
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: serde_json::Value =
            serde_json::from_str(json).map_err(GridError::MalformedAction)?;

        match raw.get("type").and_then(serde_json::Value::as_str) {
            Some(tag) if !ACTION_TAGS.contains(&tag) => {
                return Err(GridError::UnknownAction(tag.to_string()))
            }
            None => return Err(GridError::UnknownAction(String::new())),
            Some(_) => {}
        }

        serde_json::from_value(raw).map_err(GridError::MalformedAction)
    }
}

/// Applies `action` to `filter`, returning the next filter state.
pub fn reduce(filter: &TableFilter, action: &FilterAction) -> Result<TableFilter> {
    match action {
        FilterAction::ToggleColumn {
            column,
            value,
            selected,
        } => toggle_column(filter, column, value, *selected),
        FilterAction::SetColumnRange {
            column,
            target,
            value,
            parser,
        } => set_column_range(filter, column, *target, value, parser.as_ref()),
        FilterAction::ResetFilter => Ok(reset_filter(filter)),
    }
}

fn toggle_column(
    filter: &TableFilter,
    column: &str,
    value: &str,
    selected: bool,
) -> Result<TableFilter> {
    let (values, checked) = match lookup(filter, column)? {
        ColumnFilter::Checkboxes { values, checked } => (values, checked),
        other => return Err(kind_mismatch(column, "checkboxes", other)),
    };

    let value = normalized(value);
    if !values.contains(&value) {
        return Err(GridError::UnknownFilterValue {
            column: normalized(column),
            value,
        });
    }

    let mut checked = checked.clone();
    if selected {
        if !checked.contains(&value) {
            checked.push(value);
        }
    } else if let Some(pos) = checked.iter().position(|c| same_normalized(c, &value)) {
        checked.remove(pos);
    }

    Ok(filter.replace(
        column,
        ColumnFilter::Checkboxes {
            values: values.clone(),
            checked,
        },
    ))
}

fn set_column_range(
    filter: &TableFilter,
    column: &str,
    target: RangeTarget,
    value: &Bound,
    action_parser: Option<&RangeParser>,
) -> Result<TableFilter> {
    let (min, max, parser) = match lookup(filter, column)? {
        ColumnFilter::Range { min, max, parser } => (min, max, parser),
        other => return Err(kind_mismatch(column, "range", other)),
    };

    let parser = parser.clone().or_else(|| action_parser.cloned());
    let bound = match value {
        Bound::Text(raw) if raw.trim().is_empty() => None,
        Bound::Text(raw) if parser.is_some() => Some(Bound::Text(raw.trim().to_string())),
        Bound::Text(raw) => Some(
            parse_leading_number(raw)
                .map(Bound::Number)
                .unwrap_or_else(|| Bound::Text(raw.clone())),
        ),
        Bound::Number(n) => Some(Bound::Number(*n)),
    };

    let (min, max) = match target {
        RangeTarget::Min => (bound, max.clone()),
        RangeTarget::Max => (min.clone(), bound),
    };

    Ok(filter.replace(column, ColumnFilter::Range { min, max, parser }))
}

fn lookup<'f>(filter: &'f TableFilter, column: &str) -> Result<&'f ColumnFilter> {
    filter
        .get(column)
        .ok_or_else(|| GridError::UnknownFilterColumn(normalized(column)))
}

fn kind_mismatch(column: &str, expected: &'static str, actual: &ColumnFilter) -> GridError {
    GridError::FilterKindMismatch {
        column: normalized(column),
        expected,
        actual: actual.kind(),
    }
}
