//! Runtime value types produced by column accessors.
//!
//! A [`Primitive`] is a single scalar; a [`CellValue`] is what a column
//! yields for one record: either one primitive or a list of them (tags,
//! aliases, ...). [`RowId`] identifies the record a row was built from.

use std::cmp::Ordering;
use std::fmt;

/// A scalar cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Text value.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
}

impl Primitive {
    /// Returns `true` if this is a `Text` value.
    pub fn is_text(&self) -> bool {
        matches!(self, Primitive::Text(_))
    }

    /// Returns `true` if this is a `Number` value.
    pub fn is_number(&self) -> bool {
        matches!(self, Primitive::Number(_))
    }

    /// Returns `true` if this is a `Bool` value.
    pub fn is_bool(&self) -> bool {
        matches!(self, Primitive::Bool(_))
    }

    /// Extracts the text value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Primitive::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerces the value to a number for range comparison.
    ///
    /// Numbers pass through, booleans become `0`/`1`, and text is read with
    /// [`parse_leading_number`]. Returns `None` when no number can be read
    /// or the number is NaN.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Primitive::Number(n) if n.is_nan() => None,
            Primitive::Number(n) => Some(*n),
            Primitive::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Primitive::Text(s) => parse_leading_number(s),
        }
    }

    /// Orders primitives of different variants: numbers, then text, then booleans.
    pub(crate) fn type_rank(&self) -> u8 {
        match self {
            Primitive::Number(_) => 0,
            Primitive::Text(_) => 1,
            Primitive::Bool(_) => 2,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Text(s) => f.write_str(s),
            Primitive::Number(n) => write!(f, "{}", n),
            Primitive::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Reads the longest numeric prefix of `raw`, ignoring leading whitespace.
///
/// `"12.5kg"` reads as `12.5`, `"abc"` as `None`. Special float spellings
/// such as `inf` or `NaN` are not accepted.
pub fn parse_leading_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let candidate_len = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());

    (1..=candidate_len)
        .rev()
        .find_map(|len| trimmed[..len].parse::<f64>().ok())
        .filter(|n| !n.is_nan())
}

impl From<String> for Primitive {
    fn from(s: String) -> Self {
        Primitive::Text(s)
    }
}

impl From<&str> for Primitive {
    fn from(s: &str) -> Self {
        Primitive::Text(s.to_string())
    }
}

impl From<bool> for Primitive {
    fn from(b: bool) -> Self {
        Primitive::Bool(b)
    }
}

impl From<f64> for Primitive {
    fn from(n: f64) -> Self {
        Primitive::Number(n)
    }
}

impl From<f32> for Primitive {
    fn from(n: f32) -> Self {
        Primitive::Number(n as f64)
    }
}

impl From<i32> for Primitive {
    fn from(n: i32) -> Self {
        Primitive::Number(n as f64)
    }
}

impl From<i64> for Primitive {
    fn from(n: i64) -> Self {
        Primitive::Number(n as f64)
    }
}

impl From<u32> for Primitive {
    fn from(n: u32) -> Self {
        Primitive::Number(n as f64)
    }
}

impl From<u64> for Primitive {
    fn from(n: u64) -> Self {
        Primitive::Number(n as f64)
    }
}

impl From<usize> for Primitive {
    fn from(n: usize) -> Self {
        Primitive::Number(n as f64)
    }
}

/// The value a column yields for one record.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// A single scalar.
    Single(Primitive),
    /// Several scalars, e.g. a list of tags.
    List(Vec<Primitive>),
}

impl CellValue {
    /// Returns the scalars held by this value.
    pub fn elements(&self) -> &[Primitive] {
        match self {
            CellValue::Single(p) => std::slice::from_ref(p),
            CellValue::List(items) => items,
        }
    }

    /// Returns `true` if this is a `List` value.
    pub fn is_list(&self) -> bool {
        matches!(self, CellValue::List(_))
    }

    /// Extracts the single scalar, if this is not a list.
    pub fn as_single(&self) -> Option<&Primitive> {
        match self {
            CellValue::Single(p) => Some(p),
            CellValue::List(_) => None,
        }
    }

    /// Stringifies the value, joining list elements with `sep`.
    pub fn join(&self, sep: &str) -> String {
        match self {
            CellValue::Single(p) => p.to_string(),
            CellValue::List(items) => items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(sep),
        }
    }

    /// Compares two cell values for sorting.
    ///
    /// Same-variant scalars compare naturally (text case-insensitively with a
    /// byte-order tie-break). Mixed variants fall back to a fixed type rank:
    /// numbers, text, booleans, then lists. Lists compare element-wise.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Single(a), CellValue::Single(b)) => compare_primitives(a, b),
            (CellValue::List(a), CellValue::List(b)) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| compare_primitives(x, y))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (CellValue::Single(_), CellValue::List(_)) => Ordering::Less,
            (CellValue::List(_), CellValue::Single(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(", "))
    }
}

/// Compares two scalars, see [`CellValue::compare`].
pub fn compare_primitives(a: &Primitive, b: &Primitive) -> Ordering {
    match (a, b) {
        (Primitive::Text(a), Primitive::Text(b)) => a
            .to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b)),
        (Primitive::Number(a), Primitive::Number(b)) => a.total_cmp(b),
        (Primitive::Bool(a), Primitive::Bool(b)) => a.cmp(b),
        _ => a.type_rank().cmp(&b.type_rank()),
    }
}

impl From<Primitive> for CellValue {
    fn from(p: Primitive) -> Self {
        CellValue::Single(p)
    }
}

macro_rules! single_cell_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CellValue {
                fn from(v: $ty) -> Self {
                    CellValue::Single(Primitive::from(v))
                }
            }
        )*
    };
}

single_cell_from!(String, &str, bool, f32, f64, i32, i64, u32, u64, usize);

impl<P: Into<Primitive>> From<Vec<P>> for CellValue {
    fn from(items: Vec<P>) -> Self {
        CellValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Identifier of the record a row was built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowId {
    /// Integer identifier.
    Int(i64),
    /// String identifier.
    Text(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Int(n) => write!(f, "{}", n),
            RowId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowId {
    fn from(n: i64) -> Self {
        RowId::Int(n)
    }
}

impl From<i32> for RowId {
    fn from(n: i32) -> Self {
        RowId::Int(n as i64)
    }
}

impl From<u32> for RowId {
    fn from(n: u32) -> Self {
        RowId::Int(n as i64)
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        RowId::Text(s)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        RowId::Text(s.to_string())
    }
}
