/// DataTable View Implementation
///
/// Views are read-only index mappings over the projected dataset. Each view takes a list
/// of source row indices and produces a new list: `FilterView` keeps the rows matching a
/// predicate, `SortedView` orders them by one column and `PageWindow` slices out one page.
/// The table model chains them to derive the rows it shows.

use crate::column::{parse_integer_prefix, Column, ColumnType, ColumnValue};
use crate::table::Dataset;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Row predicate built from the text typed into a filter input.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive substring match. Holds the upper-cased needle.
    Contains(String),
    /// Numeric equality against the integer prefix of the typed text.
    EqualsNumber(f64),
    /// The typed text has no integer prefix, so no row can match.
    MatchNone,
}

impl Predicate {
    /// Build the predicate a filter input of `column` applies for `value`.
    pub fn for_column(column: &Column, value: &str) -> Self {
        match column.column_type() {
            ColumnType::String => Predicate::Contains(value.to_uppercase()),
            ColumnType::Numeric => match parse_integer_prefix(value) {
                Some(n) => Predicate::EqualsNumber(n),
                None => Predicate::MatchNone,
            },
        }
    }

    pub fn matches(&self, value: &ColumnValue) -> bool {
        match self {
            Predicate::Contains(needle) => value.display_text().to_uppercase().contains(needle.as_str()),
            // null reads as zero when sorting but equals no number
            Predicate::EqualsNumber(n) => !value.is_null() && value.to_number() == Some(*n),
            Predicate::MatchNone => false,
        }
    }
}

/// A FilterView keeps the source rows whose value in one column matches a predicate.
/// Source order is preserved.
#[derive(Debug, Clone)]
pub struct FilterView {
    view_to_parent: Vec<usize>,
}

impl FilterView {
    pub fn new(dataset: &Dataset, source: &[usize], column: usize, predicate: Predicate) -> Self {
        let view_to_parent = source
            .iter()
            .copied()
            .filter(|&row| predicate.matches(dataset.value(row, column)))
            .collect();

        FilterView { view_to_parent }
    }

    pub fn len(&self) -> usize {
        self.view_to_parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view_to_parent.is_empty()
    }

    /// Returns the dataset row index for a given view position
    pub fn get_parent_index(&self, view_index: usize) -> Option<usize> {
        self.view_to_parent.get(view_index).copied()
    }

    pub fn indices(&self) -> &[usize] {
        &self.view_to_parent
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.view_to_parent
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order (smallest first)
    Ascending,
    /// Descending order (largest first)
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortOrder::Ascending
    }
}

/// A sort key: one column and a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    /// Column position within the schema
    pub column: usize,
    pub order: SortOrder,
}

impl SortKey {
    pub fn ascending(column: usize) -> Self {
        SortKey {
            column,
            order: SortOrder::Ascending,
        }
    }

    pub fn descending(column: usize) -> Self {
        SortKey {
            column,
            order: SortOrder::Descending,
        }
    }
}

/// A SortedView presents source rows ordered by a single column.
///
/// String columns compare lexically by UTF-16 code units. A descending string sort is the ascending stable
/// sort reversed, so rows with equal keys come out in reverse source order. Numeric
/// columns compare by value and a descending sort flips the comparator, so rows with
/// equal keys keep their source order. Values without a numeric reading sort after all
/// numbers when ascending.
///
/// # Examples
///
/// ```
/// use datatable::{ColumnType, ColumnValue, Dataset, SortKey, SortedView};
/// use std::collections::HashMap;
///
/// let rows: Vec<HashMap<String, ColumnValue>> = [3, 1, 2]
///     .iter()
///     .map(|n| HashMap::from([("n".to_string(), ColumnValue::from(*n))]))
///     .collect();
/// let dataset = Dataset::project(&rows, &["n"]);
///
/// let sorted = SortedView::new(&dataset, &[0, 1, 2], SortKey::descending(0), ColumnType::Numeric);
/// assert_eq!(sorted.indices(), &[0, 2, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct SortedView {
    /// sorted_index[view_pos] = dataset row index
    sorted_index: Vec<usize>,
}

impl SortedView {
    pub fn new(dataset: &Dataset, source: &[usize], key: SortKey, column_type: ColumnType) -> Self {
        let sorted_index = match column_type {
            ColumnType::String => Self::sort_text(dataset, source, key),
            ColumnType::Numeric => Self::sort_numeric(dataset, source, key),
        };
        SortedView { sorted_index }
    }

    fn sort_text(dataset: &Dataset, source: &[usize], key: SortKey) -> Vec<usize> {
        let mut keyed: Vec<(usize, String)> = source
            .iter()
            .map(|&row| (row, dataset.value(row, key.column).display_text()))
            .collect();
        // UTF-16 code unit order, as browsers compare strings
        keyed.sort_by(|a, b| a.1.encode_utf16().cmp(b.1.encode_utf16()));

        let mut sorted: Vec<usize> = keyed.into_iter().map(|(row, _)| row).collect();
        if !key.order.is_ascending() {
            sorted.reverse();
        }
        sorted
    }

    fn sort_numeric(dataset: &Dataset, source: &[usize], key: SortKey) -> Vec<usize> {
        let mut keyed: Vec<(usize, Option<f64>)> = source
            .iter()
            .map(|&row| (row, dataset.value(row, key.column).to_number()))
            .collect();
        match key.order {
            SortOrder::Ascending => keyed.sort_by(|a, b| compare_numbers(a.1, b.1)),
            SortOrder::Descending => keyed.sort_by(|a, b| compare_numbers(b.1, a.1)),
        }
        keyed.into_iter().map(|(row, _)| row).collect()
    }

    pub fn len(&self) -> usize {
        self.sorted_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_index.is_empty()
    }

    /// Returns the dataset row index for a given view position
    pub fn get_parent_index(&self, view_index: usize) -> Option<usize> {
        self.sorted_index.get(view_index).copied()
    }

    pub fn indices(&self) -> &[usize] {
        &self.sorted_index
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.sorted_index
    }
}

/// Numbers first, in ascending order; values without a number last.
fn compare_numbers(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Half-open slice `[start, end)` covering one page of rows.
///
/// Both ends are clamped to the number of available rows, so a page past the end is an
/// empty window rather than an invalid one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
}

impl PageWindow {
    pub fn new(page: usize, limit: usize, len: usize) -> Self {
        let start = page.saturating_mul(limit).min(len);
        let end = start.saturating_add(limit).min(len);
        PageWindow { start, end }
    }

    /// Number of pages needed to show `len` rows, `limit` at a time.
    pub fn page_count(len: usize, limit: usize) -> usize {
        if limit == 0 {
            return 0;
        }
        len.div_ceil(limit)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.end.min(items.len());
        let start = self.start.min(end);
        &items[start..end]
    }
}

/// Target of a page navigation, as carried by a pagination link's `data-page` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageTarget {
    Page(usize),
    Next,
    Previous,
}

impl FromStr for PageTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "next" => Ok(PageTarget::Next),
            "previous" => Ok(PageTarget::Previous),
            other => other
                .parse::<usize>()
                .map(PageTarget::Page)
                .map_err(|_| format!("Unknown page target: '{}'", s)),
        }
    }
}

impl fmt::Display for PageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageTarget::Page(n) => write!(f, "{}", n),
            PageTarget::Next => write!(f, "next"),
            PageTarget::Previous => write!(f, "previous"),
        }
    }
}
