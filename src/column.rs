/// DataTable Column Implementation
///
/// A column definition names one displayed field: the header label, the key it reads
/// from every row, and whether the header sorts and the filter row offers an input.
/// Every column also has a type, inferred once from the dataset at construction.
/// The type decides how filtering and sorting compare values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Values are compared as text; filters match by case-insensitive substring.
    String,
    /// Values are compared as numbers; filters match by integer equality.
    Numeric,
}

/// A single cell value as supplied in the dataset.
///
/// Deserializes from plain JSON scalars: numbers, strings, booleans and `null`.
/// `Missing` marks a key the row does not have at all; it is never read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
    #[serde(skip_deserializing)]
    Missing,
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ColumnValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric interpretation of the value, if it has one.
    ///
    /// Strings count as numbers when their trimmed text is empty (zero), a float
    /// literal or a `0x`/`0o`/`0b` integer literal. `null` reads as zero. Missing
    /// values and NaN are not numbers.
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            ColumnValue::Number(v) => *v,
            ColumnValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            ColumnValue::String(s) => parse_number(s)?,
            ColumnValue::Null => 0.0,
            ColumnValue::Missing => return None,
        };
        if n.is_nan() {
            None
        } else {
            Some(n)
        }
    }

    /// Text shown in a table cell.
    pub fn display_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Number(v) if v.is_infinite() => {
                if *v > 0.0 {
                    write!(f, "Infinity")
                } else {
                    write!(f, "-Infinity")
                }
            }
            ColumnValue::Number(v) if v.is_nan() => write!(f, "NaN"),
            ColumnValue::Number(v) => write!(f, "{}", v),
            ColumnValue::String(s) => write!(f, "{}", s),
            ColumnValue::Bool(b) => write!(f, "{}", b),
            ColumnValue::Null | ColumnValue::Missing => Ok(()),
        }
    }
}

impl From<f64> for ColumnValue {
    fn from(v: f64) -> Self {
        ColumnValue::Number(v)
    }
}

impl From<i32> for ColumnValue {
    fn from(v: i32) -> Self {
        ColumnValue::Number(v as f64)
    }
}

impl From<&str> for ColumnValue {
    fn from(v: &str) -> Self {
        ColumnValue::String(v.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(v: String) -> Self {
        ColumnValue::String(v)
    }
}

impl From<bool> for ColumnValue {
    fn from(v: bool) -> Self {
        ColumnValue::Bool(v)
    }
}

/// Parse a whole string as a number. Empty or all-whitespace input is zero.
fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if let Some(n) = parse_radix_literal(trimmed) {
        return n;
    }
    // Rust also accepts "inf" and "nan" spellings, which are not numbers here.
    let lower = trimmed.to_ascii_lowercase();
    if lower.contains("inf") || lower.contains("nan") {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Unsigned `0x`, `0o` or `0b` literal. `Some(None)` for a prefix with bad digits,
/// `None` when `text` has no such prefix.
fn parse_radix_literal(text: &str) -> Option<Option<f64>> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(None);
    }
    Some(accumulate_digits(digits, radix).filter(|&(_, used)| used == digits.len()).map(|(v, _)| v))
}

/// Value of the leading run of digits in `radix`, with the number of bytes it spans.
fn accumulate_digits(digits: &str, radix: u32) -> Option<(f64, usize)> {
    let mut value: Option<f64> = None;
    let mut used = 0;
    for c in digits.chars() {
        match c.to_digit(radix) {
            Some(d) => {
                value = Some(value.unwrap_or(0.0) * radix as f64 + d as f64);
                used += c.len_utf8();
            }
            None => break,
        }
    }
    value.map(|v| (v, used))
}

/// Parse the leading integer of a string, ignoring whatever follows it.
///
/// `"42"` and `" 42px"` give 42, `"3.7"` gives 3, `"-8"` gives -8 and `"0x1A"` gives
/// 26. Input without a leading digit (`""`, `"abc"`, `"-"`, `"0x"`) gives `None`.
pub fn parse_integer_prefix(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let value = match rest.get(..2) {
        Some("0x") | Some("0X") => accumulate_digits(&rest[2..], 16),
        _ => accumulate_digits(rest, 10),
    };

    value.map(|(v, _)| if negative { -v } else { v })
}

/// How column types are inferred from the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeInference {
    /// Classify each column by the value in the first row only.
    #[default]
    FirstRow,
    /// Classify each column by whichever type the majority of rows hold.
    /// Ties fall back to string.
    Dominant,
}

impl TypeInference {
    /// Infer a column type from the column's values, in dataset order.
    ///
    /// A column with no values at all is typed as string.
    pub fn infer<'a, I>(&self, mut values: I) -> ColumnType
    where
        I: Iterator<Item = &'a ColumnValue>,
    {
        match self {
            TypeInference::FirstRow => values
                .next()
                .map(Self::classify)
                .unwrap_or(ColumnType::String),
            TypeInference::Dominant => {
                let (mut numeric, mut text) = (0usize, 0usize);
                for value in values {
                    match Self::classify(value) {
                        ColumnType::Numeric => numeric += 1,
                        ColumnType::String => text += 1,
                    }
                }
                if numeric > text {
                    ColumnType::Numeric
                } else {
                    ColumnType::String
                }
            }
        }
    }

    fn classify(value: &ColumnValue) -> ColumnType {
        if value.to_number().is_some() {
            ColumnType::Numeric
        } else {
            ColumnType::String
        }
    }
}

/// Column definition as given in the table configuration.
///
/// # Examples
///
/// ```
/// use datatable::ColumnDef;
///
/// let def = ColumnDef::new("Population", "population").sortable().filterable();
/// assert_eq!(def.data, "population");
/// assert!(def.is_sortable && def.is_filterable);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    /// Display label for the header cell.
    pub header: String,
    /// Field key read from each row.
    pub data: String,
    #[serde(default)]
    pub is_sortable: bool,
    #[serde(default)]
    pub is_filterable: bool,
}

impl ColumnDef {
    pub fn new(header: impl Into<String>, data: impl Into<String>) -> Self {
        ColumnDef {
            header: header.into(),
            data: data.into(),
            is_sortable: false,
            is_filterable: false,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.is_sortable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.is_filterable = true;
        self
    }
}

/// A column definition paired with its inferred type.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    def: ColumnDef,
    column_type: ColumnType,
}

impl Column {
    pub fn new(def: ColumnDef, column_type: ColumnType) -> Self {
        Column { def, column_type }
    }

    pub fn key(&self) -> &str {
        &self.def.data
    }

    pub fn header(&self) -> &str {
        &self.def.header
    }

    pub fn is_sortable(&self) -> bool {
        self.def.is_sortable
    }

    pub fn is_filterable(&self) -> bool {
        self.def.is_filterable
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_numeric(&self) -> bool {
        self.column_type == ColumnType::Numeric
    }

    pub fn def(&self) -> &ColumnDef {
        &self.def
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_number() {
        assert_eq!(ColumnValue::Number(3.5).to_number(), Some(3.5));
        assert_eq!(ColumnValue::from("42").to_number(), Some(42.0));
        assert_eq!(ColumnValue::from(" 1e3 ").to_number(), Some(1000.0));
        assert_eq!(ColumnValue::from("").to_number(), Some(0.0));
        assert_eq!(ColumnValue::from("-Infinity").to_number(), Some(f64::NEG_INFINITY));
        assert_eq!(ColumnValue::Bool(true).to_number(), Some(1.0));

        assert_eq!(ColumnValue::from("Kabul").to_number(), None);
        assert_eq!(ColumnValue::from("12abc").to_number(), None);
        assert_eq!(ColumnValue::from("inf").to_number(), None);
        assert_eq!(ColumnValue::from("NaN").to_number(), None);
        assert_eq!(ColumnValue::Number(f64::NAN).to_number(), None);
        assert_eq!(ColumnValue::Null.to_number(), Some(0.0));
        assert_eq!(ColumnValue::Missing.to_number(), None);
        assert_eq!(ColumnValue::from("0x1A").to_number(), Some(26.0));
        assert_eq!(ColumnValue::from(" 0b101 ").to_number(), Some(5.0));
        assert_eq!(ColumnValue::from("0o17").to_number(), Some(15.0));
        assert_eq!(ColumnValue::from("0x").to_number(), None);
        assert_eq!(ColumnValue::from("0x1G").to_number(), None);
        assert_eq!(ColumnValue::from("-0x1A").to_number(), None);
    }

    #[test]
    fn test_parse_integer_prefix() {
        assert_eq!(parse_integer_prefix("42"), Some(42.0));
        assert_eq!(parse_integer_prefix("  42px"), Some(42.0));
        assert_eq!(parse_integer_prefix("3.7"), Some(3.0));
        assert_eq!(parse_integer_prefix("-8"), Some(-8.0));
        assert_eq!(parse_integer_prefix("+5"), Some(5.0));
        assert_eq!(parse_integer_prefix(""), None);
        assert_eq!(parse_integer_prefix("abc"), None);
        assert_eq!(parse_integer_prefix("-"), None);
        assert_eq!(parse_integer_prefix("x12"), None);
        assert_eq!(parse_integer_prefix("0x1A"), Some(26.0));
        assert_eq!(parse_integer_prefix("-0Xff zz"), Some(-255.0));
        assert_eq!(parse_integer_prefix("0x"), None);
        assert_eq!(parse_integer_prefix("0b11"), Some(0.0));
    }

    #[test]
    fn test_display_text() {
        assert_eq!(ColumnValue::Number(25500100.0).display_text(), "25500100");
        assert_eq!(ColumnValue::Number(1.25).display_text(), "1.25");
        assert_eq!(ColumnValue::Number(f64::INFINITY).display_text(), "Infinity");
        assert_eq!(ColumnValue::from("Oslo").display_text(), "Oslo");
        assert_eq!(ColumnValue::Null.display_text(), "");
        assert_eq!(ColumnValue::Missing.display_text(), "");
    }

    #[test]
    fn test_value_from_json() {
        let values: Vec<ColumnValue> =
            serde_json::from_str(r#"[1, 2.5, "x", true, null]"#).unwrap();
        assert_eq!(
            values,
            vec![
                ColumnValue::Number(1.0),
                ColumnValue::Number(2.5),
                ColumnValue::String("x".to_string()),
                ColumnValue::Bool(true),
                ColumnValue::Null,
            ]
        );
    }

    #[test]
    fn test_first_row_inference() {
        let values = vec![ColumnValue::from("10"), ColumnValue::from("ten")];
        assert_eq!(TypeInference::FirstRow.infer(values.iter()), ColumnType::Numeric);

        let values = vec![ColumnValue::from("ten"), ColumnValue::from(10)];
        assert_eq!(TypeInference::FirstRow.infer(values.iter()), ColumnType::String);

        assert_eq!(TypeInference::FirstRow.infer(std::iter::empty()), ColumnType::String);

        let values = vec![ColumnValue::Null, ColumnValue::from("x")];
        assert_eq!(TypeInference::FirstRow.infer(values.iter()), ColumnType::Numeric);
        let values = vec![ColumnValue::Missing, ColumnValue::from(5)];
        assert_eq!(TypeInference::FirstRow.infer(values.iter()), ColumnType::String);
    }

    #[test]
    fn test_dominant_inference() {
        let values = vec![
            ColumnValue::from("n/a"),
            ColumnValue::from(3),
            ColumnValue::from(4),
        ];
        assert_eq!(TypeInference::Dominant.infer(values.iter()), ColumnType::Numeric);

        let tie = vec![ColumnValue::from("a"), ColumnValue::from(1)];
        assert_eq!(TypeInference::Dominant.infer(tie.iter()), ColumnType::String);
    }

    #[test]
    fn test_column_def_from_json() {
        let def: ColumnDef = serde_json::from_str(
            r#"{"header": "Region", "data": "region", "isSortable": true}"#,
        )
        .unwrap();
        assert_eq!(def.header, "Region");
        assert!(def.is_sortable);
        assert!(!def.is_filterable);
    }
}
