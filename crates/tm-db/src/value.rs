//! Backend-neutral SQL values used for parameters and result rows.

use crate::error::{DbError, DbResult};
use chrono::NaiveDateTime;

/// Text encoding used for timestamps on backends without a native type.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const TIMESTAMP_PARSE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

/// A single SQL value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    /// Read as an integer. Booleans count as 0/1.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(n) => Some(*n),
            SqlValue::Boolean(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Read as a boolean. SQLite stores booleans as integers.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SqlValue::Boolean(b) => Some(*b),
            SqlValue::Integer(n) => Some(*n != 0),
            _ => None,
        }
    }

    /// Borrow the text content
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Read as a timestamp, parsing text encodings when needed.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            SqlValue::Timestamp(ts) => Some(*ts),
            SqlValue::Text(s) => TIMESTAMP_PARSE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// Short type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "NULL",
            SqlValue::Integer(_) => "INTEGER",
            SqlValue::Real(_) => "REAL",
            SqlValue::Text(_) => "TEXT",
            SqlValue::Boolean(_) => "BOOLEAN",
            SqlValue::Timestamp(_) => "TIMESTAMP",
        }
    }
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        SqlValue::Integer(n)
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        SqlValue::Boolean(b)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(ts: NaiveDateTime) -> Self {
        SqlValue::Timestamp(ts)
    }
}

static NULL: SqlValue = SqlValue::Null;

/// One result row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<SqlValue>,
}

impl Row {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the value at `idx`; out-of-range reads as NULL
    pub fn get(&self, idx: usize) -> &SqlValue {
        self.values.get(idx).unwrap_or(&NULL)
    }

    pub fn get_i64(&self, idx: usize) -> DbResult<i64> {
        let value = self.get(idx);
        value.as_i64().ok_or_else(|| decode_error(idx, "INTEGER", value))
    }

    pub fn get_bool(&self, idx: usize) -> DbResult<bool> {
        let value = self.get(idx);
        value.as_bool().ok_or_else(|| decode_error(idx, "BOOLEAN", value))
    }

    pub fn get_string(&self, idx: usize) -> DbResult<String> {
        let value = self.get(idx);
        value
            .as_str()
            .map(String::from)
            .ok_or_else(|| decode_error(idx, "TEXT", value))
    }

    pub fn get_datetime(&self, idx: usize) -> DbResult<NaiveDateTime> {
        let value = self.get(idx);
        value
            .as_datetime()
            .ok_or_else(|| decode_error(idx, "TIMESTAMP", value))
    }
}

fn decode_error(column: usize, expected: &'static str, found: &SqlValue) -> DbError {
    let found = match found {
        SqlValue::Text(s) => format!("TEXT '{s}'"),
        other => other.type_name().to_string(),
    };
    DbError::Decode {
        column,
        expected,
        found,
    }
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
