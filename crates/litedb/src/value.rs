//! Scalar values bound into prepared statements.

use std::fmt;

use rusqlite::types::{self, ToSqlOutput};
use rusqlite::ToSql;

/// A scalar that can be bound to a named placeholder or read back from a row.
///
/// Booleans are stored as SQLite integers (`0`/`1`) on the wire; reads come
/// back as whatever storage class the engine reports.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Render this value as a SQLite literal for clauses that cannot use
    /// bound parameters (the IN/NOT IN lists).
    ///
    /// Text is single-quoted with embedded quotes doubled; blobs use the
    /// `X'..'` hex form.
    pub fn sqlite_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Real(n) => n.to_string(),
            Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Value::Blob(bytes) => {
                let hex: String = bytes.iter().map(|b| format!("{b:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }
}

/// String form used by the validator and for logging. `Null` renders empty.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", if *b { "1" } else { "0" }),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Real(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Blob(_) => f.write_str(&self.sqlite_literal()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Integer(v as i64)
            }
        })*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Real(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Blob(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl From<types::Value> for Value {
    fn from(v: types::Value) -> Self {
        match v {
            types::Value::Null => Value::Null,
            types::Value::Integer(n) => Value::Integer(n),
            types::Value::Real(n) => Value::Real(n),
            types::Value::Text(s) => Value::Text(s),
            types::Value::Blob(b) => Value::Blob(b),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let out = match self {
            Value::Null => ToSqlOutput::Owned(types::Value::Null),
            Value::Bool(b) => ToSqlOutput::Owned(types::Value::Integer(i64::from(*b))),
            Value::Integer(n) => ToSqlOutput::Owned(types::Value::Integer(*n)),
            Value::Real(n) => ToSqlOutput::Owned(types::Value::Real(*n)),
            Value::Text(s) => ToSqlOutput::Borrowed(types::ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(types::ValueRef::Blob(b)),
        };
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_literal_escapes_quotes() {
        assert_eq!(Value::from("it's").sqlite_literal(), "'it''s'");
    }

    #[test]
    fn test_numeric_literals_are_bare() {
        assert_eq!(Value::from(42).sqlite_literal(), "42");
        assert_eq!(Value::from(1.5).sqlite_literal(), "1.5");
    }

    #[test]
    fn test_null_and_bool_literals() {
        assert_eq!(Value::Null.sqlite_literal(), "NULL");
        assert_eq!(Value::from(true).sqlite_literal(), "1");
        assert_eq!(Value::from(false).sqlite_literal(), "0");
    }

    #[test]
    fn test_blob_literal_hex() {
        assert_eq!(Value::from(vec![0xABu8, 0x01]).sqlite_literal(), "X'AB01'");
    }

    #[test]
    fn test_option_conversion() {
        let none: Option<i64> = None;
        assert_eq!(Value::from(none), Value::Null);
        assert_eq!(Value::from(Some(3)), Value::Integer(3));
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(30).to_string(), "30");
        assert_eq!(Value::from("ann").to_string(), "ann");
    }
}
