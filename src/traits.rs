use std::fmt;

use thiserror::Error;

/// A scalar as handed over by a database driver.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Null,
    BigInt(i64),
    Double(f64),
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
}

impl SqlValue {
    /// Name of the scalar kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::BigInt(_) => "bigint",
            SqlValue::Double(_) => "double",
            SqlValue::Bool(_) => "bool",
            SqlValue::Text(_) => "text",
            SqlValue::Bytes(_) => "bytes",
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "NULL"),
            SqlValue::BigInt(v) => write!(f, "{}", v),
            SqlValue::Double(v) => write!(f, "{}", v),
            SqlValue::Bool(v) => write!(f, "{}", v),
            SqlValue::Text(v) => write!(f, "{:?}", v),
            SqlValue::Bytes(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

/// Returned when a storage scalar has a kind that cannot hold an identifier.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid format: can't convert {kind} into an identifier")]
pub struct ColumnTypeError {
    pub kind: &'static str,
}

/// Conversion to and from an obfuscated text form, e.g. a JSON string field.
pub trait TextCodec: Sized {
    type Error: std::error::Error;

    fn to_text(&self) -> Result<String, Self::Error>;
    fn from_text(text: &str) -> Result<Self, Self::Error>;
}

/// Conversion to and from the raw scalar stored in a database column.
///
/// The stored value is never obfuscated.  `from_column` returns `Ok(None)`
/// for a NULL column, meaning the value is unset.
pub trait ColumnValue: Sized {
    fn to_column(&self) -> SqlValue;
    fn from_column(value: SqlValue) -> Result<Option<Self>, ColumnTypeError>;
}
