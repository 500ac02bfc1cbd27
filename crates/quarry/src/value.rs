//! Typed values shared by the clause renderer and the row mapper.
//!
//! A [`Value`] is both what a WHERE clause compares against and what a
//! [`DataReader`](crate::row::DataReader) yields for a cell. [`format_sql_value`]
//! renders a value as an inline SQL literal.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

/// Raw SQL text that is emitted verbatim: never quoted, never parameterized.
///
/// Use it for column references (`orders.user_id`), placeholder names or
/// sub-selects that must pass through the comparison machinery untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal(String);

impl Literal {
    pub fn new(sql: impl Into<String>) -> Self {
        Literal(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A typed cell or comparison value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// SQL NULL
    #[default]
    Null,
    Bool(bool),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    String(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    DateTimeUtc(DateTime<Utc>),
    /// Raw SQL, see [`Literal`]
    Literal(Literal),
    /// Values of an `IN (...)` comparison
    List(Vec<Value>),
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub const fn is_literal(&self) -> bool {
        matches!(self, Value::Literal(_))
    }

    /// Build an IN-list value.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::I16(_) => "I16",
            Value::I32(_) => "I32",
            Value::I64(_) => "I64",
            Value::F32(_) => "F32",
            Value::F64(_) => "F64",
            Value::Decimal(_) => "Decimal",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Uuid(_) => "Uuid",
            Value::Date(_) => "Date",
            Value::DateTime(_) => "DateTime",
            Value::DateTimeUtc(_) => "DateTimeUtc",
            Value::Literal(_) => "Literal",
            Value::List(_) => "List",
        }
    }
}

/// Plain text form of a value (strings unquoted, NULL as the empty string).
///
/// This is the representation handed to custom conversion functions and the
/// one text-based coercion parses from.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Bytes(v) => write!(f, "0x{}", hex(v)),
            Value::Uuid(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S%.f")),
            Value::DateTimeUtc(v) => write!(f, "{}", v.to_rfc3339()),
            Value::Literal(v) => f.write_str(v.as_str()),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

/// Layout used for inline date/time literals (`yyyy/MM/dd hh:mm:ss`, 12-hour clock).
pub const SQL_DATETIME_FORMAT: &str = "%Y/%m/%d %I:%M:%S";

/// Render a value as an inline SQL literal.
///
/// Strings are single-quoted with embedded quotes doubled, booleans become
/// `1`/`0`, date/times use [`SQL_DATETIME_FORMAT`], [`Literal`]s pass through
/// verbatim and NULL becomes the bare word `NULL`.
pub fn format_sql_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => quote(s),
        Value::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
        Value::Date(d) => format!("'{}'", d.format("%Y/%m/%d")),
        Value::DateTime(dt) => format!("'{}'", dt.format(SQL_DATETIME_FORMAT)),
        Value::DateTimeUtc(dt) => format!("'{}'", dt.naive_utc().format(SQL_DATETIME_FORMAT)),
        Value::Uuid(u) => format!("'{u}'"),
        Value::Bytes(b) => format!("0x{}", hex(b)),
        Value::Literal(l) => l.as_str().to_string(),
        Value::List(items) => items
            .iter()
            .map(format_sql_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    String => String,
    Vec<u8> => Bytes,
    Uuid => Uuid,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    DateTime<Utc> => DateTimeUtc,
    Literal => Literal,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
