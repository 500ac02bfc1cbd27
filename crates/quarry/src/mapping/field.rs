//! Mappable field types.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::mapping::convert::coerce;
use crate::value::Value;

/// Closed set of destination types the coercion table dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    I16,
    I32,
    I64,
    F32,
    F64,
    Decimal,
    String,
    Bytes,
    Uuid,
    Date,
    DateTime,
    DateTimeUtc,
    /// A `#[derive(SqlEnum)]` type; parsed by variant name
    Enum,
}

impl TypeTag {
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Bool => "Bool",
            TypeTag::I16 => "I16",
            TypeTag::I32 => "I32",
            TypeTag::I64 => "I64",
            TypeTag::F32 => "F32",
            TypeTag::F64 => "F64",
            TypeTag::Decimal => "Decimal",
            TypeTag::String => "String",
            TypeTag::Bytes => "Bytes",
            TypeTag::Uuid => "Uuid",
            TypeTag::Date => "Date",
            TypeTag::DateTime => "DateTime",
            TypeTag::DateTimeUtc => "DateTimeUtc",
            TypeTag::Enum => "Enum",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A type a cell can be mapped into.
///
/// `Option<T>` is the nullable form of `T`: NULL maps to `None`. A NULL handed
/// to a non-nullable type is a conversion error.
pub trait FieldType: Sized + Send + Sync + 'static {
    const TAG: TypeTag;
    const NULLABLE: bool = false;

    /// Coerce a cell value into `Self`.
    fn from_value(value: Value) -> Result<Self, String>;

    fn to_value(&self) -> Value;
}

macro_rules! impl_field_type {
    ($($ty:ty => $tag:ident, $variant:ident;)*) => {
        $(
            impl FieldType for $ty {
                const TAG: TypeTag = TypeTag::$tag;

                fn from_value(value: Value) -> Result<Self, String> {
                    match coerce(value, Self::TAG)? {
                        Value::$variant(v) => Ok(v),
                        other => Err(format!("expected {}, got {}", Self::TAG, other.kind())),
                    }
                }

                fn to_value(&self) -> Value {
                    Value::$variant(self.clone())
                }
            }
        )*
    };
}

impl_field_type! {
    bool => Bool, Bool;
    i16 => I16, I16;
    i32 => I32, I32;
    i64 => I64, I64;
    f32 => F32, F32;
    f64 => F64, F64;
    Decimal => Decimal, Decimal;
    String => String, String;
    Vec<u8> => Bytes, Bytes;
    Uuid => Uuid, Uuid;
    NaiveDate => Date, Date;
    NaiveDateTime => DateTime, DateTime;
    DateTime<Utc> => DateTimeUtc, DateTimeUtc;
}

impl<T: FieldType> FieldType for Option<T> {
    const TAG: TypeTag = T::TAG;
    const NULLABLE: bool = true;

    fn from_value(value: Value) -> Result<Self, String> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldType::to_value)
    }
}

/// Enum mapped by variant name, implemented by `#[derive(SqlEnum)]`.
pub trait SqlEnum: Sized {
    /// Variant names as stored in the database, in declaration order.
    const VARIANTS: &'static [&'static str];

    /// Variant for a stored name.
    fn from_name(name: &str) -> Option<Self>;

    /// Variant for a numeric discriminant.
    fn from_discriminant(discriminant: i64) -> Option<Self>;

    /// Stored name of this variant.
    fn name(&self) -> &'static str;
}

/// Parse an enum cell: a variant name (exact, then case-insensitive) or an
/// integer discriminant.
pub fn parse_enum<E: SqlEnum>(value: Value) -> Result<E, String> {
    let parsed = match coerce(value, TypeTag::Enum)? {
        Value::String(text) => {
            let text = text.trim();
            E::from_name(text).or_else(|| {
                E::VARIANTS
                    .iter()
                    .find(|v| v.eq_ignore_ascii_case(text))
                    .and_then(|v| E::from_name(v))
                    .or_else(|| text.parse::<i64>().ok().and_then(E::from_discriminant))
            })
        }
        Value::I64(n) => E::from_discriminant(n),
        other => return Err(format!("cannot read an enum from {}", other.kind())),
    };
    parsed.ok_or_else(|| {
        format!(
            "not a member of {} (expected one of {})",
            std::any::type_name::<E>(),
            E::VARIANTS.join(", ")
        )
    })
}
