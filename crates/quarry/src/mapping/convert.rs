//! Cell coercion table.
//!
//! [`coerce`] turns any cell [`Value`] into the variant matching a [`TypeTag`],
//! or explains why it cannot. Integers are range-checked, floats and decimals
//! round half to even when narrowed to integers, and text is parsed.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

use crate::mapping::field::TypeTag;
use crate::value::Value;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

/// Coerce `value` into the variant for `tag`.
///
/// NULL is never coerced; nullable destinations handle it before calling.
pub fn coerce(value: Value, tag: TypeTag) -> Result<Value, String> {
    let value = match value {
        Value::Null => return Err(format!("NULL cannot be assigned to a non-nullable {tag}")),
        Value::List(_) => return Err(format!("a list cannot be assigned to {tag}")),
        Value::Literal(l) => Value::String(l.as_str().to_string()),
        other => other,
    };

    match tag {
        TypeTag::Bool => to_bool(value).map(Value::Bool),
        TypeTag::I16 => to_i64(value).and_then(|n| narrow::<i16>(n, tag)).map(Value::I16),
        TypeTag::I32 => to_i64(value).and_then(|n| narrow::<i32>(n, tag)).map(Value::I32),
        TypeTag::I64 => to_i64(value).map(Value::I64),
        TypeTag::F32 => to_f64(value).map(|f| Value::F32(f as f32)),
        TypeTag::F64 => to_f64(value).map(Value::F64),
        TypeTag::Decimal => to_decimal(value).map(Value::Decimal),
        TypeTag::String => Ok(Value::String(value.to_string())),
        TypeTag::Bytes => to_bytes(value).map(Value::Bytes),
        TypeTag::Uuid => to_uuid(value).map(Value::Uuid),
        TypeTag::Date => to_date(value).map(Value::Date),
        TypeTag::DateTime => to_datetime(value).map(Value::DateTime),
        TypeTag::DateTimeUtc => to_datetime_utc(value).map(Value::DateTimeUtc),
        TypeTag::Enum => match value {
            Value::String(s) => Ok(Value::String(s)),
            other => to_i64(other).map(Value::I64),
        },
    }
}

fn unsupported(value: &Value, target: &str) -> String {
    format!("cannot convert {} '{value}' to {target}", value.kind())
}

fn narrow<T: TryFrom<i64>>(n: i64, tag: TypeTag) -> Result<T, String> {
    T::try_from(n).map_err(|_| format!("{n} is out of range for {tag}"))
}

fn to_bool(value: Value) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(b),
        Value::I16(n) => Ok(n != 0),
        Value::I32(n) => Ok(n != 0),
        Value::I64(n) => Ok(n != 0),
        Value::Decimal(d) => Ok(!d.is_zero()),
        Value::String(ref s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(unsupported(&value, "Bool")),
        },
        other => Err(unsupported(&other, "Bool")),
    }
}

fn float_to_i64(f: f64) -> Result<i64, String> {
    let rounded = f.round_ties_even();
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
        Ok(rounded as i64)
    } else {
        Err(format!("{f} is out of range for I64"))
    }
}

fn to_i64(value: Value) -> Result<i64, String> {
    match value {
        Value::Bool(b) => Ok(i64::from(b)),
        Value::I16(n) => Ok(i64::from(n)),
        Value::I32(n) => Ok(i64::from(n)),
        Value::I64(n) => Ok(n),
        Value::F32(f) => float_to_i64(f64::from(f)),
        Value::F64(f) => float_to_i64(f),
        // Decimal::round is banker's rounding
        Value::Decimal(d) => d
            .round()
            .to_i64()
            .ok_or_else(|| format!("{d} is out of range for I64")),
        Value::String(ref s) => {
            let text = s.trim();
            match text.parse::<i64>() {
                Ok(n) => Ok(n),
                Err(_) => match parse_decimal(text) {
                    Some(d) => to_i64(Value::Decimal(d)),
                    None => Err(unsupported(&value, "an integer")),
                },
            }
        }
        other => Err(unsupported(&other, "an integer")),
    }
}

fn to_f64(value: Value) -> Result<f64, String> {
    match value {
        Value::Bool(b) => Ok(if b { 1.0 } else { 0.0 }),
        Value::I16(n) => Ok(f64::from(n)),
        Value::I32(n) => Ok(f64::from(n)),
        Value::I64(n) => Ok(n as f64),
        Value::F32(f) => Ok(f64::from(f)),
        Value::F64(f) => Ok(f),
        Value::Decimal(d) => d.to_f64().ok_or_else(|| format!("{d} is out of range for F64")),
        Value::String(ref s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| unsupported(&value, "a float")),
        other => Err(unsupported(&other, "a float")),
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn to_decimal(value: Value) -> Result<Decimal, String> {
    match value {
        Value::Bool(b) => Ok(Decimal::from(u8::from(b))),
        Value::I16(n) => Ok(Decimal::from(n)),
        Value::I32(n) => Ok(Decimal::from(n)),
        Value::I64(n) => Ok(Decimal::from(n)),
        Value::Decimal(d) => Ok(d),
        // Shortest round-trip text keeps 9.1 as 9.1 rather than its binary expansion.
        Value::F32(f) => parse_decimal(&f.to_string()).ok_or_else(|| format!("{f} is out of range for Decimal")),
        Value::F64(f) => parse_decimal(&f.to_string()).ok_or_else(|| format!("{f} is out of range for Decimal")),
        Value::String(ref s) => parse_decimal(s.trim()).ok_or_else(|| unsupported(&value, "Decimal")),
        other => Err(unsupported(&other, "Decimal")),
    }
}

fn to_bytes(value: Value) -> Result<Vec<u8>, String> {
    match value {
        Value::Bytes(b) => Ok(b),
        Value::Uuid(u) => Ok(u.as_bytes().to_vec()),
        Value::String(ref s) => s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .and_then(decode_hex)
            .ok_or_else(|| unsupported(&value, "Bytes")),
        other => Err(unsupported(&other, "Bytes")),
    }
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| hex.get(i..i + 2).and_then(|b| u8::from_str_radix(b, 16).ok()))
        .collect()
}

fn to_uuid(value: Value) -> Result<Uuid, String> {
    match value {
        Value::Uuid(u) => Ok(u),
        Value::String(ref s) => Uuid::parse_str(s.trim()).map_err(|e| format!("{}: {e}", unsupported(&value, "Uuid"))),
        Value::Bytes(ref b) => Uuid::from_slice(b).map_err(|e| format!("{}: {e}", unsupported(&value, "Uuid"))),
        other => Err(unsupported(&other, "Uuid")),
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .or_else(|| parse_date(text).map(|d| d.and_time(NaiveTime::MIN)))
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
}

fn to_date(value: Value) -> Result<NaiveDate, String> {
    match value {
        Value::Date(d) => Ok(d),
        Value::DateTime(dt) => Ok(dt.date()),
        Value::DateTimeUtc(dt) => Ok(dt.date_naive()),
        Value::String(ref s) => {
            let text = s.trim();
            parse_date(text)
                .or_else(|| parse_datetime(text).map(|dt| dt.date()))
                .ok_or_else(|| unsupported(&value, "Date"))
        }
        other => Err(unsupported(&other, "Date")),
    }
}

fn to_datetime(value: Value) -> Result<NaiveDateTime, String> {
    match value {
        Value::DateTime(dt) => Ok(dt),
        Value::Date(d) => Ok(d.and_time(NaiveTime::MIN)),
        Value::DateTimeUtc(dt) => Ok(dt.naive_utc()),
        Value::String(ref s) => parse_datetime(s.trim()).ok_or_else(|| unsupported(&value, "DateTime")),
        other => Err(unsupported(&other, "DateTime")),
    }
}

fn to_datetime_utc(value: Value) -> Result<DateTime<Utc>, String> {
    match value {
        Value::DateTimeUtc(dt) => Ok(dt),
        other => to_datetime(other).map(|dt| dt.and_utc()),
    }
}
