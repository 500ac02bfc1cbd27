//! tokio-postgres adapter.
//!
//! [`PgRows`] reads fetched rows through [`DataReader`], `Value` binds as a
//! query parameter, and the `fetch_*` helpers run a [`Command`] built with
//! [`Dialect::Postgres`] and map the result.

use std::error::Error;

use bytes::BytesMut;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_postgres::{Column, GenericClient, Row};

use crate::context::ExecutionContext;
use crate::error::{QuarryError, QuarryResult};
use crate::mapping::{FieldType, Mappable, map, map_scalar};
use crate::qb::{Command, Dialect};
use crate::row::DataReader;
use crate::value::Value;

/// [`DataReader`] over rows returned by tokio-postgres.
#[derive(Debug, Clone)]
pub struct PgRows<'a> {
    rows: &'a [Row],
    current: Option<usize>,
}

impl<'a> PgRows<'a> {
    pub fn new(rows: &'a [Row]) -> Self {
        Self {
            rows,
            current: None,
        }
    }

    fn columns(&self) -> &'a [Column] {
        self.rows.first().map(Row::columns).unwrap_or_default()
    }
}

impl DataReader for PgRows<'_> {
    fn field_count(&self) -> usize {
        self.columns().len()
    }

    fn name(&self, index: usize) -> &str {
        self.columns().get(index).map_or("", Column::name)
    }

    fn read(&mut self) -> QuarryResult<bool> {
        let next = self.current.map_or(0, |i| i + 1);
        self.current = Some(next.min(self.rows.len()));
        Ok(next < self.rows.len())
    }

    fn value(&self, index: usize) -> QuarryResult<Value> {
        let row = self
            .current
            .and_then(|i| self.rows.get(i))
            .ok_or_else(|| QuarryError::decode("", "reader is not positioned on a row"))?;
        decode_cell(row, index)
    }
}

/// Decode one cell into a [`Value`] by its column type.
pub fn decode_cell(row: &Row, index: usize) -> QuarryResult<Value> {
    let column = row
        .columns()
        .get(index)
        .ok_or_else(|| QuarryError::decode(index.to_string(), "column index out of range"))?;
    let ty = column.type_();
    let fail = |err: tokio_postgres::Error| QuarryError::decode(column.name(), err.to_string());

    macro_rules! get {
        ($t:ty) => {
            row.try_get::<_, Option<$t>>(index).map(Value::from).map_err(fail)
        };
    }

    if *ty == Type::BOOL {
        get!(bool)
    } else if *ty == Type::INT2 {
        get!(i16)
    } else if *ty == Type::INT4 {
        get!(i32)
    } else if *ty == Type::INT8 {
        get!(i64)
    } else if *ty == Type::OID {
        row.try_get::<_, Option<u32>>(index)
            .map(|v| v.map(i64::from).into())
            .map_err(fail)
    } else if *ty == Type::FLOAT4 {
        get!(f32)
    } else if *ty == Type::FLOAT8 {
        get!(f64)
    } else if *ty == Type::NUMERIC {
        get!(rust_decimal::Decimal)
    } else if [Type::TEXT, Type::VARCHAR, Type::BPCHAR, Type::NAME, Type::UNKNOWN].contains(ty) {
        get!(String)
    } else if *ty == Type::BYTEA {
        get!(Vec<u8>)
    } else if *ty == Type::UUID {
        get!(uuid::Uuid)
    } else if *ty == Type::DATE {
        get!(chrono::NaiveDate)
    } else if *ty == Type::TIMESTAMP {
        get!(chrono::NaiveDateTime)
    } else if *ty == Type::TIMESTAMPTZ {
        get!(chrono::DateTime<chrono::Utc>)
    } else if *ty == Type::JSON || *ty == Type::JSONB {
        row.try_get::<_, Option<serde_json::Value>>(index)
            .map(|v| v.map(|json| json.to_string()).into())
            .map_err(fail)
    } else {
        Err(QuarryError::decode(
            column.name(),
            format!("unsupported column type {ty}"),
        ))
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::I16(v) => v.to_sql_checked(ty, out),
            Value::I32(v) => v.to_sql_checked(ty, out),
            Value::I64(v) => v.to_sql_checked(ty, out),
            Value::F32(v) => v.to_sql_checked(ty, out),
            Value::F64(v) => v.to_sql_checked(ty, out),
            Value::Decimal(v) => v.to_sql_checked(ty, out),
            Value::String(v) => v.to_sql_checked(ty, out),
            Value::Bytes(v) => v.to_sql_checked(ty, out),
            Value::Uuid(v) => v.to_sql_checked(ty, out),
            Value::Date(v) => v.to_sql_checked(ty, out),
            Value::DateTime(v) => v.to_sql_checked(ty, out),
            Value::DateTimeUtc(v) => v.to_sql_checked(ty, out),
            Value::Literal(v) => v.as_str().to_sql_checked(ty, out),
            Value::List(items) => items.to_sql_checked(ty, out),
        }
    }

    // Each variant checks the column type itself.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

fn check_placeholders(command: &Command) -> QuarryResult<()> {
    if command.params.dialect() != Dialect::Postgres && !command.params.is_empty() {
        return Err(QuarryError::build(
            "command uses named placeholders; build it with Dialect::Postgres",
        ));
    }
    Ok(())
}

async fn query<C: GenericClient>(
    client: &C,
    command: &Command,
    ctx: &mut ExecutionContext,
) -> QuarryResult<Vec<Row>> {
    ctx.observe(check_placeholders(command))?;
    let params = command.params.as_refs();
    let result = client
        .query(command.sql.as_str(), &params)
        .await
        .map_err(QuarryError::from);
    ctx.observe(result)
}

/// Run `command` and map every row into `T`.
pub async fn fetch_all<T, C>(client: &C, command: &Command, ctx: &mut ExecutionContext) -> QuarryResult<Vec<T>>
where
    T: Mappable,
    C: GenericClient,
{
    let rows = query(client, command, ctx).await?;
    map(PgRows::new(&rows), ctx)
}

/// Run `command` and map the first column of every row into `T`.
pub async fn fetch_scalar<T, C>(client: &C, command: &Command, ctx: &mut ExecutionContext) -> QuarryResult<Vec<T>>
where
    T: FieldType,
    C: GenericClient,
{
    let rows = query(client, command, ctx).await?;
    map_scalar(PgRows::new(&rows), ctx)
}

/// Run `command` and return the number of affected rows.
pub async fn execute<C: GenericClient>(client: &C, command: &Command, ctx: &mut ExecutionContext) -> QuarryResult<u64> {
    ctx.observe(check_placeholders(command))?;
    let params = command.params.as_refs();
    let result = client
        .execute(command.sql.as_str(), &params)
        .await
        .map_err(QuarryError::from);
    ctx.observe(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_binds_as_sql_null() {
        let mut buf = BytesMut::new();
        let is_null = Value::Null.to_sql_checked(&Type::INT4, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
        assert!(buf.is_empty());
    }

    #[test]
    fn scalars_bind_in_binary_form() {
        let mut buf = BytesMut::new();
        let is_null = Value::I32(5).to_sql_checked(&Type::INT4, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::No));
        assert_eq!(&buf[..], &5i32.to_be_bytes());

        let mut buf = BytesMut::new();
        Value::from("abc").to_sql_checked(&Type::TEXT, &mut buf).unwrap();
        assert_eq!(&buf[..], b"abc");
    }

    #[test]
    fn mismatched_column_type_is_rejected() {
        let mut buf = BytesMut::new();
        assert!(Value::I32(5).to_sql_checked(&Type::TEXT, &mut buf).is_err());
    }

    #[test]
    fn named_placeholders_are_refused() {
        let mut params = crate::qb::ParamList::new();
        params.bind("id", Value::I32(1));
        let command = Command { sql: "SELECT 1 WHERE id = @p1_id".into(), params };
        assert!(check_placeholders(&command).unwrap_err().is_construction());
    }

    #[test]
    fn no_rows_read_as_empty() {
        let rows: Vec<Row> = Vec::new();
        let mut reader = PgRows::new(&rows);
        assert_eq!(reader.field_count(), 0);
        assert!(!reader.read().unwrap());
    }
}
