//! Row mapping.

use std::time::Instant;

use crate::context::ExecutionContext;
use crate::error::{QuarryError, QuarryResult};
use crate::mapping::field::FieldType;
use crate::mapping::resolve::{ColumnBinding, resolve_indices};
use crate::mapping::schema::{Mappable, Schema, ensure_schema};
use crate::row::DataReader;
use crate::value::Value;

/// Map every row of `reader` into a `T`.
///
/// Columns are bound to properties once per call; NULL cells are skipped, so
/// the property keeps its `Default` value. A cell that cannot be converted
/// fails the whole call with [`QuarryError::Conversion`]. An empty or absent
/// result set yields an empty `Vec`.
pub fn map<T: Mappable, R: DataReader>(reader: R, ctx: &mut ExecutionContext) -> QuarryResult<Vec<T>> {
    let result = map_rows(reader, ctx, None);
    ctx.observe(result)
}

/// First mapped row, or `T::default()` when there are none.
///
/// Only the first row is read.
pub fn map_single<T: Mappable, R: DataReader>(reader: R, ctx: &mut ExecutionContext) -> QuarryResult<T> {
    let result = map_rows(reader, ctx, Some(1));
    ctx.observe(result).map(|rows| rows.into_iter().next().unwrap_or_default())
}

/// Map the first column of every row straight into `T`, skipping the schema.
///
/// With `T = Option<U>` NULL cells become `None`; for any other `T` a NULL cell
/// is a conversion error.
pub fn map_scalar<T: FieldType, R: DataReader>(reader: R, ctx: &mut ExecutionContext) -> QuarryResult<Vec<T>> {
    let result = map_scalar_rows(reader, ctx, None);
    ctx.observe(result)
}

/// First column of the first row, or `T::default()` when there are no rows.
pub fn map_scalar_single<T, R>(reader: R, ctx: &mut ExecutionContext) -> QuarryResult<T>
where
    T: FieldType + Default,
    R: DataReader,
{
    let result = map_scalar_rows(reader, ctx, Some(1));
    ctx.observe(result).map(|values| values.into_iter().next().unwrap_or_default())
}

fn map_rows<T: Mappable, R: DataReader>(
    mut reader: R,
    ctx: &mut ExecutionContext,
    limit: Option<usize>,
) -> QuarryResult<Vec<T>> {
    let start = Instant::now();
    let schema = ensure_schema::<T>();
    ctx.event_mut().generate_properties += start.elapsed();

    let start = Instant::now();
    let bindings = resolve_indices(
        &reader.column_names(),
        &schema,
        ctx.table_prefix(),
        ctx.column_aliases(),
    );
    ctx.event_mut().property_indices += start.elapsed();

    let start = Instant::now();
    let mut items = Vec::new();
    while limit.is_none_or(|max| items.len() < max) && reader.read()? {
        items.push(map_row(&reader, &schema, &bindings, ctx)?);
    }
    let elapsed = start.elapsed();
    ctx.event_mut().data_mapping += elapsed;

    tracing::debug!(
        target: "quarry.map",
        type_name = schema.type_name(),
        columns = reader.field_count(),
        bound = bindings.len(),
        rows = items.len(),
        elapsed_us = elapsed.as_micros() as u64,
        "mapped rows"
    );
    Ok(items)
}

fn map_row<T: Mappable, R: DataReader>(
    reader: &R,
    schema: &Schema<T>,
    bindings: &[ColumnBinding],
    ctx: &ExecutionContext,
) -> QuarryResult<T> {
    let mut item = T::default();
    for binding in bindings {
        let cell = reader.value(binding.ordinal)?;
        if cell.is_null() {
            continue;
        }
        let property = schema.property(binding.property);
        let conversion_error = |message: String| {
            QuarryError::conversion(&binding.column, property.name(), property.tag().name(), message)
        };

        let convert = if ctx.has_conversions() {
            ctx.conversion(property.name())
        } else {
            None
        };
        let value = match convert {
            Some(convert) => convert(&cell.to_string()).map_err(conversion_error)?,
            None => cell,
        };
        property.set(&mut item, value).map_err(conversion_error)?;
    }
    Ok(item)
}

fn map_scalar_rows<T: FieldType, R: DataReader>(
    mut reader: R,
    ctx: &mut ExecutionContext,
    limit: Option<usize>,
) -> QuarryResult<Vec<T>> {
    let start = Instant::now();
    let column = if reader.field_count() > 0 {
        reader.name(0).to_string()
    } else {
        String::new()
    };

    let mut values = Vec::new();
    while limit.is_none_or(|max| values.len() < max) && reader.read()? {
        let cell = if reader.field_count() > 0 {
            reader.value(0)?
        } else {
            Value::Null
        };
        let value = T::from_value(cell).map_err(|message| {
            QuarryError::conversion(&column, "", scalar_target::<T>(), message)
        })?;
        values.push(value);
    }
    let elapsed = start.elapsed();
    ctx.event_mut().data_mapping += elapsed;

    tracing::debug!(
        target: "quarry.map",
        target_type = std::any::type_name::<T>(),
        rows = values.len(),
        elapsed_us = elapsed.as_micros() as u64,
        "mapped scalars"
    );
    Ok(values)
}

fn scalar_target<T: FieldType>() -> String {
    if T::NULLABLE {
        format!("Option<{}>", T::TAG)
    } else {
        T::TAG.to_string()
    }
}
