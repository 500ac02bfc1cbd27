//! Row sources consumed by the mapper.
//!
//! The mapper reads through the forward-only [`DataReader`] cursor. A
//! materialized [`DataTable`] exposes one through [`DataTable::reader`], and
//! `Option<R>` stands for a result set that may be absent altogether (`None`
//! reads as zero rows).

use crate::error::{QuarryError, QuarryResult};
use crate::value::Value;

/// Forward-only cursor over a result set.
///
/// `read` advances to the next row and must be called before the first row is
/// accessed; each row is read exactly once.
pub trait DataReader {
    /// Number of columns in the result set.
    fn field_count(&self) -> usize;

    /// Column name at `index`.
    fn name(&self, index: usize) -> &str;

    /// Advance to the next row; `false` once the rows are exhausted.
    fn read(&mut self) -> QuarryResult<bool>;

    /// Value of column `index` in the current row.
    fn value(&self, index: usize) -> QuarryResult<Value>;

    /// Whether column `index` of the current row is NULL.
    fn is_null(&self, index: usize) -> QuarryResult<bool> {
        Ok(self.value(index)?.is_null())
    }

    /// Every column name, in ordinal order.
    fn column_names(&self) -> Vec<String> {
        (0..self.field_count())
            .map(|i| self.name(i).to_string())
            .collect()
    }

    /// Value of the first column whose name matches (case-insensitive).
    fn value_by_name(&self, name: &str) -> QuarryResult<Value> {
        let index = (0..self.field_count())
            .find(|&i| self.name(i).eq_ignore_ascii_case(name))
            .ok_or_else(|| QuarryError::decode(name, "no such column"))?;
        self.value(index)
    }
}

impl<R: DataReader + ?Sized> DataReader for &mut R {
    fn field_count(&self) -> usize {
        (**self).field_count()
    }

    fn name(&self, index: usize) -> &str {
        (**self).name(index)
    }

    fn read(&mut self) -> QuarryResult<bool> {
        (**self).read()
    }

    fn value(&self, index: usize) -> QuarryResult<Value> {
        (**self).value(index)
    }

    fn is_null(&self, index: usize) -> QuarryResult<bool> {
        (**self).is_null(index)
    }
}

/// An absent result set has no columns and no rows.
impl<R: DataReader> DataReader for Option<R> {
    fn field_count(&self) -> usize {
        self.as_ref().map_or(0, DataReader::field_count)
    }

    fn name(&self, index: usize) -> &str {
        self.as_ref().map_or("", |r| r.name(index))
    }

    fn read(&mut self) -> QuarryResult<bool> {
        match self {
            Some(reader) => reader.read(),
            None => Ok(false),
        }
    }

    fn value(&self, index: usize) -> QuarryResult<Value> {
        match self {
            Some(reader) => reader.value(index),
            None => Err(QuarryError::decode(index.to_string(), "no result set")),
        }
    }
}

/// Materialized result set: named columns and ordered rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DataTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; it must have exactly one value per column.
    pub fn push_row(&mut self, row: Vec<Value>) -> QuarryResult<()> {
        if row.len() != self.columns.len() {
            return Err(QuarryError::build(format!(
                "row has {} values but the table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Builder form of [`push_row`](Self::push_row).
    pub fn with_row(mut self, row: Vec<Value>) -> QuarryResult<Self> {
        self.push_row(row)?;
        Ok(self)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (`row`, `column`), if both are in range.
    pub fn get(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// True for NULL cells and for out-of-range positions.
    pub fn is_null(&self, row: usize, column: usize) -> bool {
        self.get(row, column).is_none_or(Value::is_null)
    }

    /// Cursor over the rows.
    pub fn reader(&self) -> TableReader<'_> {
        TableReader {
            table: self,
            current: None,
        }
    }
}

/// [`DataReader`] over a [`DataTable`].
#[derive(Debug, Clone)]
pub struct TableReader<'a> {
    table: &'a DataTable,
    current: Option<usize>,
}

impl TableReader<'_> {
    fn current_row(&self) -> QuarryResult<&[Value]> {
        self.current
            .and_then(|i| self.table.rows.get(i))
            .map(Vec::as_slice)
            .ok_or_else(|| QuarryError::decode("", "reader is not positioned on a row"))
    }
}

impl DataReader for TableReader<'_> {
    fn field_count(&self) -> usize {
        self.table.columns.len()
    }

    fn name(&self, index: usize) -> &str {
        self.table.columns.get(index).map_or("", String::as_str)
    }

    fn read(&mut self) -> QuarryResult<bool> {
        let next = self.current.map_or(0, |i| i + 1);
        self.current = Some(next.min(self.table.rows.len()));
        Ok(next < self.table.rows.len())
    }

    fn value(&self, index: usize) -> QuarryResult<Value> {
        self.current_row()?
            .get(index)
            .cloned()
            .ok_or_else(|| QuarryError::decode(self.name(index), "column index out of range"))
    }

    fn is_null(&self, index: usize) -> QuarryResult<bool> {
        Ok(self.current_row()?.get(index).is_none_or(Value::is_null))
    }
}
