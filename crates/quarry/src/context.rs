//! Per-call mapping configuration and phase telemetry.
//!
//! An [`ExecutionContext`] travels by `&mut` through a render or mapping call.
//! It carries the column-resolution settings (table prefix, alias map), the
//! custom conversion table, and an [`ExecutionEvent`] that collects phase
//! timings and the display form of every error raised on the way out.
//!
//! ```ignore
//! use quarry::{ExecutionContext, Value};
//!
//! let mut ctx = ExecutionContext::new()
//!     .with_table_prefix("usp_")
//!     .with_column_alias("full_name", "name")
//!     .with_conversion("name", |raw| Ok(Value::from(raw.to_uppercase())));
//!
//! let users: Vec<User> = quarry::map(table.reader(), &mut ctx)?;
//! println!("mapping took {:?}", ctx.event().data_mapping);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{QuarryError, QuarryResult};
use crate::value::Value;

/// Caller-supplied conversion from a cell's text form to the value to assign.
pub type CustomConversion = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

/// Serializable part of an [`ExecutionContext`].
///
/// ```json
/// { "table_prefix": "usp_", "column_aliases": { "full_name": "name" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Stripped from column names before the second resolution attempt.
    pub table_prefix: String,
    /// Column name to property name, consulted after exact and prefix matches.
    pub column_aliases: HashMap<String, String>,
}

impl MappingConfig {
    /// Parse a JSON document; alias keys are lower-cased.
    pub fn from_json(json: &str) -> QuarryResult<Self> {
        let mut config: MappingConfig = serde_json::from_str(json)?;
        config.column_aliases = config
            .column_aliases
            .into_iter()
            .map(|(column, property)| (column.to_lowercase(), property))
            .collect();
        Ok(config)
    }
}

/// Phase timings and captured errors of one or more calls.
///
/// Durations accumulate, so one event can cover a render followed by a mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionEvent {
    /// Statement rendering
    pub render: Duration,
    /// Schema lookup or first-use build
    pub generate_properties: Duration,
    /// Column index resolution
    pub property_indices: Duration,
    /// Row conversion and assignment
    pub data_mapping: Duration,
    /// Display form of every error propagated while this event was active
    pub errors: Vec<String>,
}

impl ExecutionEvent {
    pub fn total(&self) -> Duration {
        self.render + self.generate_properties + self.property_indices + self.data_mapping
    }

    pub fn record_error(&mut self, err: &QuarryError) {
        self.errors.push(err.to_string());
    }
}

/// Mapping settings plus the telemetry sink for one unit of work.
#[derive(Clone, Default)]
pub struct ExecutionContext {
    table_prefix: String,
    column_aliases: HashMap<String, String>,
    conversions: HashMap<String, CustomConversion>,
    event: ExecutionEvent,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a loaded [`MappingConfig`].
    pub fn from_config(config: MappingConfig) -> Self {
        let mut ctx = Self::new().with_table_prefix(config.table_prefix);
        for (column, property) in config.column_aliases {
            ctx = ctx.with_column_alias(column, property);
        }
        ctx
    }

    /// Prefix stripped from column names (case-insensitive, first occurrence).
    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Map `column` onto `property` when neither an exact nor a prefix match exists.
    pub fn with_column_alias(mut self, column: impl AsRef<str>, property: impl Into<String>) -> Self {
        self.column_aliases
            .insert(column.as_ref().to_lowercase(), property.into());
        self
    }

    /// Register a conversion for a property, applied instead of the default coercion.
    pub fn with_conversion<F>(mut self, property: impl AsRef<str>, conversion: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.conversions
            .insert(property.as_ref().to_lowercase(), Arc::new(conversion));
        self
    }

    pub fn table_prefix(&self) -> &str {
        &self.table_prefix
    }

    pub fn column_aliases(&self) -> &HashMap<String, String> {
        &self.column_aliases
    }

    /// Conversion registered for a property (any case).
    pub fn conversion(&self, property: &str) -> Option<&CustomConversion> {
        self.conversions.get(&property.to_lowercase())
    }

    pub fn has_conversions(&self) -> bool {
        !self.conversions.is_empty()
    }

    pub fn event(&self) -> &ExecutionEvent {
        &self.event
    }

    pub fn event_mut(&mut self) -> &mut ExecutionEvent {
        &mut self.event
    }

    /// Take the collected event, leaving an empty one behind.
    pub fn take_event(&mut self) -> ExecutionEvent {
        std::mem::take(&mut self.event)
    }

    /// Record a failed result on the event and pass it through unchanged.
    pub fn observe<T>(&mut self, result: QuarryResult<T>) -> QuarryResult<T> {
        if let Err(err) = &result {
            self.event.record_error(err);
        }
        result
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut conversions: Vec<&str> = self.conversions.keys().map(String::as_str).collect();
        conversions.sort_unstable();
        f.debug_struct("ExecutionContext")
            .field("table_prefix", &self.table_prefix)
            .field("column_aliases", &self.column_aliases)
            .field("conversions", &conversions)
            .field("event", &self.event)
            .finish()
    }
}
