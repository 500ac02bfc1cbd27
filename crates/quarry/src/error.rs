//! Error types for quarry

use thiserror::Error;

/// Result type alias for quarry operations
pub type QuarryResult<T> = Result<T, QuarryError>;

/// Errors raised while building statements or mapping rows.
#[derive(Debug, Clone, Error)]
pub enum QuarryError {
    /// Builder misuse detected at build time (empty table, nothing to set, ...)
    #[error("Build error: {0}")]
    Build(String),

    /// A clause was created without a field name
    #[error("Clause field name must not be empty")]
    EmptyFieldName,

    /// A WHERE/HAVING level was requested before its predecessor exists
    #[error("Level {level} not allowed because level {} does not exist ({existing} levels defined)", .level - 1)]
    LevelGap { level: usize, existing: usize },

    /// Levels are 1-based
    #[error("Level {0} is not a valid clause level (levels start at 1)")]
    InvalidLevel(usize),

    /// Only `=` and `<>` may be used against NULL
    #[error("Cannot use comparison operator {comparison} for NULL values on field '{field}'")]
    InvalidNullComparison { field: String, comparison: String },

    /// Comparison name not in the fixed operator set
    #[error("Unknown comparison operator: {0}")]
    UnknownComparison(String),

    /// Logic operator name other than AND / OR
    #[error("Unknown logic operator: {0}")]
    UnknownLogicOperator(String),

    /// The property to key a collection by is not part of the schema
    #[error("Property to be used as key is not on the supplied type: {0}")]
    UnknownKeyProperty(String),

    /// The key property's declared type does not match the requested key type
    #[error("Key property '{property}' is declared as {actual}, requested {expected}")]
    KeyTypeMismatch {
        property: String,
        expected: String,
        actual: String,
    },

    /// Two items produced the same key and overwriting was not allowed
    #[error("Duplicate key found and no override supplied: {0}")]
    DuplicateKey(String),

    /// A cell could not be coerced to its destination type
    #[error("Conversion error on column '{column}' -> property '{property}' ({target}): {message}")]
    Conversion {
        column: String,
        property: String,
        target: String,
        message: String,
    },

    /// Driver-level cell decode failure
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Malformed configuration document
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reported by the database driver
    #[error("Database error: {0}")]
    Database(String),
}

impl QuarryError {
    /// Create a build (construction) error
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build(message.into())
    }

    /// Create a conversion error for a column/property pair
    pub fn conversion(
        column: impl Into<String>,
        property: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Conversion {
            column: column.into(),
            property: property.into(),
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a conversion error
    pub fn is_conversion(&self) -> bool {
        matches!(self, Self::Conversion { .. })
    }

    /// Check if this error comes from builder misuse
    pub fn is_construction(&self) -> bool {
        matches!(
            self,
            Self::Build(_) | Self::EmptyFieldName | Self::LevelGap { .. } | Self::InvalidLevel(_)
        )
    }
}

#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for QuarryError {
    fn from(err: tokio_postgres::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for QuarryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
