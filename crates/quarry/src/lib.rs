//! # quarry
//!
//! A WHERE-tree SQL statement builder and a schema-driven row mapper.
//!
//! ## Features
//!
//! - **Clause trees**: WHERE/HAVING levels are OR-ed together, clauses inside a
//!   level are AND-ed, and a clause can chain sub-clauses on its own field
//! - **Two render modes**: inline SQL literals, or placeholders with a shared
//!   parameter counter (`@p1_field` or `$1` for Postgres)
//! - **Row mapping**: columns bind to properties by exact name, then with the
//!   table prefix stripped, then through an alias map
//! - **Custom conversions**: per-property functions that replace the default
//!   coercion table
//! - **Timings**: every call records its phases on an [`ExecutionContext`]
//!
//! ## Query Builder (qb)
//!
//! ```ignore
//! use quarry::qb::{self, Comparison, SqlQb};
//!
//! let query = qb::select("users")
//!     .filter("age", Comparison::GreaterThan, 18)
//!     .filter_at("role", Comparison::Equals, "admin", 2)
//!     .build_query()?;
//! // SELECT users.* FROM users WHERE (age > 18)  OR (role = 'admin')
//! ```
//!
//! ## Row mapping
//!
//! ```ignore
//! use quarry::{DataTable, ExecutionContext, Mappable};
//!
//! #[derive(Debug, Default, Mappable)]
//! struct User {
//!     id: i32,
//!     name: String,
//!     email: Option<String>,
//! }
//!
//! let mut ctx = ExecutionContext::new().with_table_prefix("usr_");
//! let users: Vec<User> = quarry::map(table.reader(), &mut ctx)?;
//! println!("{:?}", ctx.event().total());
//! ```

// Lets `::quarry::` paths emitted by the derives resolve inside this crate.
extern crate self as quarry;

pub mod context;
pub mod error;
pub mod mapping;
pub mod qb;
pub mod row;
pub mod value;

#[cfg(feature = "postgres")]
pub mod pg;

pub use context::{CustomConversion, ExecutionContext, ExecutionEvent, MappingConfig};
pub use error::{QuarryError, QuarryResult};
pub use mapping::{
    DuplicateKeys, FieldType, Mappable, PropertyDef, SqlEnum, TypeTag, ensure_schema, key_by,
    map, map_keyed, map_scalar, map_scalar_single, map_single, parse_enum,
};
pub use row::{DataReader, DataTable, TableReader};
pub use value::{Literal, Value, format_sql_value};

#[cfg(feature = "postgres")]
pub use pg::{PgRows, execute, fetch_all, fetch_scalar};

// Re-export derive macros
#[cfg(feature = "derive")]
pub use quarry_derive::{Mappable, SqlEnum};
