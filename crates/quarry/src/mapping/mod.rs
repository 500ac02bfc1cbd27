//! Schema-driven row mapping.
//!
//! A [`Mappable`] type exposes an accessor table ([`PropertyDef`]s, normally
//! generated by `#[derive(Mappable)]`). The table is turned into a [`Schema`]
//! once per type and cached for the life of the process. Each mapping call
//! then:
//!
//! 1. binds result-set columns to schema properties ([`resolve_indices`]):
//!    exact name, then table-prefix stripped, then the alias map;
//! 2. reads every row once, skipping NULL cells;
//! 3. runs a registered custom conversion or the default [`coerce`] table and
//!    assigns through the property's setter.
//!
//! Scalar targets ([`map_scalar`]) bypass the schema and read the first column.

mod convert;
mod field;
mod keyed;
mod mapper;
mod resolve;
mod schema;

pub use convert::coerce;
pub use field::{FieldType, SqlEnum, TypeTag, parse_enum};
pub use keyed::{DuplicateKeys, key_by, map_keyed};
pub use mapper::{map, map_scalar, map_scalar_single, map_single};
pub use resolve::{ColumnBinding, Resolution, resolve_indices};
pub use schema::{Mappable, PropertyDef, PropertyMapping, Schema, ensure_schema};
