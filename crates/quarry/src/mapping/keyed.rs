//! Re-keying mapped rows by one of their properties.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

use crate::context::ExecutionContext;
use crate::error::{QuarryError, QuarryResult};
use crate::mapping::field::FieldType;
use crate::mapping::mapper::map;
use crate::mapping::schema::{Mappable, ensure_schema};
use crate::row::DataReader;

/// What to do when two items produce the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Fail with [`QuarryError::DuplicateKey`]
    #[default]
    Reject,
    /// Keep the later item
    Overwrite,
}

/// Key `items` by the value of `key_property` (any case).
///
/// The property must exist on `V` and be declared exactly as `K`, `Option`
/// wrapper included.
pub fn key_by<K, V>(items: Vec<V>, key_property: &str, duplicates: DuplicateKeys) -> QuarryResult<HashMap<K, V>>
where
    K: FieldType + Eq + Hash,
    V: Mappable,
{
    let schema = ensure_schema::<V>();
    let property = schema
        .get(key_property)
        .ok_or_else(|| QuarryError::UnknownKeyProperty(key_property.to_string()))?;

    // Every SqlEnum shares TypeTag::Enum, so compare the declared type itself.
    if !property.is_type::<K>() {
        return Err(QuarryError::KeyTypeMismatch {
            property: property.name().to_string(),
            expected: std::any::type_name::<K>().to_string(),
            actual: property.type_name().to_string(),
        });
    }

    let mut keyed = HashMap::with_capacity(items.len());
    for item in items {
        let raw = property.get(&item);
        let display = raw.to_string();
        let key = K::from_value(raw).map_err(|message| {
            QuarryError::conversion(property.name(), property.name(), K::TAG.name(), message)
        })?;
        match keyed.entry(key) {
            Entry::Occupied(mut slot) => match duplicates {
                DuplicateKeys::Overwrite => {
                    slot.insert(item);
                }
                DuplicateKeys::Reject => return Err(QuarryError::DuplicateKey(display)),
            },
            Entry::Vacant(slot) => {
                slot.insert(item);
            }
        }
    }
    Ok(keyed)
}

/// [`map`] followed by [`key_by`].
pub fn map_keyed<K, V, R>(
    reader: R,
    key_property: &str,
    duplicates: DuplicateKeys,
    ctx: &mut ExecutionContext,
) -> QuarryResult<HashMap<K, V>>
where
    K: FieldType + Eq + Hash,
    V: Mappable,
    R: DataReader,
{
    let items = map::<V, R>(reader, ctx)?;
    let result = key_by(items, key_property, duplicates);
    ctx.observe(result)
}
