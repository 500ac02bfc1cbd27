//! Per-type property schema and its process-wide cache.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

use crate::mapping::field::TypeTag;
use crate::value::Value;

/// Accessor table entry for one mappable field.
///
/// Normally produced by `#[derive(Mappable)]`.
pub struct PropertyDef<T> {
    /// Property (column) name
    pub name: &'static str,
    pub tag: TypeTag,
    pub nullable: bool,
    /// Identity of the declared field type, `Option` wrapper included
    pub type_id: fn() -> TypeId,
    pub type_name: fn() -> &'static str,
    pub get: fn(&T) -> Value,
    pub set: fn(&mut T, Value) -> Result<(), String>,
}

impl<T> Clone for PropertyDef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PropertyDef<T> {}

impl<T> fmt::Debug for PropertyDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDef")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("nullable", &self.nullable)
            .field("type_name", &(self.type_name)())
            .finish()
    }
}

/// A type the row mapper can build from a row.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Default, quarry::Mappable)]
/// struct User {
///     id: i64,
///     #[orm(column = "user_name")]
///     name: String,
///     email: Option<String>,
///     #[orm(skip)]
///     cached: Vec<String>,
/// }
/// ```
pub trait Mappable: Default + Send + Sync + 'static {
    /// Accessor table, in declaration order.
    fn properties() -> Vec<PropertyDef<Self>>;
}

/// Cached mapping metadata of one property.
pub struct PropertyMapping<T> {
    def: PropertyDef<T>,
}

impl<T> Clone for PropertyMapping<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for PropertyMapping<T> {}

impl<T> fmt::Debug for PropertyMapping<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.def.fmt(f)
    }
}

impl<T> PropertyMapping<T> {
    pub fn name(&self) -> &'static str {
        self.def.name
    }

    pub fn tag(&self) -> TypeTag {
        self.def.tag
    }

    pub fn is_enum(&self) -> bool {
        self.def.tag == TypeTag::Enum
    }

    pub fn is_nullable(&self) -> bool {
        self.def.nullable
    }

    /// Whether the property is declared exactly as `F`.
    pub fn is_type<F: 'static>(&self) -> bool {
        (self.def.type_id)() == TypeId::of::<F>()
    }

    pub fn type_name(&self) -> &'static str {
        (self.def.type_name)()
    }

    pub fn get(&self, item: &T) -> Value {
        (self.def.get)(item)
    }

    pub fn set(&self, item: &mut T, value: Value) -> Result<(), String> {
        (self.def.set)(item, value)
    }
}

/// Properties of `T` keyed by lower-cased name.
pub struct Schema<T> {
    type_name: &'static str,
    properties: Vec<PropertyMapping<T>>,
    by_key: HashMap<String, usize>,
}

impl<T: Mappable> Schema<T> {
    fn build() -> Self {
        let defs = T::properties();
        let mut properties = Vec::with_capacity(defs.len());
        let mut by_key = HashMap::with_capacity(defs.len());
        for def in defs {
            // First declaration wins when two fields differ only by case.
            by_key
                .entry(def.name.to_lowercase())
                .or_insert(properties.len());
            properties.push(PropertyMapping { def });
        }
        Self {
            type_name: std::any::type_name::<T>(),
            properties,
            by_key,
        }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("properties", &self.properties)
            .finish()
    }
}

impl<T> Schema<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Position of a property by name (any case).
    pub fn position(&self, name: &str) -> Option<usize> {
        self.by_key.get(&name.to_lowercase()).copied()
    }

    /// Position of a property by an already lower-cased key.
    pub(crate) fn position_lower(&self, key: &str) -> Option<usize> {
        self.by_key.get(key).copied()
    }

    /// Property by name (any case).
    pub fn get(&self, name: &str) -> Option<&PropertyMapping<T>> {
        self.position(name).map(|i| &self.properties[i])
    }

    pub fn property(&self, index: usize) -> &PropertyMapping<T> {
        &self.properties[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertyMapping<T>> {
        self.properties.iter()
    }
}

type SchemaCache = RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>;

fn cache() -> &'static SchemaCache {
    static CACHE: OnceLock<SchemaCache> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

fn lookup<T: Mappable>() -> Option<Arc<Schema<T>>> {
    let guard = cache().read().unwrap_or_else(|e| e.into_inner());
    guard
        .get(&TypeId::of::<T>())
        .cloned()
        .and_then(|entry| entry.downcast::<Schema<T>>().ok())
}

/// Schema of `T`, built on first use and shared afterwards.
///
/// Concurrent first uses may each build a schema, but only the first insert is
/// kept and every caller receives that one.
pub fn ensure_schema<T: Mappable>() -> Arc<Schema<T>> {
    if let Some(schema) = lookup::<T>() {
        return schema;
    }

    let built: Arc<dyn Any + Send + Sync> = Arc::new(Schema::<T>::build());
    let stored = {
        let mut guard = cache().write().unwrap_or_else(|e| e.into_inner());
        Arc::clone(guard.entry(TypeId::of::<T>()).or_insert(built))
    };
    tracing::debug!(
        target: "quarry.map",
        type_name = std::any::type_name::<T>(),
        "schema cached"
    );

    match stored.downcast::<Schema<T>>() {
        Ok(schema) => schema,
        // Unreachable: entries are keyed by TypeId.
        Err(_) => Arc::new(Schema::<T>::build()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Probe {
        id: i32,
        name: Option<String>,
    }

    impl Mappable for Probe {
        fn properties() -> Vec<PropertyDef<Self>> {
            vec![
                PropertyDef {
                    name: "Id",
                    tag: TypeTag::I32,
                    nullable: false,
                    type_id: std::any::TypeId::of::<i32>,
                    type_name: std::any::type_name::<i32>,
                    get: |p| Value::I32(p.id),
                    set: |p, v| {
                        p.id = crate::FieldType::from_value(v)?;
                        Ok(())
                    },
                },
                PropertyDef {
                    name: "Name",
                    tag: TypeTag::String,
                    nullable: true,
                    type_id: std::any::TypeId::of::<Option<String>>,
                    type_name: std::any::type_name::<Option<String>>,
                    get: |p| p.name.clone().into(),
                    set: |p, v| {
                        p.name = crate::FieldType::from_value(v)?;
                        Ok(())
                    },
                },
            ]
        }
    }

    #[test]
    fn schema_is_keyed_case_insensitively() {
        let schema = ensure_schema::<Probe>();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.position("ID"), Some(0));
        assert!(schema.get("name").unwrap().is_nullable());
        assert!(schema.get("missing").is_none());
    }

    #[test]
    fn schema_is_built_once() {
        let a = ensure_schema::<Probe>();
        let b = ensure_schema::<Probe>();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn concurrent_first_use_converges() {
        #[derive(Debug, Default)]
        struct Fresh {
            id: i32,
        }
        impl Mappable for Fresh {
            fn properties() -> Vec<PropertyDef<Self>> {
                vec![PropertyDef {
                    name: "id",
                    tag: TypeTag::I32,
                    nullable: false,
                    type_id: std::any::TypeId::of::<i32>,
                    type_name: std::any::type_name::<i32>,
                    get: |f| Value::I32(f.id),
                    set: |f, v| {
                        f.id = crate::FieldType::from_value(v)?;
                        Ok(())
                    },
                }]
            }
        }

        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(ensure_schema::<Fresh>))
            .collect();
        let schemas: Vec<Arc<Schema<Fresh>>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(schemas.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn accessors_round_trip() {
        let schema = ensure_schema::<Probe>();
        let mut probe = Probe::default();
        schema.get("id").unwrap().set(&mut probe, Value::I64(5)).unwrap();
        assert_eq!(probe.id, 5);
        assert_eq!(schema.get("id").unwrap().get(&probe), Value::I32(5));
    }
}
