//! Entity-keyed table registry
//!
//! The registry lets mapping tables be declared by entity name, separately
//! from the types that use them. A table can come from code or from a JSON
//! declaration document.
//!
//! ## Usage
//!
//! ```rust
//! use csmap_core::registry::TableRegistry;
//!
//! let registry = TableRegistry::new();
//! registry
//!     .load_json_str(r#"{ "person": { "entries": { "first_name": "firstName" } } }"#)
//!     .unwrap();
//!
//! let table = registry.table_for("person").unwrap();
//! assert_eq!(table.field_for_key("first_name"), Some("firstName"));
//! ```
//!
//! ## Resolving tables from a `Mappable` impl
//!
//! ```rust,ignore
//! impl Mappable for Person {
//!     fn entity() -> &'static str {
//!         "person"
//!     }
//!
//!     fn mapping_table() -> Result<Arc<MappingTable>> {
//!         TableRegistry::global().table_for(Self::entity())
//!     }
//!     // ...
//! }
//! ```

use crate::error::{Error, Result};
use crate::table::MappingTable;
use crate::value::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use tracing::{debug, info};

static GLOBAL: LazyLock<TableRegistry> = LazyLock::new(TableRegistry::new);

/// Registry of mapping tables by entity name
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes. Tables themselves are immutable and handed
/// out as `Arc`s.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: RwLock<HashMap<String, Arc<MappingTable>>>,
}

impl TableRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static TableRegistry {
        &GLOBAL
    }

    /// Register a table for an entity, replacing any previous table
    pub fn register(&self, entity: impl Into<String>, table: impl Into<Arc<MappingTable>>) {
        let entity = entity.into();
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        if tables.insert(entity.clone(), table.into()).is_some() {
            debug!("Replaced mapping table for {}", entity);
        }
    }

    /// Look up the table for an entity
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<MappingTable>)`: The registered table
    /// - `Err(Error::Configuration)`: If no table is registered for `entity`
    pub fn table_for(&self, entity: &str) -> Result<Arc<MappingTable>> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables
            .get(entity)
            .cloned()
            .ok_or_else(|| Error::config(format!("No mapping table registered for {}", entity)))
    }

    /// Check if an entity has a registered table
    pub fn has_entity(&self, entity: &str) -> bool {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.contains_key(entity)
    }

    /// List all registered entity names, sorted
    pub fn list_entities(&self) -> Vec<String> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let mut entities: Vec<String> = tables.keys().cloned().collect();
        entities.sort();
        entities
    }

    /// Register every table in a JSON declaration document
    ///
    /// The document is an object of entity name → table definition. Either
    /// every table is registered or, on error, none is.
    ///
    /// # Returns
    ///
    /// The number of tables registered
    pub fn load_json_str(&self, text: &str) -> Result<usize> {
        let document: Value = serde_json::from_str(text)?;
        self.load_value(&document)
    }

    /// Register every table in a JSON declaration file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let count = self.load_json_str(&text)?;
        info!("Loaded {} mapping tables from {}", count, path.display());
        Ok(count)
    }

    fn load_value(&self, document: &Value) -> Result<usize> {
        let Value::Object(entities) = document else {
            return Err(Error::config(
                "Mapping declaration must be an object of entity name to table",
            ));
        };

        let parsed = entities
            .iter()
            .map(|(entity, def)| {
                MappingTable::from_value(def)
                    .map(|table| (entity.clone(), Arc::new(table)))
                    .map_err(|e| Error::config(format!("Entity {}: {}", entity, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let count = parsed.len();
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        tables.extend(parsed);
        Ok(count)
    }
}
