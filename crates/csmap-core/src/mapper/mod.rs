//! Core mapper
//!
//! The Mapper is responsible for:
//! - Resolving the mapping table of a target type
//! - Selecting the entries requested by group
//! - Looking up each external key in the payload
//! - Handing present values to the type's field setter
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │   Payload   │────▶│    Mapper    │────▶│ Mappable::       │
//! │ (untyped)   │     │ table+groups │     │   set_field()    │
//! └─────────────┘     └──────────────┘     └──────────────────┘
//!                            │                       │
//!                            │                       ▼
//!                            │              ┌──────────────────┐
//!                            └─────────────▶│ FromValue /      │
//!                               nested      │ nested construct │
//!                                           └──────────────────┘
//! ```
//!
//! ## Failure Semantics
//!
//! Mapping is not transactional. When an entry fails, fields assigned by
//! earlier entries keep their new values and the error is returned at once.
//! Keys absent from the payload are skipped and never fail.

use crate::config::{CoercionMode, MapperConfig};
use crate::error::{Error, Result};
use crate::table::{Groups, MappingTable};
use crate::traits::{FromValue, Mappable};
use crate::value::{Payload, Value, ValueKind};
use tracing::{debug, trace};

/// Populates [`Mappable`] types from untyped payloads
///
/// A mapper holds only its configuration, so it is cheap to create and can
/// be shared freely between threads.
///
/// ## Entry Points
///
/// - [`Mapper::construct`]: build a new instance from a payload
/// - [`Mapper::populate`] / [`Mapper::populate_groups`]: update an instance in place
/// - [`Mapper::value_for_key`]: read one value without an instance
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    config: MapperConfig,
}

impl Mapper {
    /// Create a mapper from a configuration
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Coercion mode in effect for this mapper
    pub fn coercion(&self) -> CoercionMode {
        self.config.coercion
    }

    /// Construct a new `T` populated from every mapped key in `payload`
    ///
    /// Starts from `T::default()`, so unmapped or absent fields keep their
    /// default values.
    pub fn construct<T: Mappable>(&self, payload: &Payload) -> Result<T> {
        let mut instance = T::default();
        self.populate(&mut instance, payload)?;
        Ok(instance)
    }

    /// Populate every mapped field of `instance` present in `payload`
    pub fn populate<T: Mappable>(&self, instance: &mut T, payload: &Payload) -> Result<()> {
        self.populate_groups(instance, payload, &Groups::All)
    }

    /// Populate the fields of `instance` mapped by the requested groups
    ///
    /// # Errors
    ///
    /// - `Error::Configuration`: `T` declares no table, a requested group is
    ///   unknown (under the reject policy), or the setter does not know a
    ///   mapped field
    /// - `Error::TypeMismatch`: a present value cannot be coerced; the path
    ///   names the failing field
    pub fn populate_groups<T: Mappable>(
        &self,
        instance: &mut T,
        payload: &Payload,
        groups: &Groups,
    ) -> Result<()> {
        let table = T::mapping_table()?;
        self.populate_with_table(instance, &table, payload, groups)
    }

    /// Populate `instance` through an explicit table instead of its own
    ///
    /// Lets one type be filled from several entity declarations, e.g. a
    /// second table fetched from a [`crate::TableRegistry`]. The table's
    /// field names must be ones `T::set_field` understands.
    pub fn populate_with_table<T: Mappable>(
        &self,
        instance: &mut T,
        table: &MappingTable,
        payload: &Payload,
        groups: &Groups,
    ) -> Result<()> {
        let entries = table.select(groups, self.config.unknown_groups)?;

        debug!("Mapping {} ({} entries selected)", T::entity(), entries.len());

        let mut applied = 0;
        for entry in &entries {
            let Some(value) = payload.get(entry.key()) else {
                trace!("Key {} absent, leaving {} unchanged", entry.key(), entry.field());
                continue;
            };

            trace!("Assigning {} from key {}", entry.field(), entry.key());
            instance
                .set_field(entry.field(), value, self)
                .map_err(|e| e.within(entry.field()))
                .inspect_err(|e| debug!("Failed to map {}: {}", T::entity(), e))?;
            applied += 1;
        }

        debug!(
            "Mapped {} ({} applied, {} absent)",
            T::entity(),
            applied,
            entries.len() - applied
        );

        Ok(())
    }

    /// Construct a new `T` through an explicit table
    pub fn construct_with_table<T: Mappable>(
        &self,
        table: &MappingTable,
        payload: &Payload,
    ) -> Result<T> {
        let mut instance = T::default();
        self.populate_with_table(&mut instance, table, payload, &Groups::All)?;
        Ok(instance)
    }

    /// Coerce a payload value to a field type
    ///
    /// This is what field setters call before assigning.
    pub fn coerce<V: FromValue>(&self, value: &Value) -> Result<V> {
        V::from_value(value, self)
    }

    /// Map a payload value into a nested mappable instance
    ///
    /// `T::transform_value` is consulted first and wins when it answers.
    /// Otherwise the value must be an object, which is constructed into a
    /// new `T`.
    pub fn nested<T: Mappable>(&self, value: &Value) -> Result<T> {
        if let Some(result) = T::transform_value(value, self) {
            trace!("Using transform for {}", T::entity());
            return result;
        }

        match value {
            Value::Object(payload) => self.construct(payload),
            other => Err(Error::mismatch("object", ValueKind::of(other))),
        }
    }

    /// Resolve the field name `T` declares for an external key
    pub fn field_for_key<T: Mappable>(&self, key: &str) -> Result<String> {
        let table = T::mapping_table()?;
        table
            .field_for_key(key)
            .map(str::to_string)
            .ok_or_else(|| undeclared_key::<T>(key))
    }

    /// Read a single value without constructing an instance
    ///
    /// Value-level access does not need a table: when `T` declares one that
    /// maps `key`, mismatch paths name the declared field, otherwise they
    /// name the key itself. Returns `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// - `Error::TypeMismatch`: the value cannot be coerced to `V`
    pub fn value_for_key<T: Mappable, V: FromValue>(
        &self,
        key: &str,
        payload: &Payload,
    ) -> Result<Option<V>> {
        let Some(value) = payload.get(key) else {
            return Ok(None);
        };

        let field = match T::mapping_table() {
            Ok(table) => table.field_for_key(key).unwrap_or(key).to_string(),
            Err(_) => {
                trace!("{} has no table, reading key {} directly", T::entity(), key);
                key.to_string()
            }
        };

        V::from_value(value, self)
            .map(Some)
            .map_err(|e| e.within(&field))
    }

    /// Like [`Mapper::value_for_key`], but returns the raw payload value
    pub fn raw_value_for_key<'p>(&self, key: &str, payload: &'p Payload) -> Option<&'p Value> {
        payload.get(key)
    }
}

fn undeclared_key<T: Mappable>(key: &str) -> Error {
    Error::config(format!("{} does not map key {}", T::entity(), key))
}
