// # Mappable Trait
//
// Defines how a type declares its mapping table and receives mapped values.
//
// ## Usage
//
// ```rust,ignore
// use csmap_core::{Error, Mappable, MappingTable, Mapper, Result, Value};
// use std::sync::{Arc, LazyLock};
//
// static ADDRESS: LazyLock<Arc<MappingTable>> = LazyLock::new(|| {
//     Arc::new(MappingTable::builder().map("city", "cityName").build().unwrap())
// });
//
// #[derive(Default)]
// struct Address {
//     city_name: String,
// }
//
// impl Mappable for Address {
//     fn mapping_table() -> Result<Arc<MappingTable>> {
//         Ok(ADDRESS.clone())
//     }
//
//     fn set_field(&mut self, field: &str, value: &Value, mapper: &Mapper) -> Result<()> {
//         match field {
//             "cityName" => self.city_name = mapper.coerce(value)?,
//             _ => return Err(Error::unknown_field(Self::entity(), field)),
//         }
//         Ok(())
//     }
// }
// ```

use crate::error::{Error, Result};
use crate::mapper::Mapper;
use crate::table::{Groups, MappingTable};
use crate::value::{Payload, Value};
use std::sync::Arc;

/// Trait for types that can be populated from a payload
///
/// Implementors supply two things:
/// 1. **mapping_table()**: the declared key → field translation
/// 2. **set_field()**: assignment of one coerced value by field name
///
/// A blank instance comes from `Default`, which is what
/// [`Mapper::construct`] starts from.
///
/// # Field setters
///
/// `set_field` is a plain `match` on the field name. Coerce with
/// [`Mapper::coerce`] before assigning, so a failed coercion leaves the
/// field untouched. Return [`Error::unknown_field`] for names the type does
/// not know.
pub trait Mappable: Default {
    /// Name this type is known by in a [`crate::TableRegistry`] and in logs
    fn entity() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The declared mapping table for this type
    ///
    /// There is no default table: a type that does not override this fails
    /// every populate call with `Error::Configuration`.
    fn mapping_table() -> Result<Arc<MappingTable>> {
        Err(Error::config(format!(
            "{} declares no mapping table",
            Self::entity()
        )))
    }

    /// Assign one mapped value to the field named `field`
    fn set_field(&mut self, field: &str, value: &Value, mapper: &Mapper) -> Result<()>;

    /// Custom conversion of a raw payload value into an instance
    ///
    /// When this returns `Some`, the result is used instead of nested
    /// mapping, wherever this type appears as a field or collection element.
    fn transform_value(_value: &Value, _mapper: &Mapper) -> Option<Result<Self>> {
        None
    }

    /// Construct a new instance from a payload with the default mapper
    fn from_payload(payload: &Payload) -> Result<Self> {
        Mapper::default().construct(payload)
    }

    /// Populate every mapped field present in `payload`
    fn map_attributes(&mut self, payload: &Payload) -> Result<()> {
        Mapper::default().populate(self, payload)
    }

    /// Populate only the fields mapped by `groups`
    fn map_attributes_in_groups(&mut self, payload: &Payload, groups: &Groups) -> Result<()> {
        Mapper::default().populate_groups(self, payload, groups)
    }
}
