//! Core traits for the mapper
//!
//! This module defines the interfaces a type implements to take part in mapping.
//!
//! - [`Mappable`]: Declare a mapping table and accept mapped field values
//! - [`FromValue`]: Coerce a single payload value into a field type

pub mod from_value;
pub mod mappable;

pub use from_value::FromValue;
pub use mappable::Mappable;
