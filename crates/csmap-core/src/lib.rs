// # csmap-core
//
// Declarative mapping of untyped key-value payloads onto typed structs.
//
// ## Architecture Overview
//
// - **Mappable**: Trait a type implements to declare its mapping table and field setter
// - **MappingTable**: External key → field name translation, optionally grouped
// - **Mapper**: Resolves the table, selects groups and populates instances
// - **FromValue**: Per-type coercion of a single payload value
// - **TableRegistry**: Entity-keyed store of tables, loadable from JSON
//
// ## Design Principles
//
// 1. **No Reflection**: Each type routes field names to fields with a plain `match`
// 2. **Sparse Updates**: Keys absent from the payload never touch a field
// 3. **Non-Transactional**: A failing entry stops the call; earlier assignments stay
// 4. **Library-First**: Parsing payloads and loading config are the caller's business

pub mod config;
pub mod error;
pub mod mapper;
pub mod registry;
pub mod table;
pub mod traits;
pub mod value;

// Re-export core types for convenience
pub use config::{CoercionMode, MapperConfig, UnknownGroupPolicy};
pub use error::{Error, Result};
pub use mapper::Mapper;
pub use registry::TableRegistry;
pub use table::{Groups, MappingEntry, MappingTable};
pub use traits::{FromValue, Mappable};
pub use value::{Payload, Value, ValueKind};
