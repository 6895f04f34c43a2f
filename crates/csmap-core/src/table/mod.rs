//! Mapping tables
//!
//! A [`MappingTable`] translates external payload keys into internal field
//! names. Entries either sit in the ungrouped part of the table or belong to
//! a named group, which lets a caller populate only some fields.
//!
//! ## Declaring a table
//!
//! ```rust
//! use csmap_core::table::MappingTable;
//!
//! let table = MappingTable::builder()
//!     .map("first_name", "firstName")
//!     .group("basic", [("id", "identifier")])
//!     .group("secret", [("token", "token")])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(table.field_for_key("id"), Some("identifier"));
//! ```
//!
//! The same shape can be declared in JSON:
//!
//! ```json
//! { "entries": { "first_name": "firstName" },
//!   "groups": { "basic": { "id": "identifier" } } }
//! ```

use crate::config::UnknownGroupPolicy;
use crate::error::{Error, Result};
use crate::value::Value;
use serde::Deserialize;
use std::collections::HashSet;
use tracing::warn;

/// One external key → internal field translation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappingEntry {
    key: String,
    field: String,
}

impl MappingEntry {
    pub fn new(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field: field.into(),
        }
    }

    /// External payload key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Internal field name
    pub fn field(&self) -> &str {
        &self.field
    }
}

/// A named subset of a table's entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: String,
    entries: Vec<MappingEntry>,
}

impl Group {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }
}

/// Which groups of a table to apply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Groups {
    /// Ungrouped entries plus every group
    #[default]
    All,
    /// Only the entries of the named groups
    Only(Vec<String>),
}

impl Groups {
    /// Restrict population to the named groups
    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Groups::Only(names.into_iter().map(Into::into).collect())
    }
}

/// Declared translation from payload keys to field names
///
/// Tables are immutable once built. Share them with `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
    groups: Vec<Group>,
}

impl MappingTable {
    /// Start declaring a table
    pub fn builder() -> MappingTableBuilder {
        MappingTableBuilder::default()
    }

    /// Ungrouped entries, in declaration order
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Declared groups, in declaration order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Entries of one group
    pub fn group(&self, name: &str) -> Option<&[MappingEntry]> {
        self.groups
            .iter()
            .find(|group| group.name == name)
            .map(|group| group.entries.as_slice())
    }

    /// Check if a group is declared
    pub fn has_group(&self, name: &str) -> bool {
        self.group(name).is_some()
    }

    /// Iterate over every entry, ungrouped first, then group by group
    ///
    /// An entry declared identically in several places is yielded once.
    pub fn iter(&self) -> impl Iterator<Item = &MappingEntry> + '_ {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .chain(self.groups.iter().flat_map(|group| group.entries.iter()))
            .filter(move |entry| seen.insert(*entry))
    }

    /// Number of distinct entries
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Check if the table declares no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.groups.iter().all(|group| group.entries.is_empty())
    }

    /// Find the entry for an external key anywhere in the table
    pub fn entry_for_key(&self, key: &str) -> Option<&MappingEntry> {
        self.iter().find(|entry| entry.key == key)
    }

    /// Resolve the field name for an external key
    pub fn field_for_key(&self, key: &str) -> Option<&str> {
        self.entry_for_key(key).map(MappingEntry::field)
    }

    /// Select the entries a populate call applies
    ///
    /// Identical entries shared between selected groups are returned once.
    /// Requested groups the table does not declare are handled per `policy`.
    pub fn select(&self, groups: &Groups, policy: UnknownGroupPolicy) -> Result<Vec<&MappingEntry>> {
        let names = match groups {
            Groups::All => return Ok(self.iter().collect()),
            Groups::Only(names) => names,
        };

        let mut seen = HashSet::new();
        let mut selected = Vec::new();

        for name in names {
            let Some(entries) = self.group(name) else {
                match policy {
                    UnknownGroupPolicy::Reject => {
                        return Err(Error::config(format!("Unknown mapping group: {}", name)));
                    }
                    UnknownGroupPolicy::Ignore => {
                        warn!("Mapping group {} is not declared, skipping", name);
                        continue;
                    }
                }
            };

            selected.extend(entries.iter().filter(|entry| seen.insert(*entry)));
        }

        Ok(selected)
    }

    /// Build a table from its JSON definition
    pub fn from_value(value: &Value) -> Result<Self> {
        let def = TableDef::deserialize(value)?;
        def.into_table()
    }

    /// Parse a table from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let def: TableDef = serde_json::from_str(text)?;
        def.into_table()
    }
}

/// Builder for [`MappingTable`]
///
/// Validation happens in [`MappingTableBuilder::build`].
#[derive(Debug, Default)]
pub struct MappingTableBuilder {
    entries: Vec<MappingEntry>,
    groups: Vec<Group>,
}

impl MappingTableBuilder {
    /// Add an ungrouped entry
    pub fn map(mut self, key: impl Into<String>, field: impl Into<String>) -> Self {
        self.entries.push(MappingEntry::new(key, field));
        self
    }

    /// Add a named group of entries
    pub fn group<I, K, F>(mut self, name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, F)>,
        K: Into<String>,
        F: Into<String>,
    {
        self.groups.push(Group {
            name: name.into(),
            entries: entries
                .into_iter()
                .map(|(key, field)| MappingEntry::new(key, field))
                .collect(),
        });
        self
    }

    /// Validate and build the table
    ///
    /// # Errors
    ///
    /// `Error::Configuration` when a key or field name is empty, an external
    /// key repeats within the ungrouped entries or within one group, or a
    /// group name is empty or declared twice.
    pub fn build(self) -> Result<MappingTable> {
        check_entries("ungrouped entries", &self.entries)?;

        let mut names = HashSet::new();
        for group in &self.groups {
            if group.name.is_empty() {
                return Err(Error::config("Mapping group name cannot be empty"));
            }
            if !names.insert(group.name.as_str()) {
                return Err(Error::config(format!(
                    "Mapping group {} is declared twice",
                    group.name
                )));
            }
            check_entries(&format!("group {}", group.name), &group.entries)?;
        }

        Ok(MappingTable {
            entries: self.entries,
            groups: self.groups,
        })
    }
}

fn check_entries(scope: &str, entries: &[MappingEntry]) -> Result<()> {
    let mut keys = HashSet::new();
    for entry in entries {
        if entry.key.is_empty() {
            return Err(Error::config(format!("Empty external key in {}", scope)));
        }
        if entry.field.is_empty() {
            return Err(Error::config(format!(
                "Empty field name for key {} in {}",
                entry.key, scope
            )));
        }
        if !keys.insert(entry.key.as_str()) {
            return Err(Error::config(format!(
                "Duplicate external key {} in {}",
                entry.key, scope
            )));
        }
    }
    Ok(())
}

/// JSON shape of a table declaration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableDef {
    #[serde(default)]
    entries: serde_json::Map<String, Value>,

    #[serde(default)]
    groups: serde_json::Map<String, Value>,
}

impl TableDef {
    fn into_table(self) -> Result<MappingTable> {
        let mut builder = MappingTable::builder();

        for (key, field) in &self.entries {
            builder = builder.map(key.as_str(), field_name(key, field)?);
        }

        for (name, group) in &self.groups {
            let Value::Object(entries) = group else {
                return Err(Error::config(format!(
                    "Mapping group {} must be an object of key to field names",
                    name
                )));
            };
            let entries = entries
                .iter()
                .map(|(key, field)| Ok((key.as_str(), field_name(key, field)?)))
                .collect::<Result<Vec<_>>>()?;
            builder = builder.group(name.as_str(), entries);
        }

        builder.build()
    }
}

fn field_name<'a>(key: &str, field: &'a Value) -> Result<&'a str> {
    field
        .as_str()
        .ok_or_else(|| Error::config(format!("Field name for key {} must be a string", key)))
}
