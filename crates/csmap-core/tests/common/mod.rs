//! Fixtures and common utilities for mapping contract tests
//!
//! This module provides a small family of mappable types: a person with a
//! nested address, a collection of line items, a transformed money value and
//! grouped fields.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use csmap_core::{
    Error, Mappable, Mapper, MappingTable, Payload, Result, Value, ValueKind, impl_from_value,
};
use std::sync::{Arc, LazyLock};

/// Unwrap a `json!` object into a payload
pub fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture payload must be an object, got {other}"),
    }
}

static ADDRESS_TABLE: LazyLock<Arc<MappingTable>> = LazyLock::new(|| {
    Arc::new(
        MappingTable::builder()
            .map("city", "cityName")
            .map("zip", "zipCode")
            .build()
            .expect("address table is valid"),
    )
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Address {
    pub city_name: String,
    pub zip_code: Option<String>,
}

impl Mappable for Address {
    fn entity() -> &'static str {
        "address"
    }

    fn mapping_table() -> Result<Arc<MappingTable>> {
        Ok(ADDRESS_TABLE.clone())
    }

    fn set_field(&mut self, field: &str, value: &Value, mapper: &Mapper) -> Result<()> {
        match field {
            "cityName" => self.city_name = mapper.coerce(value)?,
            "zipCode" => self.zip_code = mapper.coerce(value)?,
            _ => return Err(Error::unknown_field(Self::entity(), field)),
        }
        Ok(())
    }
}

static LINE_ITEM_TABLE: LazyLock<Arc<MappingTable>> = LazyLock::new(|| {
    Arc::new(
        MappingTable::builder()
            .map("n", "num")
            .map("label", "label")
            .build()
            .expect("line item table is valid"),
    )
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LineItem {
    pub num: i64,
    pub label: String,
}

impl Mappable for LineItem {
    fn entity() -> &'static str {
        "line_item"
    }

    fn mapping_table() -> Result<Arc<MappingTable>> {
        Ok(LINE_ITEM_TABLE.clone())
    }

    fn set_field(&mut self, field: &str, value: &Value, mapper: &Mapper) -> Result<()> {
        match field {
            "num" => self.num = mapper.coerce(value)?,
            "label" => self.label = mapper.coerce(value)?,
            _ => return Err(Error::unknown_field(Self::entity(), field)),
        }
        Ok(())
    }
}

static MONEY_TABLE: LazyLock<Arc<MappingTable>> = LazyLock::new(|| {
    Arc::new(
        MappingTable::builder()
            .map("amount_cents", "cents")
            .map("currency", "currency")
            .build()
            .expect("money table is valid"),
    )
});

/// Accepts `"12.34 EUR"` text and bare numbers through its transform, and
/// falls back to nested mapping for objects.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Money {
    pub cents: i64,
    pub currency: String,
}

impl Money {
    fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let amount: f64 = parts.next()?.parse().ok()?;
        let currency = parts.next()?.to_string();
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            cents: (amount * 100.0).round() as i64,
            currency,
        })
    }
}

impl Mappable for Money {
    fn entity() -> &'static str {
        "money"
    }

    fn mapping_table() -> Result<Arc<MappingTable>> {
        Ok(MONEY_TABLE.clone())
    }

    fn set_field(&mut self, field: &str, value: &Value, mapper: &Mapper) -> Result<()> {
        match field {
            "cents" => self.cents = mapper.coerce(value)?,
            "currency" => self.currency = mapper.coerce(value)?,
            _ => return Err(Error::unknown_field(Self::entity(), field)),
        }
        Ok(())
    }

    fn transform_value(value: &Value, _mapper: &Mapper) -> Option<Result<Self>> {
        match value {
            Value::String(text) => Some(
                Self::parse(text).ok_or_else(|| Error::mismatch("money", ValueKind::String)),
            ),
            Value::Number(n) => Some(
                n.as_f64()
                    .map(|amount| Self {
                        cents: (amount * 100.0).round() as i64,
                        currency: "USD".to_string(),
                    })
                    .ok_or_else(|| Error::mismatch("money", ValueKind::Number)),
            ),
            _ => None,
        }
    }
}

impl_from_value!(Address, LineItem, Money);

static PERSON_TABLE: LazyLock<Arc<MappingTable>> = LazyLock::new(|| {
    Arc::new(
        MappingTable::builder()
            .map("addr", "address")
            .map("items", "items")
            .map("tags", "tags")
            .map("joined_at", "joined")
            .map("balance", "balance")
            .group("basic", [("name", "name"), ("age", "age")])
            .group("secret", [("token", "token")])
            .build()
            .expect("person table is valid"),
    )
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub address: Option<Address>,
    pub items: Vec<LineItem>,
    pub tags: Vec<String>,
    pub joined: Option<DateTime<Utc>>,
    pub balance: Option<Money>,
    pub token: Option<String>,
}

impl Mappable for Person {
    fn entity() -> &'static str {
        "person"
    }

    fn mapping_table() -> Result<Arc<MappingTable>> {
        Ok(PERSON_TABLE.clone())
    }

    fn set_field(&mut self, field: &str, value: &Value, mapper: &Mapper) -> Result<()> {
        match field {
            "name" => self.name = mapper.coerce(value)?,
            "age" => self.age = mapper.coerce(value)?,
            "address" => self.address = mapper.coerce(value)?,
            "items" => self.items = mapper.coerce(value)?,
            "tags" => self.tags = mapper.coerce(value)?,
            "joined" => self.joined = mapper.coerce(value)?,
            "balance" => self.balance = mapper.coerce(value)?,
            "token" => self.token = mapper.coerce(value)?,
            _ => return Err(Error::unknown_field(Self::entity(), field)),
        }
        Ok(())
    }
}

/// A table entry whose field the setter does not handle
#[derive(Debug, Default)]
pub struct Misdeclared {
    pub id: String,
}

static MISDECLARED_TABLE: LazyLock<Arc<MappingTable>> = LazyLock::new(|| {
    Arc::new(
        MappingTable::builder()
            .map("id", "id")
            .map("ghost", "ghostField")
            .build()
            .expect("misdeclared table is valid"),
    )
});

impl Mappable for Misdeclared {
    fn entity() -> &'static str {
        "misdeclared"
    }

    fn mapping_table() -> Result<Arc<MappingTable>> {
        Ok(MISDECLARED_TABLE.clone())
    }

    fn set_field(&mut self, field: &str, value: &Value, mapper: &Mapper) -> Result<()> {
        match field {
            "id" => self.id = mapper.coerce(value)?,
            _ => return Err(Error::unknown_field(Self::entity(), field)),
        }
        Ok(())
    }
}

/// Records every assignment it receives
#[derive(Debug, Default)]
pub struct Recorder {
    pub assignments: Vec<String>,
}

static RECORDER_TABLE: LazyLock<Arc<MappingTable>> = LazyLock::new(|| {
    Arc::new(
        MappingTable::builder()
            .map("id", "id")
            .group("a", [("id", "id"), ("x", "x")])
            .group("b", [("id", "id"), ("x", "x"), ("y", "y")])
            .build()
            .expect("recorder table is valid"),
    )
});

impl Mappable for Recorder {
    fn entity() -> &'static str {
        "recorder"
    }

    fn mapping_table() -> Result<Arc<MappingTable>> {
        Ok(RECORDER_TABLE.clone())
    }

    fn set_field(&mut self, field: &str, _value: &Value, _mapper: &Mapper) -> Result<()> {
        self.assignments.push(field.to_string());
        Ok(())
    }
}
