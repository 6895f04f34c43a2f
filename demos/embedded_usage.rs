//! Minimal embedding example for csmap-core
//!
//! This example declares an order type with nested customer and line items,
//! registers their tables from a JSON declaration and maps a sample document.
//!
//! ## Environment
//!
//! - `CSMAP_LOG_LEVEL`: trace, debug, info, warn or error (default: info)
//! - `CSMAP_COERCION`: lenient or strict (default: lenient)
//! - `CSMAP_TABLES`: path to a declaration file replacing the built-in one

use anyhow::{Context, Result, bail};
use csmap_core::{
    CoercionMode, Error, Groups, Mappable, Mapper, MapperConfig, MappingTable, TableRegistry,
    Value, impl_from_value,
};
use std::env;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

const DECLARATIONS: &str = r#"{
    "customer": {
        "entries": { "display_name": "name", "email": "email" }
    },
    "line_item": {
        "entries": { "sku": "sku", "qty": "quantity", "unit_price": "unitPrice" }
    },
    "order": {
        "entries": { "customer": "customer", "lines": "lines" },
        "groups": {
            "summary": { "order_id": "id", "status": "status" },
            "internal": { "notes": "notes" }
        }
    }
}"#;

const DOCUMENT: &str = r#"{
    "order_id": "1001",
    "status": "paid",
    "notes": "ship before friday",
    "customer": { "display_name": "Ada Lovelace", "email": "ada@example.com" },
    "lines": [
        { "sku": "ENG-1", "qty": 1, "unit_price": 1999.5 },
        { "sku": "CARD-50", "qty": "50", "unit_price": 0.25 }
    ]
}"#;

#[derive(Debug, Default)]
struct Customer {
    name: String,
    email: Option<String>,
}

#[derive(Debug, Default)]
struct LineItem {
    sku: String,
    quantity: u32,
    unit_price: f64,
}

#[derive(Debug, Default)]
struct Order {
    id: u64,
    status: String,
    notes: Option<String>,
    customer: Option<Customer>,
    lines: Vec<LineItem>,
}

impl Mappable for Customer {
    fn entity() -> &'static str {
        "customer"
    }

    fn mapping_table() -> csmap_core::Result<Arc<MappingTable>> {
        TableRegistry::global().table_for(Self::entity())
    }

    fn set_field(&mut self, field: &str, value: &Value, mapper: &Mapper) -> csmap_core::Result<()> {
        match field {
            "name" => self.name = mapper.coerce(value)?,
            "email" => self.email = mapper.coerce(value)?,
            _ => return Err(Error::unknown_field(Self::entity(), field)),
        }
        Ok(())
    }
}

impl Mappable for LineItem {
    fn entity() -> &'static str {
        "line_item"
    }

    fn mapping_table() -> csmap_core::Result<Arc<MappingTable>> {
        TableRegistry::global().table_for(Self::entity())
    }

    fn set_field(&mut self, field: &str, value: &Value, mapper: &Mapper) -> csmap_core::Result<()> {
        match field {
            "sku" => self.sku = mapper.coerce(value)?,
            "quantity" => self.quantity = mapper.coerce(value)?,
            "unitPrice" => self.unit_price = mapper.coerce(value)?,
            _ => return Err(Error::unknown_field(Self::entity(), field)),
        }
        Ok(())
    }
}

impl Mappable for Order {
    fn entity() -> &'static str {
        "order"
    }

    fn mapping_table() -> csmap_core::Result<Arc<MappingTable>> {
        TableRegistry::global().table_for(Self::entity())
    }

    fn set_field(&mut self, field: &str, value: &Value, mapper: &Mapper) -> csmap_core::Result<()> {
        match field {
            "id" => self.id = mapper.coerce(value)?,
            "status" => self.status = mapper.coerce(value)?,
            "notes" => self.notes = mapper.coerce(value)?,
            "customer" => self.customer = mapper.coerce(value)?,
            "lines" => self.lines = mapper.coerce(value)?,
            _ => return Err(Error::unknown_field(Self::entity(), field)),
        }
        Ok(())
    }
}

impl_from_value!(Customer, LineItem);

fn log_level() -> Result<Level> {
    let level = env::var("CSMAP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    Ok(match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        other => bail!("CSMAP_LOG_LEVEL '{}' is not valid", other),
    })
}

fn mapper_config() -> Result<MapperConfig> {
    let coercion = match env::var("CSMAP_COERCION").ok().as_deref() {
        None | Some("lenient") => CoercionMode::Lenient,
        Some("strict") => CoercionMode::Strict,
        Some(other) => bail!("CSMAP_COERCION '{}' is not valid", other),
    };
    Ok(MapperConfig::new().with_coercion(coercion))
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(log_level()?).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    let registry = TableRegistry::global();
    match env::var("CSMAP_TABLES") {
        Ok(path) => registry.load_file(&path)?,
        Err(_) => registry.load_json_str(DECLARATIONS)?,
    };
    info!("Registered entities: {:?}", registry.list_entities());

    let mapper = Mapper::new(mapper_config()?);
    let document: Value = serde_json::from_str(DOCUMENT).context("sample document is not JSON")?;
    let Value::Object(payload) = document else {
        bail!("sample document must be a JSON object");
    };

    // Summary fields only, as a list view would
    let mut summary = Order::default();
    mapper.populate_groups(&mut summary, &payload, &Groups::only(["summary"]))?;
    info!("Summary: #{} ({})", summary.id, summary.status);

    let order: Order = mapper.construct(&payload)?;
    let total: f64 = order
        .lines
        .iter()
        .map(|line| f64::from(line.quantity) * line.unit_price)
        .sum();
    info!(
        "Order #{} for {} ({} lines, total {:.2})",
        order.id,
        order.customer.as_ref().map_or("unknown", |c| c.name.as_str()),
        order.lines.len(),
        total
    );
    for line in &order.lines {
        info!("  {} x{} @ {}", line.sku, line.quantity, line.unit_price);
    }

    let notes: Option<String> = mapper.value_for_key::<Order, _>("notes", &payload)?;
    info!(
        "Notes: {} (constructed order has {})",
        notes.as_deref().unwrap_or("-"),
        order.notes.as_deref().unwrap_or("-")
    );
    info!("Customer email: {}", order.customer.and_then(|c| c.email).as_deref().unwrap_or("-"));

    Ok(())
}
