// # FromValue Trait
//
// Coercion of a single payload value into a field type.
//
// Built-in implementations cover text, booleans, integers, floats,
// timestamps, dynamic values, optional values and sequences. Mappable types
// opt in with `impl_from_value!`, which routes through nested mapping.
// Any other type can implement `FromValue` by hand to register its own
// conversion.

use crate::config::CoercionMode;
use crate::error::{Error, Result};
use crate::mapper::Mapper;
use crate::value::{Payload, Value, ValueKind};
use chrono::{DateTime, Utc};

/// Conversion from a payload value into a typed field value
///
/// Errors returned from `from_value` carry an empty path; the mapper
/// prefixes the field name on the way out.
pub trait FromValue: Sized {
    fn from_value(value: &Value, mapper: &Mapper) -> Result<Self>;
}

/// Implement [`FromValue`] for mappable types via nested mapping
///
/// ```rust,ignore
/// csmap_core::impl_from_value!(Address, LineItem);
/// ```
#[macro_export]
macro_rules! impl_from_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::FromValue for $ty {
                fn from_value(
                    value: &$crate::Value,
                    mapper: &$crate::Mapper,
                ) -> $crate::Result<Self> {
                    mapper.nested(value)
                }
            }
        )+
    };
}

fn mismatch<T>(expected: &'static str, value: &Value) -> Result<T> {
    Err(Error::mismatch(expected, ValueKind::of(value)))
}

impl FromValue for Value {
    fn from_value(value: &Value, _mapper: &Mapper) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for Payload {
    fn from_value(value: &Value, _mapper: &Mapper) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(map.clone()),
            other => mismatch("object", other),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value, mapper: &Mapper) -> Result<Self> {
        let lenient = mapper.coercion().is_lenient();
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) if lenient => Ok(n.to_string()),
            Value::Bool(b) if lenient => Ok(b.to_string()),
            other => mismatch("string", other),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &Value, mapper: &Mapper) -> Result<Self> {
        let lenient = mapper.coercion().is_lenient();
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) if lenient => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) if lenient => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        match parsed {
            Some(b) => Ok(b),
            None => mismatch("bool", value),
        }
    }
}

/// Integral value of a payload value, before range checking
fn integral(value: &Value, mode: CoercionMode) -> Option<i128> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i128::from(i));
            }
            if let Some(u) = n.as_u64() {
                return Some(i128::from(u));
            }
            if !mode.is_lenient() {
                return None;
            }
            // Floats with no fractional part and no larger than u64::MAX
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() <= u64::MAX as f64)
                .map(|f| f as i128)
        }
        Value::String(s) if mode.is_lenient() => s.trim().parse::<i128>().ok(),
        _ => None,
    }
}

macro_rules! integer_from_value {
    ($($ty:ty),+) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value, mapper: &Mapper) -> Result<Self> {
                    integral(value, mapper.coercion())
                        .and_then(|i| <$ty>::try_from(i).ok())
                        .map_or_else(|| mismatch(stringify!($ty), value), Ok)
                }
            }
        )+
    };
}

integer_from_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(value: &Value, mapper: &Mapper) -> Result<Self> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) if mapper.coercion().is_lenient() => {
                s.trim().parse::<f64>().ok().filter(|f| f.is_finite())
            }
            _ => None,
        };
        parsed.map_or_else(|| mismatch("f64", value), Ok)
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value, mapper: &Mapper) -> Result<Self> {
        match f64::from_value(value, mapper) {
            Ok(wide) if (wide as f32).is_finite() => Ok(wide as f32),
            _ => mismatch("f32", value),
        }
    }
}

/// RFC 3339 text, or Unix seconds when coercion is lenient
impl FromValue for DateTime<Utc> {
    fn from_value(value: &Value, mapper: &Mapper) -> Result<Self> {
        let parsed = match value {
            Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            Value::Number(n) if mapper.coercion().is_lenient() => match n.as_i64() {
                Some(secs) => DateTime::from_timestamp(secs, 0),
                None => n
                    .as_f64()
                    .filter(|f| f.is_finite())
                    .and_then(|f| DateTime::from_timestamp_millis((f * 1000.0) as i64)),
            },
            _ => None,
        };
        parsed.map_or_else(|| mismatch("timestamp", value), Ok)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value, mapper: &Mapper) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other, mapper).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: &Value, mapper: &Mapper) -> Result<Self> {
        T::from_value(value, mapper).map(Box::new)
    }
}

/// Element-wise, in source order
impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value, mapper: &Mapper) -> Result<Self> {
        let Value::Array(items) = value else {
            return mismatch("array", value);
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| T::from_value(item, mapper).map_err(|e| e.at_index(index)))
            .collect()
    }
}
