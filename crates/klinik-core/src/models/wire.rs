//! Deserialization helpers for server payloads.
//!
//! The server is loose about types: ids arrive as numbers or numeric strings,
//! text columns may be `null`. Everything is normalized here.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::EntityId;

fn id_from_value<E: serde::de::Error>(value: Value) -> Result<Option<EntityId>, E> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i))
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 => Ok(Some(f as EntityId)),
                    _ => Err(E::custom(format!("invalid id: {}", n))),
                }
            }
        }
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| E::custom(format!("invalid id: {}", s))),
        other => Err(E::custom(format!("invalid id: {}", other))),
    }
}

/// Required id: number or numeric string.
pub fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EntityId, D::Error> {
    let value = Value::deserialize(deserializer)?;
    id_from_value(value)?.ok_or_else(|| D::Error::custom("missing id"))
}

/// Optional foreign key; `null` and `""` become `None`. Pair with `#[serde(default)]`.
pub fn de_opt_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<EntityId>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    id_from_value(value)
}

/// Text column; `null` becomes empty, scalars are stringified. Pair with `#[serde(default)]`.
pub fn de_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}
