//! Forgiving field decoders for the persisted record.
//!
//! A stored field that is missing, `null`, or not a number must read as 0
//! instead of invalidating the whole record. Collections follow the same
//! rule one level down: a `null` list reads as empty and an element that
//! cannot be decoded is dropped on its own.

use chrono::NaiveDate;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
    Flag(bool),
    Other(IgnoredAny),
}

impl Loose {
    fn as_f64(&self) -> f64 {
        let value = match self {
            Loose::Number(n) => *n,
            Loose::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Loose::Flag(_) | Loose::Other(_) => 0.0,
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

/// Decode a real number; anything unusable becomes 0.0.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let loose = Option::<Loose>::deserialize(deserializer)?;
    Ok(loose.map(|l| l.as_f64()).unwrap_or(0.0))
}

/// Decode a non-negative whole number, truncating fractions.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = number(deserializer)?;
    Ok(value.clamp(0.0, u32::MAX as f64) as u32)
}

/// Decode a small habit level (0–255); range checks happen at derivation time.
pub fn level<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = number(deserializer)?;
    Ok(value.clamp(0.0, u8::MAX as f64) as u8)
}

/// Decode a boolean; numbers and strings are accepted the way a form would send them.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let loose = Option::<Loose>::deserialize(deserializer)?;
    Ok(match loose {
        Some(Loose::Flag(b)) => b,
        Some(Loose::Number(n)) => n != 0.0,
        Some(Loose::Text(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        Some(Loose::Other(_)) | None => false,
    })
}

/// Decode a map of amounts; unusable amounts become 0.0 and keys that do
/// not decode are skipped.
pub fn number_map<'de, D, K>(deserializer: D) -> Result<std::collections::BTreeMap<K, f64>, D::Error>
where
    D: Deserializer<'de>,
    K: DeserializeOwned + Ord,
{
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(std::collections::BTreeMap::new());
    };
    Ok(entries
        .into_iter()
        .filter_map(|(key, value)| {
            let key = serde_json::from_value::<K>(Value::String(key)).ok()?;
            let amount = serde_json::from_value::<Loose>(value)
                .map(|l| l.as_f64())
                .unwrap_or(0.0);
            Some((key, amount))
        })
        .collect())
}

/// Decode a list of entities. Anything but an array reads as empty, and
/// elements that fail to decode are dropped instead of failing the record.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if kept.len() < total {
        warn!(
            dropped = total - kept.len(),
            kept = kept.len(),
            "Skipped unreadable entries in stored list"
        );
    }
    Ok(kept)
}

/// Decode an optional calendar date; anything unparseable reads as `None`.
pub fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decode an entity id. Older records used numeric ids; those and any other
/// non-UUID value get a fresh id so the entry itself survives.
pub fn id<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|_| Uuid::new_v4()))
}
