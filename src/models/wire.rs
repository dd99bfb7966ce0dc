//! Lenient deserializers for backend payloads. The backend mixes numeric and
//! string identifiers and sometimes sends `null` where a list is expected.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::utils::display_json;

/// Any scalar (number, string, bool) as a string; `null` becomes empty.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => display_json(&other),
    })
}

pub fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = lenient_string(deserializer)?;
    Ok(if s.is_empty() { None } else { Some(s) })
}

/// A list of strings given either as an array, a `KEY: VALUE` map, or a
/// newline separated string.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .iter()
            .map(display_json)
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}={}", k, display_json(v)))
            .collect(),
        Value::String(s) => crate::utils::non_empty_lines(&s),
        _ => Vec::new(),
    })
}

/// Booleans that may arrive as `"true"`, `1` or `null`.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().map(|v| v != 0).unwrap_or(false),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1" | "on"),
        _ => false,
    })
}

pub fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Reference to another entity: `{ "id": 3, "username": "ana" }` or a bare id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

impl<'de> Deserialize<'de> for EntityRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match &value {
            Value::Object(obj) => {
                let id = obj.get("id").map(display_json).unwrap_or_default();
                let name = ["username", "name", "email"]
                    .iter()
                    .find_map(|k| obj.get(*k).and_then(|v| v.as_str()))
                    .unwrap_or("")
                    .to_string();
                EntityRef { id, name }
            }
            Value::Null => EntityRef::default(),
            other => EntityRef {
                id: display_json(other),
                name: String::new(),
            },
        })
    }
}

impl EntityRef {
    pub fn display(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
