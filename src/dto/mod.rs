use axum::extract::FromRequest;
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

use crate::error::AppError;

pub mod assets;
pub mod auth;
pub mod categories;
pub mod email;
pub mod orders;
pub mod payments;
pub mod products;

/// JSON body extractor whose rejections render as a 400 `ApiResponse`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Accepts `true`/`false`, `0`/`1` or their string forms for a 0/1 flag.
pub fn flag<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let truthy = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => match n.as_u64() {
            Some(0) => false,
            Some(1) => true,
            _ => return Err(de::Error::custom("flag must be 0 or 1")),
        },
        Some(Value::String(s)) => match s.as_str() {
            "0" | "false" => false,
            "1" | "true" => true,
            _ => return Err(de::Error::custom("flag must be 0 or 1")),
        },
        Some(_) => return Err(de::Error::custom("flag must be 0 or 1")),
    };
    Ok(Some(u8::from(truthy)))
}

/// Names of the fields whose value is blank.
pub(crate) fn missing_fields<'a>(fields: &[(&'a str, &str)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect()
}
