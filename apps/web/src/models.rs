//! Frontend Models
//!
//! Data structures matching the `/api/analyze` response.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One negotiable fee line (matches backend).
///
/// Decoding is lenient: model output is only prompt-constrained, so numeric
/// strings are accepted and anything non-numeric reads as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NegotiableItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub current: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub target: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reason: String,
}

impl NegotiableItem {
    /// Priced above the suggested target. Equal prices are acceptable.
    pub fn is_overpriced(&self) -> bool {
        self.current > self.target
    }
}

/// Response envelope of `POST /api/analyze` (matches backend).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub msg: Option<String>,
}

impl AnalyzeResponse {
    /// The decoded `data.items` list, if the response is a success carrying one.
    /// `None` means the payload is unusable and the user should be told so.
    pub fn items(&self) -> Option<Vec<NegotiableItem>> {
        if !self.success {
            return None;
        }
        let items = self.data.as_ref()?.get("items")?.as_array()?;
        Some(
            items
                .iter()
                .map(|item| NegotiableItem::deserialize(item).unwrap_or_default())
                .collect(),
        )
    }
}

/// Reads a JSON value the way `Number(x) || 0` would.
pub fn number_or_zero(value: &Value) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    number.filter(|n| n.is_finite()).unwrap_or(0.0)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_or_zero(&value))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
