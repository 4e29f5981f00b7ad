//! `--format json` envelope
//!
//! Every JSON document the CLI prints has the shape
//! `{ "data": ..., "meta": { "tool", "version", "timestamp", "count"? } }`
//! where `count` is only present when `data` is a list.

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub data: Value,
    pub meta: Metadata,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub tool: &'static str,
    pub version: &'static str,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl JsonOutput {
    pub fn new(data: Value) -> Self {
        let count = data.as_array().map(Vec::len);
        Self {
            data,
            meta: Metadata {
                tool: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
                timestamp: Utc::now().to_rfc3339(),
                count,
            },
        }
    }
}

/// Wrap `data` in the envelope and pretty-print it
pub fn format_json<T: Serialize + ?Sized>(data: &T) -> Result<String, serde_json::Error> {
    let output = JsonOutput::new(serde_json::to_value(data)?);
    serde_json::to_string_pretty(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_envelope_carries_count() {
        let out = format_json(&vec![json!({"id": "INC-1"}), json!({"id": "INC-2"})]).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["data"][1]["id"], "INC-2");
        assert_eq!(value["meta"]["tool"], "cybrty");
        assert_eq!(value["meta"]["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(value["meta"]["count"], 2);
        assert!(value["meta"]["timestamp"].is_string());
    }

    #[test]
    fn test_single_object_has_no_count() {
        let out = format_json(&json!({"scan_id": "S1", "status": "completed"})).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["data"]["scan_id"], "S1");
        assert!(value["meta"].get("count").is_none());
    }

    #[test]
    fn test_empty_list_counts_zero() {
        let rows: Vec<Value> = Vec::new();
        let value: Value = serde_json::from_str(&format_json(&rows).unwrap()).unwrap();

        assert_eq!(value["data"], json!([]));
        assert_eq!(value["meta"]["count"], 0);
    }
}
