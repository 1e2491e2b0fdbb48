//! Node records as returned by `GET /api/v1/nodes`.
//!
//! The control-plane owns these records; this side only reads them. Optional
//! fields tolerate both `null` and absence.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::warn;

/// A registered compute node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Opaque unique identifier (a UUID on the reference control-plane)
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub ip: String,

    /// Raw liveness value; see [`Liveness`] for the derived state
    #[serde(default)]
    pub status: Option<String>,

    /// Epoch seconds of the last heartbeat
    #[serde(default)]
    pub last_seen: Option<f64>,

    /// Anything other than an object or a list is treated as absent
    #[serde(
        default,
        deserialize_with = "lenient_capabilities",
        skip_serializing_if = "Option::is_none"
    )]
    pub capabilities: Option<Capabilities>,
}

impl Node {
    pub fn liveness(&self) -> Liveness {
        Liveness::from_status(self.status.as_deref())
    }

    /// Status as reported, empty when the control-plane sent none
    pub fn status_text(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }
}

/// Three-way liveness derived from the raw status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Liveness {
    Online,
    Offline,
    /// Anything that is not exactly `online` or `offline`, including no status
    Pending,
}

impl Liveness {
    pub fn from_status(status: Option<&str>) -> Self {
        match status {
            Some("online") => Liveness::Online,
            Some("offline") => Liveness::Offline,
            _ => Liveness::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Liveness::Online => "online",
            Liveness::Offline => "offline",
            Liveness::Pending => "pending",
        }
    }
}

/// A single capability value.
///
/// Capabilities are free-form on the control-plane (`os`, `cpu_count`,
/// `gpus`, ...), so scalars and nested structures are kept apart here and
/// display code matches on the variant instead of probing JSON types.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    /// Arrays and objects
    Structured(Value),
}

impl From<Value> for CapabilityValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CapabilityValue::Null,
            Value::Bool(b) => CapabilityValue::Bool(b),
            Value::Number(n) => CapabilityValue::Number(n),
            Value::String(s) => CapabilityValue::Text(s),
            structured @ (Value::Array(_) | Value::Object(_)) => {
                CapabilityValue::Structured(structured)
            }
        }
    }
}

impl From<&CapabilityValue> for Value {
    fn from(value: &CapabilityValue) -> Self {
        match value {
            CapabilityValue::Null => Value::Null,
            CapabilityValue::Bool(b) => Value::Bool(*b),
            CapabilityValue::Number(n) => Value::Number(n.clone()),
            CapabilityValue::Text(s) => Value::String(s.clone()),
            CapabilityValue::Structured(v) => v.clone(),
        }
    }
}

impl fmt::Display for CapabilityValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityValue::Null => f.write_str("null"),
            CapabilityValue::Bool(b) => write!(f, "{}", b),
            CapabilityValue::Number(n) => f.write_str(&display_number(n)),
            CapabilityValue::Text(s) => f.write_str(s),
            // Compact JSON never fails for a Value
            CapabilityValue::Structured(v) => write!(f, "{}", normalize_numbers(v.clone())),
        }
    }
}

/// Integral floats print without a fractional part (`8.0` -> `8`).
fn display_number(n: &serde_json::Number) -> String {
    match integral_float(n) {
        Some(i) => i.to_string(),
        None => n.to_string(),
    }
}

fn integral_float(n: &serde_json::Number) -> Option<i64> {
    let f = n.as_f64().filter(|_| n.is_f64())?;
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15).then_some(f as i64)
}

/// Apply the integral-float rule at every depth of a structured value.
fn normalize_numbers(value: Value) -> Value {
    match value {
        Value::Number(n) => match integral_float(&n) {
            Some(i) => Value::Number(i.into()),
            None => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_numbers(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Ordered capability name/value pairs, in the order the JSON object had them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Capabilities(Vec<(String, CapabilityValue)>);

impl Capabilities {
    pub fn new(entries: Vec<(String, CapabilityValue)>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CapabilityValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, key: &str) -> Option<&CapabilityValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for Capabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(map) => Ok(Self(
                map.into_iter()
                    .map(|(k, v)| (k, CapabilityValue::from(v)))
                    .collect(),
            )),
            // Older agents reported a plain list; entries are keyed by index
            Value::Array(items) => Ok(Self(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), CapabilityValue::from(v)))
                    .collect(),
            )),
            other => Err(D::Error::custom(format!(
                "capabilities must be an object or an array, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

/// Object or list capabilities are kept; `null` is absent; any other scalar
/// is logged and dropped so one odd record doesn't fail the whole listing.
fn lenient_capabilities<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Capabilities>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value @ (Value::Object(_) | Value::Array(_)) => {
            Capabilities::deserialize(value).map(Some).map_err(D::Error::custom)
        }
        other => {
            warn!(
                "ignoring capabilities reported as {}",
                json_type_name(&other)
            );
            Ok(None)
        }
    }
}

impl Serialize for Capabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, &Value::from(value))?;
        }
        map.end()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Drop records whose `id` was already seen, keeping the first occurrence
/// in place. Rendering keys cards by id, so duplicates are not passed on.
pub fn dedupe_by_id(nodes: Vec<Node>) -> Vec<Node> {
    let mut seen = HashSet::with_capacity(nodes.len());
    let mut kept = Vec::with_capacity(nodes.len());

    for node in nodes {
        if seen.insert(node.id.clone()) {
            kept.push(node);
        } else {
            warn!(id = %node.id, name = %node.name, "dropping node with duplicate id");
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str, name: &str) -> Node {
        Node {
            id: id.to_string(),
            name: name.to_string(),
            ip: "10.0.0.1".to_string(),
            status: Some("online".to_string()),
            last_seen: None,
            capabilities: None,
        }
    }

    #[test]
    fn test_liveness_mapping() {
        assert_eq!(Liveness::from_status(Some("online")), Liveness::Online);
        assert_eq!(Liveness::from_status(Some("offline")), Liveness::Offline);
        assert_eq!(Liveness::from_status(Some("degraded")), Liveness::Pending);
        assert_eq!(Liveness::from_status(Some("Online")), Liveness::Pending);
        assert_eq!(Liveness::from_status(None), Liveness::Pending);
    }

    #[test]
    fn test_node_optional_fields() {
        let parsed: Node = serde_json::from_value(json!({
            "id": "n1",
            "name": "worker-01",
            "ip": "192.168.1.10",
            "status": null,
            "last_seen": null,
            "capabilities": null
        }))
        .unwrap();

        assert_eq!(parsed.status, None);
        assert_eq!(parsed.last_seen, None);
        assert!(parsed.capabilities.is_none());
        assert_eq!(parsed.liveness(), Liveness::Pending);
        assert_eq!(parsed.status_text(), "");
    }

    #[test]
    fn test_node_without_id_is_rejected() {
        let result: Result<Node, _> = serde_json::from_value(json!({ "name": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_capabilities_keep_order_and_kinds() {
        let parsed: Node = serde_json::from_value(json!({
            "id": "n1",
            "capabilities": {
                "os": "linux",
                "cpu_count": 8,
                "mem_mb": 32000.0,
                "docker": true,
                "gpus": [{"name": "A100"}],
                "zone": null
            }
        }))
        .unwrap();

        let caps = parsed.capabilities.unwrap();
        let keys: Vec<&str> = caps.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["os", "cpu_count", "mem_mb", "docker", "gpus", "zone"]);

        assert_eq!(caps.get("os"), Some(&CapabilityValue::Text("linux".into())));
        assert!(matches!(caps.get("cpu_count"), Some(CapabilityValue::Number(_))));
        assert!(matches!(caps.get("gpus"), Some(CapabilityValue::Structured(_))));
        assert_eq!(caps.get("zone"), Some(&CapabilityValue::Null));
    }

    #[test]
    fn test_capability_display() {
        assert_eq!(CapabilityValue::Text("linux".into()).to_string(), "linux");
        assert_eq!(CapabilityValue::Bool(false).to_string(), "false");
        assert_eq!(CapabilityValue::Null.to_string(), "null");
        assert_eq!(CapabilityValue::from(json!(8)).to_string(), "8");
        assert_eq!(CapabilityValue::from(json!(32000.0)).to_string(), "32000");
        assert_eq!(CapabilityValue::from(json!(1.5)).to_string(), "1.5");
        assert_eq!(
            CapabilityValue::from(json!({"name": "A100", "mem_mb": 40960})).to_string(),
            r#"{"name":"A100","mem_mb":40960}"#
        );
        assert_eq!(CapabilityValue::from(json!([])).to_string(), "[]");
        assert_eq!(
            CapabilityValue::from(json!({"mem_mb": 32000.0, "gpus": [{"vram": 2.0, "clock": 1.5}]}))
                .to_string(),
            r#"{"mem_mb":32000,"gpus":[{"vram":2,"clock":1.5}]}"#
        );
    }

    #[test]
    fn test_capabilities_list_form() {
        let caps: Capabilities = serde_json::from_value(json!(["cuda", "docker"])).unwrap();
        let pairs: Vec<(String, String)> =
            caps.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        assert_eq!(
            pairs,
            vec![
                ("0".to_string(), "cuda".to_string()),
                ("1".to_string(), "docker".to_string())
            ]
        );
    }

    #[test]
    fn test_capabilities_scalar_rejected() {
        let result: Result<Capabilities, _> = serde_json::from_value(json!("gpu"));
        assert!(result.is_err());
    }

    #[test]
    fn test_scalar_capabilities_treated_as_absent() {
        let nodes: Vec<Node> = serde_json::from_value(json!([
            {"id": "n1", "name": "worker-01", "capabilities": {"os": "linux"}},
            {"id": "n2", "name": "worker-02", "capabilities": false},
            {"id": "n3", "name": "worker-03", "capabilities": "gpu"},
            {"id": "n4", "name": "worker-04", "capabilities": 0}
        ]))
        .unwrap();

        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0].capabilities.as_ref().map(Capabilities::len), Some(1));
        assert!(nodes[1..].iter().all(|n| n.capabilities.is_none()));
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let nodes = vec![node("a", "first"), node("b", "second"), node("a", "dup")];
        let kept = dedupe_by_id(nodes);
        let names: Vec<&str> = kept.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
