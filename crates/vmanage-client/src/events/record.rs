//! Event log records

use crate::{Result, VManageError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Raw epoch-millisecond timestamp field
pub const ENTRY_TIME_FIELD: &str = "entry_time";
/// Raw event detail field, a JSON document encoded as a string
pub const DETAILS_FIELD: &str = "details";

/// Event record with a decoded timestamp and parsed details
///
/// `entry_time` and `details` are consumed during decoding; every other
/// field the controller sent is kept in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: Option<DateTime<Utc>>,
    pub event_details: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EventRecord {
    pub fn from_raw(raw: Value) -> Result<Self> {
        let mut fields = match raw {
            Value::Object(map) => map,
            other => {
                return Err(VManageError::Fetch(format!(
                    "event record is not a JSON object: {}",
                    other
                )))
            }
        };

        let timestamp = fields.remove(ENTRY_TIME_FIELD).and_then(|value| {
            let decoded = epoch_millis(&value).and_then(DateTime::<Utc>::from_timestamp_millis);
            if decoded.is_none() {
                warn!("Unreadable {} value: {}", ENTRY_TIME_FIELD, value);
            }
            decoded
        });
        let event_details = fields.remove(DETAILS_FIELD).map(parse_details);

        Ok(Self {
            timestamp,
            event_details,
            fields,
        })
    }

    pub fn event_name(&self) -> Option<&str> {
        self.str_field("eventname")
    }

    pub fn system_ip(&self) -> Option<&str> {
        self.str_field("system_ip")
    }

    pub fn severity(&self) -> Option<&str> {
        self.str_field("severity_level")
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}

fn epoch_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().map(|f| f as i64)),
        _ => None,
    }
}

fn parse_details(raw: Value) -> Value {
    match raw {
        Value::String(text) => match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Event details are not JSON ({}), keeping raw text", e);
                Value::String(text)
            }
        },
        other => other,
    }
}
