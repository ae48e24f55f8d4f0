use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub trait DomainEvent: Send + Sync + Clone {
    fn event_type(&self) -> &'static str;
    fn occurred_at(&self) -> DateTime<Utc>;
}

/// One message as delivered by the event channel.
///
/// The kind stays a plain string and the payloads stay untyped JSON until the
/// envelope is decoded by the mobile domain, so an unknown kind or a malformed
/// payload is reported instead of failing inside the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobiles: Option<Map<String, Value>>,
    #[serde(default)]
    pub timestamp_ms: i64,
}

impl Envelope {
    pub fn new(event_type: &str, timestamp_ms: i64) -> Self {
        Self {
            event_type: event_type.to_string(),
            config: None,
            mobiles: None,
            timestamp_ms,
        }
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_mobiles(mut self, mobiles: Map<String, Value>) -> Self {
        self.mobiles = Some(mobiles);
        self
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Timestamp carried by the envelope; out-of-range values map to the epoch.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp_ms).unwrap_or_default()
    }
}

/// Inbound port: something that yields envelopes in arrival order.
/// `Ok(None)` means the stream ended.
#[async_trait]
pub trait EnvelopeSource: Send {
    async fn next_envelope(&mut self) -> Result<Option<Envelope>, String>;
}
