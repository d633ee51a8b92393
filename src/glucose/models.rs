use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of the glucose endpoint. Records are kept as raw JSON so that only
/// the one actually used has to be well-formed.
#[derive(Debug, Deserialize)]
pub(super) struct GlucoseResponse {
    #[serde(default)]
    pub bgs: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct BgRecord {
    pub sgv: Option<Value>,
    pub datetime: Option<Value>,
    // Present-but-null must stay distinguishable from absent
    #[serde(default, deserialize_with = "present")]
    pub bgdelta: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Key-value payload sent to the watch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceMessage {
    #[serde(rename = "CURRENT_GLUCOSE")]
    pub current_glucose: String,
    #[serde(rename = "GLUCOSE_DELTA")]
    pub glucose_delta: Value,
    #[serde(rename = "CURRENT_GLUCOSE_TIMESTAMP")]
    pub current_glucose_timestamp: String,
}
