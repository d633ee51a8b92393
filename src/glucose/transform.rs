use serde_json::Value;
use thiserror::Error;

use super::models::{BgRecord, DeviceMessage, GlucoseResponse};
use crate::helpers::{format_hour_minute, parse_utc};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("could not parse glucose response JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("glucose response contains no readings")]
    NoReadings,
    #[error("latest reading has no '{0}'")]
    MissingField(&'static str),
    #[error("latest reading has a non-string '{field}': {value}")]
    NotAString { field: &'static str, value: Value },
    #[error("could not parse reading timestamp '{0}'")]
    Timestamp(String),
}

fn required(value: Option<Value>, field: &'static str) -> Result<Value, ParseError> {
    value.ok_or(ParseError::MissingField(field))
}

fn required_str(value: Option<Value>, field: &'static str) -> Result<String, ParseError> {
    match required(value, field)? {
        Value::String(s) => Ok(s),
        value => Err(ParseError::NotAString { field, value }),
    }
}

/// Turn a response body into the message for the watch, using only the
/// most recent reading.
pub fn message_from_body(body: &str) -> Result<DeviceMessage, ParseError> {
    let response: GlucoseResponse = serde_json::from_str(body)?;
    let latest = response
        .bgs
        .and_then(|bgs| bgs.into_iter().next())
        .ok_or(ParseError::NoReadings)?;
    message_from_record(serde_json::from_value(latest)?)
}

fn message_from_record(record: BgRecord) -> Result<DeviceMessage, ParseError> {
    let sgv = required_str(record.sgv, "sgv")?;
    let datetime = required_str(record.datetime, "datetime")?;
    let bgdelta = required(record.bgdelta, "bgdelta")?;

    let timestamp = parse_utc(&datetime).ok_or(ParseError::Timestamp(datetime))?;

    Ok(DeviceMessage {
        // Only the first '.' and no validation: whatever the API sends is shown
        current_glucose: sgv.replacen('.', ",", 1),
        glucose_delta: bgdelta,
        current_glucose_timestamp: format_hour_minute(&timestamp),
    })
}
