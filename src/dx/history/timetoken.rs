//! Timetoken wire codec.
//!
//! History endpoints disagree on whether timetokens are quoted: the current
//! response format ships them as JSON strings while the deprecated one uses
//! plain numbers. The codec silently accepts both.

use crate::core::StreamHubError;
use serde::Deserialize;
use serde_json::Value;

/// Timetoken type used in history API.
///
/// Server-issued 64-bit monotonically increasing timestamp with
/// sub-millisecond resolution. Used both as a message identifier and a
/// pagination cursor; this crate performs no arithmetic on it.
pub type Timetoken = u64;

/// Decode a JSON scalar that holds a timetoken either as a quoted integer or
/// as a plain number.
///
/// # Errors
/// Returns a [`StreamHubError::MalformedTimetoken`] if the value is neither
/// parseable string nor an unsigned integer.
pub(crate) fn decode(value: &Value) -> Result<Timetoken, StreamHubError> {
    if let Some(token) = value.as_str() {
        if let Ok(token) = token.parse::<Timetoken>() {
            return Ok(token);
        }
    }

    if let Some(token) = value.as_u64() {
        return Ok(token);
    }

    Err(StreamHubError::MalformedTimetoken {
        details: format!("expected integer or integer string, got {value}"),
    })
}

/// `serde` adapter over [`decode`] for timetoken struct fields.
pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Timetoken, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    decode(&value).map_err(serde::de::Error::custom)
}
