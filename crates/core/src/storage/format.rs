use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;
use crate::models::state::AppState;

/// Current record format version.
pub const CURRENT_VERSION: u16 = 1;

/// Key of the version field in the stored envelope.
const VERSION_FIELD: &str = "version";

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u16,
    state: &'a AppState,
}

#[derive(Deserialize)]
struct Envelope {
    version: u16,
    state: Value,
}

/// Serialize a record into the stored envelope.
///
/// Layout:
/// ```text
/// { "version": 1, "state": { "workFocus": 1, ... } }
/// ```
pub fn encode(state: &AppState) -> Result<String, CoreError> {
    serde_json::to_string(&EnvelopeRef {
        version: CURRENT_VERSION,
        state,
    })
    .map_err(|e| CoreError::Serialization(format!("Failed to serialize record: {e}")))
}

/// Pretty-printed variant of [`encode`] for export.
pub fn encode_pretty(state: &AppState) -> Result<String, CoreError> {
    serde_json::to_string_pretty(&EnvelopeRef {
        version: CURRENT_VERSION,
        state,
    })
    .map_err(|e| CoreError::Serialization(format!("Failed to serialize record: {e}")))
}

/// Parse a stored value back into a record.
///
/// Accepts the versioned envelope, and also a bare record object without
/// an envelope (how records were stored before versioning).
pub fn decode(text: &str) -> Result<AppState, CoreError> {
    let value: Value = serde_json::from_str(text)?;
    let Some(object) = value.as_object() else {
        return Err(CoreError::Deserialization(
            "Stored record is not a JSON object".into(),
        ));
    };

    let state = if object.contains_key(VERSION_FIELD) {
        let envelope: Envelope = serde_json::from_value(value)?;
        if envelope.version == 0 || envelope.version > CURRENT_VERSION {
            return Err(CoreError::UnsupportedVersion(envelope.version));
        }
        if !envelope.state.is_object() {
            return Err(CoreError::Deserialization(
                "Envelope state is not a JSON object".into(),
            ));
        }
        envelope.state
    } else {
        value
    };

    serde_json::from_value(state)
        .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize record: {e}")))
}
