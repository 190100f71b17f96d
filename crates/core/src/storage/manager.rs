use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::state::AppState;

use super::format;
use super::traits::KeyValueStore;

/// Load/save of the record against any [`KeyValueStore`].
///
/// `load` and `save` never fail: a missing or unreadable record degrades
/// to the default, and a failed write is logged and dropped. The `try_`
/// variants expose the underlying errors.
pub struct StorageManager;

impl StorageManager {
    /// Read the record under `key`, or return `default` unmodified if it is
    /// absent, unreadable, or fails to decode.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, key: &str, default: AppState) -> AppState {
        match Self::try_load(store, key) {
            Ok(state) => {
                debug!(store = store.name(), key, "Record loaded");
                state
            }
            Err(CoreError::KeyNotFound(_)) => {
                debug!(store = store.name(), key, "No stored record, using default");
                default
            }
            Err(e) => {
                warn!(store = store.name(), key, error = %e, "Stored record unusable, using default");
                default
            }
        }
    }

    /// Read and decode the record under `key`.
    ///
    /// Flow: store → envelope JSON → version check → AppState
    pub fn try_load<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<AppState, CoreError> {
        let text = store
            .get(key)?
            .ok_or_else(|| CoreError::KeyNotFound(key.to_string()))?;
        format::decode(&text)
    }

    /// Best-effort write of the full record. Failures are logged and swallowed.
    pub fn save<S: KeyValueStore + ?Sized>(store: &mut S, key: &str, state: &AppState) {
        if let Err(e) = Self::try_save(store, key, state) {
            warn!(store = store.name(), key, error = %e, "Failed to persist record");
        }
    }

    /// Encode and write the full record.
    pub fn try_save<S: KeyValueStore + ?Sized>(
        store: &mut S,
        key: &str,
        state: &AppState,
    ) -> Result<(), CoreError> {
        let text = format::encode(state)?;
        store.set(key, &text)
    }
}
