use crate::errors::CoreError;

/// Durable string-keyed storage for the serialized record.
///
/// Any persistence (a directory of files, an embedded database, browser
/// storage behind a WASM binding) plugs in here; the rest of the crate only
/// sees serialized strings.
pub trait KeyValueStore {
    /// Human-readable name of this backend (for logs).
    fn name(&self) -> &str;

    /// Read the value stored under `key`. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Delete `key`. Returns whether something was removed.
    fn remove(&mut self, key: &str) -> Result<bool, CoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<bool, CoreError> {
        (**self).remove(key)
    }
}
