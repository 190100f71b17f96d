use thiserror::Error;

/// Unified error type for the entire habit-ledger-core library.
///
/// Storage and input errors never reach the user: the `HabitLedger` facade
/// degrades them to defaults or no-ops. They are still typed so the lower
/// layers can be tested and logged precisely.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage ─────────────────────────────────────────────────────
    #[error("Storage key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid storage key '{0}': only ASCII letters, digits, '-' and '_' are allowed")]
    InvalidKey(String),

    #[error("Storage quota exceeded: record needs {needed} bytes, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("Unsupported record version: {0}")]
    UnsupportedVersion(u16),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{kind} not found: {id}")]
    EntityNotFound { kind: &'static str, id: String },
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(e: toml::de::Error) -> Self {
        CoreError::InvalidConfig(e.to_string())
    }
}
