use std::fmt;

/// Errors surfaced by the preference store and recency lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The durable store rejected a read or write
    Persistence(String),

    /// Caller asked for a preference name outside the recognized set
    InvalidPreference(String),

    /// A record failed validation before it reached the store
    InvalidRecord(String),
}

impl StoreError {
    pub fn persistence(context: &str, err: impl fmt::Display) -> Self {
        StoreError::Persistence(format!("{}: {}", context, err))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Persistence(msg) => write!(f, "Persistence error: {}", msg),
            StoreError::InvalidPreference(name) => write!(f, "Invalid preference: {}", name),
            StoreError::InvalidRecord(msg) => write!(f, "Invalid record: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<anyhow::Error> for StoreError {
    fn from(err: anyhow::Error) -> Self {
        // {:#} keeps the context chain on one line
        StoreError::Persistence(format!("{:#}", err))
    }
}
