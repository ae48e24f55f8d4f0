use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid envelope: {reason}")]
    InvalidEnvelope { reason: String },

    #[error("Invalid event kind: {kind}")]
    InvalidEventKind { kind: String },

    #[error("Malformed update for mobile {mobile_id}: {reason}")]
    MalformedUpdate { mobile_id: String, reason: String },

    #[error("Invalid settings: {reason}")]
    InvalidSettings { reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl DomainError {
    pub fn invalid_envelope(reason: impl Into<String>) -> Self {
        DomainError::InvalidEnvelope {
            reason: reason.into(),
        }
    }

    pub fn malformed(mobile_id: impl ToString, reason: impl Into<String>) -> Self {
        DomainError::MalformedUpdate {
            mobile_id: mobile_id.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Event channel error: {0}")]
    Channel(String),

    #[error("Settings API error: {0}")]
    SettingsApi(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
