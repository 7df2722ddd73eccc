use thiserror::Error;

/// Unified error type for vertagus operations
#[derive(Error, Debug)]
pub enum VertagusError {
    #[error("Stage '{0}' not found")]
    StageNotFound(String),

    #[error("No manifests found")]
    NoManifests,

    #[error("Manifests {0:?} not found")]
    ManifestSubsetNotFound(Vec<String>),

    #[error("Unknown {kind} rule: '{name}'")]
    RuleNotFound { kind: String, name: String },

    #[error("Invalid rule '{name}': {reason}")]
    InvalidRule { name: String, reason: String },

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in vertagus
pub type Result<T> = std::result::Result<T, VertagusError>;

impl VertagusError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        VertagusError::Config(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        VertagusError::Manifest(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        VertagusError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        VertagusError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        VertagusError::Remote(msg.into())
    }

    pub fn invalid_rule(name: impl Into<String>, reason: impl Into<String>) -> Self {
        VertagusError::InvalidRule {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
