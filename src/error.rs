//! Vault error types using thiserror 2.0.
//!
//! Construction-time faults (decode, authentication) propagate to the
//! caller; read-time faults are folded into a result string by the session
//! layer, which only needs to tell a sealed server apart from everything
//! else. The sealed condition is a dedicated variant, produced where the
//! wire protocol reports it.

use thiserror::Error;

/// Vault-specific errors.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Credential decoding failed
    #[error("Credential decode failed: {0}")]
    Decode(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The server is sealed and refuses operations until unsealed
    #[error("Vault is sealed: {0}")]
    Sealed(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Rate limited
    #[error("Rate limited")]
    RateLimited,

    /// Vault server unavailable
    #[error("Vault unavailable: {0}")]
    Unavailable(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for Vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

impl VaultError {
    /// Check whether the server reported itself sealed.
    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        matches!(self, Self::Sealed(_))
    }

    /// The bare message without the variant prefix.
    ///
    /// Used where the error is folded into a user-facing string and the
    /// surrounding text already names the failure.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Decode(m)
            | Self::AuthenticationFailed(m)
            | Self::Sealed(m)
            | Self::PermissionDenied(m)
            | Self::Unavailable(m)
            | Self::InvalidConfig(m) => m.clone(),
            Self::RateLimited => "rate limited".to_string(),
            Self::Http(e) => e.to_string(),
            Self::Serialization(e) => e.to_string(),
        }
    }

    /// Create a decode error.
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create an authentication failed error.
    #[must_use]
    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailed(msg.into())
    }

    /// Create a sealed error with the server-reported message.
    #[must_use]
    pub fn sealed(msg: impl Into<String>) -> Self {
        Self::Sealed(msg.into())
    }

    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
