//! Wire types for the Vault HTTP API and the normalized result shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Success body of an AppRole login.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    /// Authentication payload
    pub auth: AuthData,
}

/// Token and lease details issued by a successful login.
#[derive(Debug, Deserialize)]
pub struct AuthData {
    /// Client token for subsequent requests
    pub client_token: String,
    /// Token lease duration in seconds
    #[serde(default)]
    pub lease_duration: u64,
    /// Whether the token lease is renewable
    #[serde(default)]
    pub renewable: bool,
    /// Policies attached to the token
    #[serde(default)]
    pub policies: Vec<String>,
}

/// Body of a successful secret read.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadResponse {
    /// Request identifier assigned by the server
    #[serde(default)]
    pub request_id: String,
    /// Lease ID, empty for non-leased secrets
    #[serde(default)]
    pub lease_id: String,
    /// Lease duration in seconds
    #[serde(default)]
    pub lease_duration: u64,
    /// Whether the lease is renewable
    #[serde(default)]
    pub renewable: bool,
    /// The stored key/value mapping
    pub data: HashMap<String, Value>,
}

/// Error body returned by the Vault API.
#[derive(Debug, Deserialize)]
pub struct ApiError {
    /// Server-reported error messages
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Outcome of a secret fetch, with failure folded into `error`.
///
/// Exactly one of `data` and `error` is populated. Serializes with the
/// keys `Data` and `Error`, both always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretResult {
    /// The stored mapping, when the read succeeded
    #[serde(rename = "Data")]
    pub data: Option<HashMap<String, Value>>,
    /// Failure description, when it did not
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl SecretResult {
    /// A successful result carrying the stored mapping.
    #[must_use]
    pub const fn data(data: HashMap<String, Value>) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// A failed result carrying a description.
    #[must_use]
    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(msg.into()),
        }
    }

    /// Check whether the fetch failed.
    #[must_use]
    pub const fn is_err(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_response_deserializes() {
        let body = json!({
            "request_id": "3a5f2c1e",
            "lease_id": "",
            "lease_duration": 2_764_800,
            "renewable": false,
            "data": {"user": "a", "pass": "b"}
        });

        let response: ReadResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.lease_duration, 2_764_800);
        assert_eq!(response.data["user"], json!("a"));
        assert_eq!(response.data["pass"], json!("b"));
    }

    #[test]
    fn test_read_response_tolerates_missing_lease_fields() {
        let body = json!({"data": {"key": "value"}});
        let response: ReadResponse = serde_json::from_value(body).unwrap();
        assert!(response.lease_id.is_empty());
        assert!(!response.renewable);
    }

    #[test]
    fn test_api_error_deserializes() {
        let body = json!({"errors": ["Vault is sealed"]});
        let err: ApiError = serde_json::from_value(body).unwrap();
        assert_eq!(err.errors, vec!["Vault is sealed"]);
    }

    #[test]
    fn test_secret_result_serializes_both_keys() {
        let result = SecretResult::error("No secrets stored in mentioned path");
        let value = serde_json::to_value(&result).unwrap();

        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object["Data"].is_null());
        assert_eq!(object["Error"], json!("No secrets stored in mentioned path"));
    }

    #[test]
    fn test_secret_result_data_has_null_error() {
        let mut mapping = HashMap::new();
        mapping.insert("user".to_string(), json!("a"));

        let result = SecretResult::data(mapping);
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["Data"]["user"], json!("a"));
        assert!(value["Error"].is_null());
        assert!(!result.is_err());
    }
}
