//! Authenticated session: credential decode, login, and normalized reads.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::{debug, instrument};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::client::VaultClient;
use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};
use crate::provider::SecretStore;
use crate::secrets::SecretResult;

/// An AppRole credential pair in base64-encoded form.
#[derive(Clone)]
pub struct EncodedCredentials {
    /// Base64-encoded role ID
    pub role_id: String,
    /// Base64-encoded secret ID
    pub secret_id: String,
}

impl EncodedCredentials {
    /// Wrap a base64-encoded role ID / secret ID pair.
    #[must_use]
    pub fn new(role_id: impl Into<String>, secret_id: impl Into<String>) -> Self {
        Self {
            role_id: role_id.into(),
            secret_id: secret_id.into(),
        }
    }

    fn decode(&self) -> VaultResult<PlainCredentials> {
        Ok(PlainCredentials {
            role_id: decode_field("role_id", &self.role_id)?,
            secret_id: decode_field("secret_id", &self.secret_id)?,
        })
    }
}

impl std::fmt::Debug for EncodedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedCredentials")
            .field("role_id", &"[REDACTED]")
            .field("secret_id", &"[REDACTED]")
            .finish()
    }
}

/// Decoded credential pair, wiped from memory on drop. Lives only for the
/// duration of the login exchange.
#[derive(Zeroize, ZeroizeOnDrop)]
struct PlainCredentials {
    role_id: String,
    secret_id: String,
}

fn decode_field(name: &str, value: &str) -> VaultResult<String> {
    let bytes = STANDARD
        .decode(value)
        .map_err(|e| VaultError::decode(format!("{name} is not valid base64: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| VaultError::decode(format!("{name} is not valid UTF-8: {e}")))
}

/// An authenticated Vault session.
///
/// Construction performs the AppRole login, so a value of this type is
/// always authenticated; there is no re-authentication or refresh.
/// [`get_secret`](Self::get_secret) takes `&self` and the token is never
/// rewritten after login, so one session may be shared across tasks.
pub struct VaultSession<S = VaultClient> {
    store: S,
}

impl VaultSession<VaultClient> {
    /// Connect to `https://{host}:{port}` and authenticate.
    ///
    /// # Errors
    ///
    /// `Decode` when a credential is not valid base64,
    /// `AuthenticationFailed` when the login exchange is rejected or
    /// unreachable, `InvalidConfig` or `Http` when the client cannot be
    /// built.
    pub async fn connect(
        config: &VaultConfig,
        credentials: &EncodedCredentials,
    ) -> VaultResult<Self> {
        let store = VaultClient::new(config)?;
        Self::login(store, credentials).await
    }
}

impl<S: SecretStore> VaultSession<S> {
    /// Authenticate against an existing store.
    ///
    /// Credentials are decoded before the store is contacted, so malformed
    /// base64 fails without a network call. Decode and login failures both
    /// propagate to the caller.
    ///
    /// # Errors
    ///
    /// `Decode` when a credential is not valid base64 or does not decode
    /// to text, otherwise whatever the store's login exchange returns.
    pub async fn login(store: S, credentials: &EncodedCredentials) -> VaultResult<Self> {
        let plain = credentials.decode()?;
        store.authenticate(&plain.role_id, &plain.secret_id).await?;
        Ok(Self { store })
    }

    /// Fetch the secret stored at `path`.
    ///
    /// Never fails to the caller: every outcome is folded into the
    /// returned [`SecretResult`], with a sealed server distinguished from
    /// other faults.
    #[instrument(skip(self))]
    pub async fn get_secret(&self, path: &str) -> SecretResult {
        match self.store.read(path).await {
            Ok(Some(secret)) => SecretResult::data(secret.data),
            Ok(None) => SecretResult::error("No secrets stored in mentioned path"),
            Err(VaultError::Sealed(msg)) => {
                SecretResult::error(format!("Vault is sealed. Got error: {msg}"))
            }
            Err(err) => {
                debug!(error = %err, "Secret read failed");
                SecretResult::error(format!(
                    "Unable to fetch the data. Got error : {}",
                    err.message()
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::ReadResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn encode(value: &str) -> String {
        STANDARD.encode(value)
    }

    fn read_response(data: HashMap<String, serde_json::Value>) -> ReadResponse {
        ReadResponse {
            request_id: String::new(),
            lease_id: String::new(),
            lease_duration: 0,
            renewable: false,
            data,
        }
    }

    /// In-memory store that records the login exchange and serves one
    /// canned read outcome. The record is shared so it stays inspectable
    /// after the store moves into a session.
    #[derive(Default)]
    struct MockStore {
        login: Arc<Mutex<Option<(String, String)>>>,
        outcome: Mutex<Option<VaultResult<Option<ReadResponse>>>>,
    }

    impl MockStore {
        fn with_outcome(outcome: VaultResult<Option<ReadResponse>>) -> Self {
            Self {
                login: Arc::default(),
                outcome: Mutex::new(Some(outcome)),
            }
        }
    }

    #[async_trait]
    impl SecretStore for MockStore {
        async fn authenticate(&self, role_id: &str, secret_id: &str) -> VaultResult<()> {
            *self.login.lock().unwrap() = Some((role_id.to_string(), secret_id.to_string()));
            Ok(())
        }

        async fn read(&self, _path: &str) -> VaultResult<Option<ReadResponse>> {
            self.outcome.lock().unwrap().take().unwrap_or(Ok(None))
        }
    }

    /// Store whose login always fails.
    struct RejectingStore;

    #[async_trait]
    impl SecretStore for RejectingStore {
        async fn authenticate(&self, _role_id: &str, _secret_id: &str) -> VaultResult<()> {
            Err(VaultError::auth_failed("invalid role or secret ID"))
        }

        async fn read(&self, _path: &str) -> VaultResult<Option<ReadResponse>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_login_decodes_credentials() {
        let credentials = EncodedCredentials::new(encode("my-role"), encode("my-secret"));
        let store = MockStore::default();
        let seen = Arc::clone(&store.login);

        VaultSession::login(store, &credentials).await.unwrap();
        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen, Some(("my-role".to_string(), "my-secret".to_string())));
    }

    #[tokio::test]
    async fn test_malformed_base64_fails_before_login() {
        let credentials = EncodedCredentials::new("not base64 !!", encode("my-secret"));
        let store = MockStore::default();
        let seen = Arc::clone(&store.login);

        let err = VaultSession::login(store, &credentials).await.err().unwrap();
        assert!(matches!(err, VaultError::Decode(_)));
        assert!(seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejected_login_propagates() {
        let credentials = EncodedCredentials::new(encode("my-role"), encode("my-secret"));

        let err = VaultSession::login(RejectingStore, &credentials)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, VaultError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn test_get_secret_empty_path() {
        let session = session_with(Ok(None)).await;

        let result = session.get_secret("secret/missing").await;
        assert_eq!(result.data, None);
        assert_eq!(
            result.error.as_deref(),
            Some("No secrets stored in mentioned path")
        );
    }

    #[tokio::test]
    async fn test_get_secret_returns_mapping() {
        let mut data = HashMap::new();
        data.insert("user".to_string(), json!("a"));
        data.insert("pass".to_string(), json!("b"));

        let session = session_with(Ok(Some(read_response(data.clone())))).await;

        let result = session.get_secret("secret/app").await;
        assert_eq!(result.data, Some(data));
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn test_get_secret_sealed() {
        let session = session_with(Err(VaultError::sealed("Vault is sealed"))).await;

        let result = session.get_secret("secret/app").await;
        assert_eq!(result.data, None);
        assert_eq!(
            result.error.as_deref(),
            Some("Vault is sealed. Got error: Vault is sealed")
        );
    }

    #[tokio::test]
    async fn test_get_secret_other_fault() {
        let session = session_with(Err(VaultError::unavailable("connection refused"))).await;

        let result = session.get_secret("secret/app").await;
        assert_eq!(result.data, None);
        assert_eq!(
            result.error.as_deref(),
            Some("Unable to fetch the data. Got error : connection refused")
        );
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let credentials = EncodedCredentials::new(encode("my-role"), encode("my-secret"));
        let output = format!("{credentials:?}");

        assert!(!output.contains(&encode("my-role")));
        assert!(!output.contains(&encode("my-secret")));
        assert!(output.contains("[REDACTED]"));
    }

    async fn session_with(outcome: VaultResult<Option<ReadResponse>>) -> VaultSession<MockStore> {
        let credentials = EncodedCredentials::new(encode("my-role"), encode("my-secret"));
        VaultSession::login(MockStore::with_outcome(outcome), &credentials)
            .await
            .unwrap()
    }
}
