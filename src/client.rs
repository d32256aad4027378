//! Vault HTTP client speaking the AppRole login and KV read endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::config::VaultConfig;
use crate::error::{VaultError, VaultResult};
use crate::provider::SecretStore;
use crate::secrets::{ApiError, AuthResponse, ReadResponse};

/// HTTP client for a single Vault server.
///
/// Certificate verification is scoped to the owned HTTP client; disabling
/// it affects no other part of the process. The session token is written
/// once by [`authenticate`](SecretStore::authenticate) and only read
/// afterwards, so a shared reference can issue reads concurrently.
pub struct VaultClient {
    base_url: String,
    http: Client,
    token: RwLock<Option<SecretString>>,
}

impl VaultClient {
    /// Create a client for the configured host at `https://{host}:{port}`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an unusable configuration and `Http`
    /// when the underlying client cannot be built.
    pub fn new(config: &VaultConfig) -> VaultResult<Self> {
        config.validate()?;
        Self::with_base_url(config.base_url(), config.timeout, config.tls_verify)
    }

    /// Create a client against a full base URL such as
    /// `https://vault.example.com:8200`.
    ///
    /// # Errors
    ///
    /// Returns `Http` when the underlying client cannot be built.
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout: Duration,
        tls_verify: bool,
    ) -> VaultResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .use_rustls_tls()
            .danger_accept_invalid_certs(!tls_verify)
            .build()
            .map_err(VaultError::Http)?;

        Ok(Self {
            base_url: base_url.into(),
            http,
            token: RwLock::new(None),
        })
    }
}

#[async_trait]
impl SecretStore for VaultClient {
    #[instrument(skip(self, role_id, secret_id))]
    async fn authenticate(&self, role_id: &str, secret_id: &str) -> VaultResult<()> {
        let url = format!("{}/v1/auth/approle/login", self.base_url);
        let body = serde_json::json!({
            "role_id": role_id,
            "secret_id": secret_id,
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| VaultError::auth_failed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VaultError::auth_failed(format!("Status {status}: {text}")));
        }

        let auth: AuthResponse = response.json().await?;
        info!(
            lease_duration = auth.auth.lease_duration,
            "Authenticated with Vault"
        );

        *self.token.write().await = Some(SecretString::from(auth.auth.client_token));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn read(&self, path: &str) -> VaultResult<Option<ReadResponse>> {
        let token = {
            let guard = self.token.read().await;
            guard
                .as_ref()
                .map(|t| t.expose_secret().to_string())
                .ok_or_else(|| VaultError::auth_failed("not authenticated"))?
        };

        debug!(path, "Reading secret");
        let url = format!("{}/v1/{}", self.base_url, path.trim_start_matches('/'));
        let response = self
            .http
            .get(&url)
            .header("X-Vault-Token", token)
            .send()
            .await
            .map_err(|e| VaultError::unavailable(e.to_string()))?;

        let status = response.status();
        match status.as_u16() {
            404 => return Ok(None),
            403 => {
                let text = response.text().await.unwrap_or_default();
                return Err(VaultError::PermissionDenied(api_message(
                    &text,
                    "permission denied",
                )));
            }
            429 => return Err(VaultError::RateLimited),
            // A sealed server answers 503 with the reason in the errors body.
            503 => {
                let text = response.text().await.unwrap_or_default();
                return Err(VaultError::sealed(api_message(&text, "Vault is sealed")));
            }
            _ if !status.is_success() => {
                let text = response.text().await.unwrap_or_default();
                return Err(VaultError::unavailable(format!("Status {status}: {text}")));
            }
            _ => {}
        }

        let secret: ReadResponse = response.json().await?;
        Ok(Some(secret))
    }
}

/// First message from a Vault error body, or `fallback` when absent.
fn api_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .ok()
        .and_then(|e| e.errors.into_iter().next())
        .unwrap_or_else(|| fallback.to_string())
}
