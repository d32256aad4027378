//! Vault connection configuration.

use std::time::Duration;

use crate::error::{VaultError, VaultResult};

/// Connection parameters for a Vault server.
///
/// Immutable after construction; build with [`VaultConfig::new`] and the
/// `with_*` methods.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Vault server hostname
    pub host: String,
    /// Vault server port
    pub port: u16,
    /// Verify the server TLS certificate
    pub tls_verify: bool,
    /// Request timeout
    pub timeout: Duration,
}

impl VaultConfig {
    /// Default Vault API port.
    pub const DEFAULT_PORT: u16 = 8200;

    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

    /// Create a configuration for the given host with the default port,
    /// timeout, and certificate verification enabled.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            tls_verify: true,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Build a configuration from `VAULT_HOST`, `VAULT_PORT`,
    /// `VAULT_SKIP_VERIFY`, and `VAULT_CLIENT_TIMEOUT` (seconds).
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidConfig` when `VAULT_HOST` is unset or a
    /// numeric variable does not parse.
    pub fn from_env() -> VaultResult<Self> {
        let host = std::env::var("VAULT_HOST")
            .map_err(|_| VaultError::InvalidConfig("VAULT_HOST is not set".to_string()))?;
        let mut config = Self::new(host);
        config.validate()?;

        if let Ok(port) = std::env::var("VAULT_PORT") {
            config.port = port
                .parse()
                .map_err(|_| VaultError::InvalidConfig(format!("invalid VAULT_PORT: {port}")))?;
        }
        if let Ok(skip) = std::env::var("VAULT_SKIP_VERIFY") {
            config.tls_verify = !matches!(skip.as_str(), "1" | "true" | "yes");
        }
        if let Ok(secs) = std::env::var("VAULT_CLIENT_TIMEOUT") {
            let parsed: u64 = secs.parse().map_err(|_| {
                VaultError::InvalidConfig(format!("invalid VAULT_CLIENT_TIMEOUT: {secs}"))
            })?;
            config.timeout = Duration::from_secs(parsed);
        }

        Ok(config)
    }

    /// Set the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable TLS certificate verification.
    ///
    /// Disabling applies only to the client built from this configuration;
    /// no process-wide state is touched.
    #[must_use]
    pub const fn with_tls_verify(mut self, tls_verify: bool) -> Self {
        self.tls_verify = tls_verify;
        self
    }

    /// Render the base URL for this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("https://{}:{}", self.host, self.port)
    }

    /// Check the configuration for unusable values.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidConfig` when the host is empty.
    pub fn validate(&self) -> VaultResult<()> {
        if self.host.is_empty() {
            return Err(VaultError::InvalidConfig(
                "host must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
