//! Generic secret-store trait.

use async_trait::async_trait;

use crate::error::VaultResult;
use crate::secrets::ReadResponse;

/// Storage backend capable of AppRole authentication and path reads.
///
/// [`VaultClient`](crate::VaultClient) is the HTTP implementation; tests
/// substitute in-memory stores to exercise result normalization without a
/// server.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Exchange an AppRole credential pair for a session token.
    async fn authenticate(&self, role_id: &str, secret_id: &str) -> VaultResult<()>;

    /// Read the secret stored at `path`.
    ///
    /// `Ok(None)` means the path has nothing stored.
    async fn read(&self, path: &str) -> VaultResult<Option<ReadResponse>>;
}
