//! HashiCorp Vault AppRole client.
//!
//! Authenticates with a base64-encoded AppRole credential pair and retrieves
//! secrets from a path, folding success and failure into a uniform
//! [`SecretResult`] shape.

pub mod client;
pub mod config;
pub mod error;
pub mod provider;
pub mod secrets;
pub mod session;

pub use client::VaultClient;
pub use config::VaultConfig;
pub use error::{VaultError, VaultResult};
pub use provider::SecretStore;
pub use secrets::{ReadResponse, SecretResult};
pub use session::{EncodedCredentials, VaultSession};
