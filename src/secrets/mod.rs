pub mod env;
pub mod key_vault;
pub mod memory;

pub use env::EnvSecretProvider;
pub use key_vault::{KeyVaultCredential, KeyVaultSecretProvider};
pub use memory::StaticSecretProvider;

use async_trait::async_trait;
use thiserror::Error;

/// Secret holding the shared API key compared against `x-api-key`.
pub const API_KEY_SECRET: &str = "Final-Secret-Key";

/// Secret holding the Postgres connection string.
pub const CONNECTION_STRING_SECRET: &str = "SqlConnectionString";

/// Errors from a secret store lookup
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Invalid secret name: {0}")]
    InvalidName(String),

    #[error("Secret store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed secret store response: {0}")]
    Malformed(String),
}

/// Fetches named secret values from an external store.
///
/// Every call goes to the backing store; implementations do not cache.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn get(&self, name: &str) -> Result<String, SecretError>;
}

/// Key Vault secret names: 1-127 characters of `[0-9A-Za-z-]`.
pub fn is_valid_secret_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 127
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
