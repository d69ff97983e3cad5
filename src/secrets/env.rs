use async_trait::async_trait;

use super::{is_valid_secret_name, SecretError, SecretProvider};

/// Reads secrets from `SECRET_<NAME>` environment variables, for local runs.
///
/// `Final-Secret-Key` is looked up as `SECRET_FINAL_SECRET_KEY` and
/// `SqlConnectionString` as `SECRET_SQLCONNECTIONSTRING`.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self
    }

    pub fn var_name(secret_name: &str) -> String {
        let mapped: String = secret_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        format!("SECRET_{}", mapped)
    }
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn get(&self, name: &str) -> Result<String, SecretError> {
        if !is_valid_secret_name(name) {
            return Err(SecretError::InvalidName(name.to_string()));
        }
        std::env::var(Self::var_name(name)).map_err(|_| SecretError::NotFound(name.to_string()))
    }
}
