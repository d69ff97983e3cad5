use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{is_valid_secret_name, SecretError, SecretProvider};

const KEY_VAULT_API_VERSION: &str = "7.4";
const KEY_VAULT_RESOURCE: &str = "https://vault.azure.net";
const MANAGED_IDENTITY_API_VERSION: &str = "2019-08-01";

/// How the provider obtains a bearer token for the vault.
#[derive(Debug, Clone)]
pub enum KeyVaultCredential {
    /// Pre-issued access token.
    StaticToken(String),
    /// App Service / Functions managed identity endpoint. A token is
    /// requested for every secret lookup.
    ManagedIdentity { endpoint: Url, header: String },
}

impl KeyVaultCredential {
    /// Use `static_token` when given, otherwise the managed identity
    /// advertised through `IDENTITY_ENDPOINT` / `IDENTITY_HEADER`.
    pub fn from_env(static_token: Option<String>) -> Result<Self, SecretError> {
        if let Some(token) = static_token.filter(|t| !t.trim().is_empty()) {
            return Ok(Self::StaticToken(token));
        }

        let endpoint = std::env::var("IDENTITY_ENDPOINT").map_err(|_| {
            SecretError::Unavailable(
                "no KEY_VAULT_TOKEN and no managed identity (IDENTITY_ENDPOINT) configured"
                    .to_string(),
            )
        })?;
        let header = std::env::var("IDENTITY_HEADER")
            .map_err(|_| SecretError::Unavailable("IDENTITY_HEADER is not set".to_string()))?;
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| SecretError::Unavailable(format!("invalid IDENTITY_ENDPOINT: {}", e)))?;

        Ok(Self::ManagedIdentity { endpoint, header })
    }
}

#[derive(Debug, Deserialize)]
struct SecretBundle {
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Azure Key Vault client speaking the secrets REST API.
#[derive(Debug, Clone)]
pub struct KeyVaultSecretProvider {
    client: reqwest::Client,
    vault_url: Url,
    credential: KeyVaultCredential,
}

impl KeyVaultSecretProvider {
    pub fn new(
        vault_url: &str,
        credential: KeyVaultCredential,
        timeout: Duration,
    ) -> Result<Self, SecretError> {
        let mut vault_url = Url::parse(vault_url)
            .map_err(|e| SecretError::Unavailable(format!("invalid vault URL: {}", e)))?;
        // `Url::join` drops the last path segment unless it ends with '/'
        if !vault_url.path().ends_with('/') {
            let path = format!("{}/", vault_url.path());
            vault_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SecretError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            vault_url,
            credential,
        })
    }

    fn secret_url(&self, name: &str) -> Result<Url, SecretError> {
        let mut url = self
            .vault_url
            .join(&format!("secrets/{}", name))
            .map_err(|e| SecretError::InvalidName(format!("{}: {}", name, e)))?;
        url.query_pairs_mut()
            .append_pair("api-version", KEY_VAULT_API_VERSION);
        Ok(url)
    }

    async fn access_token(&self) -> Result<String, SecretError> {
        match &self.credential {
            KeyVaultCredential::StaticToken(token) => Ok(token.clone()),
            KeyVaultCredential::ManagedIdentity { endpoint, header } => {
                let mut url = endpoint.clone();
                url.query_pairs_mut()
                    .append_pair("resource", KEY_VAULT_RESOURCE)
                    .append_pair("api-version", MANAGED_IDENTITY_API_VERSION);

                let response = self
                    .client
                    .get(url)
                    .header("X-IDENTITY-HEADER", header)
                    .send()
                    .await
                    .map_err(|e| SecretError::Unavailable(format!("identity endpoint: {}", e)))?;

                if !response.status().is_success() {
                    return Err(SecretError::Unavailable(format!(
                        "identity endpoint returned {}",
                        response.status()
                    )));
                }

                let token: TokenResponse = response
                    .json()
                    .await
                    .map_err(|e| SecretError::Malformed(format!("token response: {}", e)))?;
                Ok(token.access_token)
            }
        }
    }
}

#[async_trait]
impl SecretProvider for KeyVaultSecretProvider {
    async fn get(&self, name: &str) -> Result<String, SecretError> {
        if !is_valid_secret_name(name) {
            return Err(SecretError::InvalidName(name.to_string()));
        }

        let url = self.secret_url(name)?;
        let token = self.access_token().await?;
        debug!(secret = name, "Fetching secret from Key Vault");

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SecretError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(SecretError::NotFound(name.to_string())),
            status if !status.is_success() => {
                return Err(SecretError::Unavailable(format!(
                    "vault returned {} for secret {}",
                    status, name
                )))
            }
            _ => {}
        }

        let bundle: SecretBundle = response
            .json()
            .await
            .map_err(|e| SecretError::Malformed(e.to_string()))?;

        bundle
            .value
            .ok_or_else(|| SecretError::Malformed(format!("secret {} has no value", name)))
    }
}
