use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub secrets: SecretsConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prepended to every `/cars` route, e.g. `/api`. Empty by default.
    pub route_prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecretBackend {
    KeyVault,
    Env,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    pub backend: SecretBackend,
    pub key_vault_url: Option<String>,
    /// Static bearer token for the vault. When absent the managed identity
    /// endpoint (IDENTITY_ENDPOINT / IDENTITY_HEADER) is used.
    #[serde(skip_serializing)]
    pub key_vault_token: Option<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("CARS_API_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("CARS_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("CARS_ROUTE_PREFIX") {
            self.server.route_prefix = normalize_prefix(&v);
        }

        // Secret store overrides
        if let Ok(v) = env::var("SECRET_PROVIDER") {
            self.secrets.backend = match v.trim().to_ascii_lowercase().as_str() {
                "env" => SecretBackend::Env,
                "keyvault" | "key_vault" | "azure" => SecretBackend::KeyVault,
                _ => self.secrets.backend,
            };
        }
        if let Ok(v) = env::var("KEY_VAULT_URL") {
            self.secrets.key_vault_url = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("KEY_VAULT_TOKEN") {
            self.secrets.key_vault_token = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("KEY_VAULT_TIMEOUT_SECS") {
            self.secrets.request_timeout_secs = v.parse().unwrap_or(self.secrets.request_timeout_secs);
        }

        // Database overrides
        if let Ok(v) = env::var("STORAGE_BACKEND") {
            self.database.backend = match v.trim().to_ascii_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "postgres" | "pg" => StorageBackend::Postgres,
                _ => self.database.backend,
            };
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                route_prefix: String::new(),
            },
            secrets: SecretsConfig {
                backend: SecretBackend::Env,
                key_vault_url: None,
                key_vault_token: None,
                request_timeout_secs: 10,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                connection_timeout: 30,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig { enable_cors: true },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                route_prefix: String::new(),
            },
            secrets: SecretsConfig {
                backend: SecretBackend::KeyVault,
                key_vault_url: None,
                key_vault_token: None,
                request_timeout_secs: 10,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                connection_timeout: 10,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig { enable_cors: true },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                route_prefix: String::new(),
            },
            secrets: SecretsConfig {
                backend: SecretBackend::KeyVault,
                key_vault_url: None,
                key_vault_token: None,
                request_timeout_secs: 5,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                connection_timeout: 5,
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 64 * 1024,
            },
            security: SecurityConfig { enable_cors: false },
        }
    }
}

/// Prefix is either empty or starts with a single `/` and has no trailing one.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.secrets.backend, SecretBackend::Env);
        assert_eq!(config.database.backend, StorageBackend::Postgres);
        assert!(config.api.enable_request_logging);
        assert!(config.server.route_prefix.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.secrets.backend, SecretBackend::KeyVault);
        assert!(!config.security.enable_cors);
        assert_eq!(config.database.connection_timeout, 5);
    }

    #[test]
    fn route_prefix_is_normalized() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix("api"), "/api");
        assert_eq!(normalize_prefix("/api/"), "/api");
        assert_eq!(normalize_prefix(" /v1/api "), "/v1/api");
    }

    #[test]
    fn vault_token_is_not_serialized() {
        let mut config = AppConfig::production();
        config.secrets.key_vault_token = Some("super-secret".to_string());
        let rendered = serde_json::to_string(&config).unwrap();
        assert!(!rendered.contains("super-secret"));
    }
}
