use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub oauth: OAuthConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Postgres,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StoreBackend::Memory),
            "postgres" | "pg" | "postgresql" => Ok(StoreBackend::Postgres),
            other => Err(format!("unknown store backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub store: StoreBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    /// Overrides the database named in `url`
    pub name: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cors_origins: Vec<String>,
    pub client_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub google: Option<OAuthCredentials>,
    pub github: Option<OAuthCredentials>,
    /// Public base URL of this API, used to build provider callback URLs
    pub callback_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_limit: u64,
    pub max_limit: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (environment, test maps)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Server overrides
        if let Some(v) = lookup("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = lookup("STORE_BACKEND") {
            self.server.store = v.parse().unwrap_or(self.server.store);
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Some(v) = lookup("DATABASE_NAME") {
            self.database.name = Some(v);
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Some(v) = lookup("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Some(v) = lookup("CLIENT_URL") {
            self.security.client_url = v.trim_end_matches('/').to_string();
        }

        // OAuth providers are enabled only when both halves are present
        self.oauth.google = credentials(&lookup, "GOOGLE_CLIENT_ID", "GOOGLE_CLIENT_SECRET")
            .or(self.oauth.google);
        self.oauth.github = credentials(&lookup, "GITHUB_CLIENT_ID", "GITHUB_CLIENT_SECRET")
            .or(self.oauth.github);
        if let Some(v) = lookup("OAUTH_CALLBACK_BASE_URL") {
            self.oauth.callback_base_url = v.trim_end_matches('/').to_string();
        }

        // Pagination overrides
        if let Some(v) = lookup("PAGINATION_DEFAULT_LIMIT") {
            self.pagination.default_limit = v.parse().unwrap_or(self.pagination.default_limit);
        }
        if let Some(v) = lookup("PAGINATION_MAX_LIMIT") {
            self.pagination.max_limit = v.parse().unwrap_or(self.pagination.max_limit);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 5001,
                store: StoreBackend::Memory,
            },
            database: DatabaseConfig {
                url: None,
                name: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: "nexguild-development-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                cors_origins: vec!["*".to_string()],
                client_url: "http://localhost:5173".to_string(),
            },
            oauth: OAuthConfig {
                google: None,
                github: None,
                callback_base_url: "http://localhost:5001".to_string(),
            },
            pagination: PaginationConfig {
                default_limit: 10,
                max_limit: 100,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 5001,
                store: StoreBackend::Postgres,
            },
            database: DatabaseConfig {
                url: None,
                name: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7,
                cors_origins: vec!["https://staging.nexguild.dev".to_string()],
                client_url: "https://staging.nexguild.dev".to_string(),
            },
            oauth: OAuthConfig {
                google: None,
                github: None,
                callback_base_url: "https://api.staging.nexguild.dev".to_string(),
            },
            pagination: PaginationConfig {
                default_limit: 10,
                max_limit: 100,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 5001,
                store: StoreBackend::Postgres,
            },
            database: DatabaseConfig {
                url: None,
                name: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7,
                cors_origins: vec!["https://nexguild.dev".to_string()],
                client_url: "https://nexguild.dev".to_string(),
            },
            oauth: OAuthConfig {
                google: None,
                github: None,
                callback_base_url: "https://api.nexguild.dev".to_string(),
            },
            pagination: PaginationConfig {
                default_limit: 10,
                max_limit: 50,
            },
        }
    }
}

fn credentials(
    lookup: &impl Fn(&str) -> Option<String>,
    id_key: &str,
    secret_key: &str,
) -> Option<OAuthCredentials> {
    match (lookup(id_key), lookup(secret_key)) {
        (Some(client_id), Some(client_secret)) if !client_id.is_empty() && !client_secret.is_empty() => {
            Some(OAuthCredentials { client_id, client_secret })
        }
        _ => None,
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
