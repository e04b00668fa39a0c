use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::utils::get_env_with_prefix;

/// Main configuration for the Greenroom backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

/// Authentication and authorization settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// The admin organization id. Credentials affiliated with this
    /// organization bypass per-account authorization and receive
    /// unrestricted scope. Injected here so the bypass is auditable and
    /// testable; it is never derived from request input.
    pub admin_organization_id: String,

    /// Header name carrying the opaque API key.
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,

    /// Static secret for HS256 session-token verification.
    /// Mutually exclusive with `jwks_url` in practice; `jwks_url` wins
    /// when both are set.
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// JWKS endpoint for RS256 session-token verification.
    #[serde(default)]
    pub jwks_url: Option<String>,

    /// Expected token issuer.
    #[serde(default)]
    pub jwt_issuer: Option<String>,

    /// Expected token audience.
    #[serde(default)]
    pub jwt_audience: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_organization_id: String::new(),
            api_key_header: default_api_key_header(),
            jwt_secret: None,
            jwks_url: None,
            jwt_issuer: None,
            jwt_audience: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

fn default_api_key_header() -> String {
    "x-api-key".to_string()
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// Builder for Config with environment variable support.
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.config.server.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_admin_organization(mut self, org_id: impl Into<String>) -> Self {
        self.config.auth.admin_organization_id = org_id.into();
        self
    }

    pub fn with_api_key_header(mut self, header: impl Into<String>) -> Self {
        self.config.auth.api_key_header = header.into();
        self
    }

    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.auth.jwt_secret = Some(secret.into());
        self
    }

    pub fn with_jwks_url(mut self, url: impl Into<String>) -> Self {
        self.config.auth.jwks_url = Some(url.into());
        self
    }

    /// Load settings from environment variables.
    ///
    /// Checks `GREENROOM_{KEY}` first, then falls back to `{KEY}`:
    /// `HOST`, `PORT`, `LOG_LEVEL`, `LOG_JSON`, `ADMIN_ORGANIZATION_ID`,
    /// `API_KEY_HEADER`, `JWT_SECRET`, `JWKS_URL`, `JWT_ISSUER`,
    /// `JWT_AUDIENCE`.
    pub fn from_env(mut self) -> Self {
        if let Some(host) = get_env_with_prefix("HOST") {
            self.config.server.host = host;
        }
        if let Some(port) = get_env_with_prefix("PORT").and_then(|p| p.parse().ok()) {
            self.config.server.port = port;
        }
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON").and_then(|v| v.parse().ok()) {
            self.config.logging.json = json;
        }
        if let Some(org) = get_env_with_prefix("ADMIN_ORGANIZATION_ID") {
            self.config.auth.admin_organization_id = org;
        }
        if let Some(header) = get_env_with_prefix("API_KEY_HEADER") {
            self.config.auth.api_key_header = header;
        }
        if let Some(secret) = get_env_with_prefix("JWT_SECRET") {
            self.config.auth.jwt_secret = Some(secret);
        }
        if let Some(url) = get_env_with_prefix("JWKS_URL") {
            self.config.auth.jwks_url = Some(url);
        }
        if let Some(issuer) = get_env_with_prefix("JWT_ISSUER") {
            self.config.auth.jwt_issuer = Some(issuer);
        }
        if let Some(audience) = get_env_with_prefix("JWT_AUDIENCE") {
            self.config.auth.jwt_audience = Some(audience);
        }
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
