//! Greenroom - multi-tenant backend for the Greenroom creator platform
//!
//! Endpoints are thin request handlers over trait-abstracted stores; the
//! heart of the crate is the access-control resolution engine that every
//! handler runs first:
//!
//! 1. **Credential resolution** - exactly one of an API key or a bearer
//!    session token ([`auth::CredentialResolver`])
//! 2. **Override validation** - caller-supplied account/organization ids,
//!    each authorized against the membership directory
//!    ([`auth::AuthContextBuilder`])
//! 3. **Scope construction** - the set of account ids the request may
//!    touch ([`scope::ScopeBuilder`])
//! 4. **Ownership gate** - single-resource mutations check the resource's
//!    owner against the scope ([`scope::gate_resource`])
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use greenroom::{App, ConfigBuilder, app::Stores};
//!
//! #[tokio::main]
//! async fn main() {
//!     greenroom::init_tracing();
//!
//!     let config = ConfigBuilder::new()
//!         .from_env()
//!         .build();
//!
//!     let stores = todo!("wire your database-backed stores");
//!     App::new(config, stores).serve().await.unwrap();
//! }
//! ```

pub mod app;
pub mod artists;
pub mod auth;
pub mod chats;
mod config;
mod error;
pub mod health;
mod http;
pub mod organizations;
pub mod pulses;
pub mod scope;
pub mod templates;
pub mod testing;
mod utils;

// Re-exports for the public API
pub use app::{App, AppState};
pub use config::{AuthConfig, Config, ConfigBuilder, LoggingConfig, ServerConfig};
pub use error::{GreenroomError, Result};
pub use http::ApiResponse;
pub use scope::{AccessScope, ScopeBuilder};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults.
///
/// Call early in `main()`, before creating the App.
///
/// # Environment Variables
///
/// - `RUST_LOG`: log level filter (e.g. "info", "greenroom=debug")
/// - `GREENROOM_LOG_JSON`: set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("GREENROOM_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
