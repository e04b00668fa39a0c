//! Application state and router assembly.

use crate::artists::{self, ArtistStore};
use crate::auth::{
    ApiKeyStore, AuthContextBuilder, CredentialResolver, OverrideValidator, TokenVerifier,
};
use crate::chats::{self, ChatStore};
use crate::config::Config;
use crate::error::Result;
use crate::health;
use crate::organizations::MembershipStore;
use crate::pulses::{self, PulseStore};
use crate::scope::ScopeBuilder;
use crate::templates::{self, TemplateStore};
use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// The store implementations the application is wired with.
///
/// Everything behind these traits is an external collaborator; the core
/// never assumes a particular database.
pub struct Stores {
    pub api_keys: Arc<dyn ApiKeyStore>,
    pub tokens: Arc<dyn TokenVerifier>,
    pub memberships: Arc<dyn MembershipStore>,
    pub chats: Arc<dyn ChatStore>,
    pub artists: Arc<dyn ArtistStore>,
    pub pulses: Arc<dyn PulseStore>,
    pub templates: Arc<dyn TemplateStore>,
}

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthContextBuilder,
    pub scopes: ScopeBuilder,
    pub chats: Arc<dyn ChatStore>,
    pub artists: Arc<dyn ArtistStore>,
    pub pulses: Arc<dyn PulseStore>,
    pub templates: Arc<dyn TemplateStore>,
}

impl AppState {
    pub fn new(config: &Config, stores: Stores) -> Self {
        let overrides = OverrideValidator::new(
            stores.memberships.clone(),
            config.auth.admin_organization_id.clone(),
        );
        let resolver = CredentialResolver::new(
            stores.api_keys,
            stores.tokens,
            config.auth.api_key_header.clone(),
        );
        Self {
            auth: AuthContextBuilder::new(resolver, overrides.clone()),
            scopes: ScopeBuilder::new(stores.memberships, overrides),
            chats: stores.chats,
            artists: stores.artists,
            pulses: stores.pulses,
            templates: stores.templates,
        }
    }
}

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(chats::routes())
        .merge(artists::routes())
        .merge(pulses::routes())
        .merge(templates::routes())
        .route("/health", get(health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Main application structure.
pub struct App {
    config: Config,
    state: AppState,
}

impl App {
    pub fn new(config: Config, stores: Stores) -> Self {
        let state = AppState::new(&config, stores);
        Self { config, state }
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Serve until SIGINT/SIGTERM.
    pub async fn serve(self) -> Result<()> {
        let addr = self
            .config
            .server
            .addr()
            .map_err(|e| crate::error::GreenroomError::internal(format!("Invalid address: {e}")))?;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::GreenroomError::internal(format!("Bind failed: {e}")))?;

        tracing::info!(%addr, "greenroom listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| crate::error::GreenroomError::internal(format!("Server error: {e}")))
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
