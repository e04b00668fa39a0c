//! Pulse resources: scheduled fan-engagement posts.

use crate::app::AppState;
use crate::auth::OverrideParams;
use crate::error::Result;
use crate::http::ApiResponse;
use async_trait::async_trait;
use axum::{
    Router,
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pulse: one scheduled engagement post for an artist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pulse {
    pub id: String,
    /// Owning account.
    pub account_id: String,
    pub artist_id: String,
    pub content: String,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Pulse storage operations.
#[async_trait]
pub trait PulseStore: Send + Sync {
    /// List pulses owned by any of `account_ids` (all when `None`),
    /// optionally narrowed to one artist.
    async fn list(
        &self,
        account_ids: Option<&[String]>,
        artist_id: Option<&str>,
    ) -> Result<Vec<Pulse>>;
}

#[derive(Debug, Default, Deserialize)]
pub struct PulseListQuery {
    pub account_id: Option<String>,
    pub artist_id: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/pulses", get(list_pulses))
}

async fn list_pulses(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PulseListQuery>,
) -> Result<ApiResponse<Vec<Pulse>>> {
    let ctx = state.auth.build(&headers, OverrideParams::default()).await?;
    let scope = state.scopes.build(&ctx, query.account_id.as_deref()).await?;
    let pulses = state
        .pulses
        .list(scope.account_ids(), query.artist_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(pulses))
}
