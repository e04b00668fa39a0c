//! Artist resources.

use crate::app::AppState;
use crate::auth::OverrideParams;
use crate::error::Result;
use crate::http::ApiResponse;
use crate::scope::gate_resource;
use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An artist profile managed by an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    /// Owning account.
    pub account_id: String,
    pub name: String,
    pub genre: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Artist storage operations.
#[async_trait]
pub trait ArtistStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Artist>>;

    /// List artists owned by any of `account_ids`; all artists when
    /// `None`, none when the slice is empty.
    async fn list(&self, account_ids: Option<&[String]>) -> Result<Vec<Artist>>;

    async fn create(&self, artist: &Artist) -> Result<()>;
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtistListQuery {
    pub account_id: Option<String>,
}

/// Body for `POST /artists`.
#[derive(Debug, Deserialize)]
pub struct CreateArtistRequest {
    pub name: String,
    pub genre: Option<String>,
    #[serde(flatten)]
    pub overrides: OverrideParams,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/artists", get(list_artists).post(create_artist))
        .route("/artists/{id}", get(get_artist))
}

async fn list_artists(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ArtistListQuery>,
) -> Result<ApiResponse<Vec<Artist>>> {
    let ctx = state.auth.build(&headers, OverrideParams::default()).await?;
    let scope = state.scopes.build(&ctx, query.account_id.as_deref()).await?;
    let artists = state.artists.list(scope.account_ids()).await?;
    Ok(ApiResponse::ok(artists))
}

/// Create an artist under the caller's effective account. Override
/// fields in the body go through the usual validation before they decide
/// ownership of the new record.
async fn create_artist(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateArtistRequest>,
) -> Result<ApiResponse<Artist>> {
    let ctx = state.auth.build(&headers, body.overrides).await?;

    let artist = Artist {
        id: uuid::Uuid::new_v4().to_string(),
        account_id: ctx.account_id,
        name: body.name,
        genre: body.genre,
        created_at: Utc::now(),
    };
    state.artists.create(&artist).await?;
    Ok(ApiResponse::ok(artist))
}

async fn get_artist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<ApiResponse<Artist>> {
    let ctx = state.auth.build(&headers, OverrideParams::default()).await?;
    let scope = state.scopes.build(&ctx, None).await?;

    let artist = state.artists.find_by_id(&id).await?;
    let artist = gate_resource(artist, |a| Some(a.account_id.as_str()), &scope, "artist", &id)?;
    Ok(ApiResponse::ok(artist))
}
