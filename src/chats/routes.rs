use super::types::{Chat, CompactBatchRequest, CompactBatchResponse, UpdateChatRequest};
use crate::app::AppState;
use crate::auth::OverrideParams;
use crate::error::{GreenroomError, Result};
use crate::http::ApiResponse;
use crate::scope::gate_resource;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{get, patch, post},
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ChatListQuery {
    pub account_id: Option<String>,
    pub artist_id: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/chats", get(list_chats))
        .route("/chats/{id}", patch(update_chat))
        .route("/chats/{id}/compact", post(compact_chat))
        .route("/chats/compact", post(compact_chats))
}

async fn list_chats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ChatListQuery>,
) -> Result<ApiResponse<Vec<Chat>>> {
    let ctx = state.auth.build(&headers, OverrideParams::default()).await?;
    let scope = state.scopes.build(&ctx, query.account_id.as_deref()).await?;
    let chats = state
        .chats
        .list(scope.account_ids(), query.artist_id.as_deref())
        .await?;
    Ok(ApiResponse::ok(chats))
}

async fn update_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdateChatRequest>,
) -> Result<ApiResponse<Chat>> {
    let ctx = state.auth.build(&headers, body.overrides).await?;
    let scope = state.scopes.build(&ctx, None).await?;

    let chat = state.chats.find_by_id(&id).await?;
    gate_resource(chat, |c| c.account_id.as_deref(), &scope, "chat", &id)?;

    let updated = state
        .chats
        .update_title(&id, &body.title)
        .await?
        .ok_or_else(|| GreenroomError::not_found(format!("chat {id}")))?;
    Ok(ApiResponse::ok(updated))
}

async fn compact_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<ApiResponse<CompactBatchResponse>> {
    let ctx = state.auth.build(&headers, OverrideParams::default()).await?;
    let scope = state.scopes.build(&ctx, None).await?;

    compact_one(&state, &scope, &id).await?;
    Ok(ApiResponse::ok(CompactBatchResponse {
        compacted: vec![id],
    }))
}

/// Batch compaction. Each id runs the gate-then-mutate pipeline
/// independently and concurrently; one failing id does not abort the
/// others. The batch reports a collective 404 naming the failed ids when
/// at least one id failed.
async fn compact_chats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CompactBatchRequest>,
) -> Result<ApiResponse<CompactBatchResponse>> {
    let ctx = state.auth.build(&headers, body.overrides).await?;
    let scope = state.scopes.build(&ctx, None).await?;

    let state = &state;
    let scope = &scope;
    let outcomes = futures::future::join_all(
        body.ids
            .iter()
            .map(|id| async move { (id.clone(), compact_one(state, scope, id).await) }),
    )
    .await;

    let failed: Vec<String> = outcomes
        .iter()
        .filter(|(_, result)| result.is_err())
        .map(|(id, _)| id.clone())
        .collect();

    if !failed.is_empty() {
        return Err(GreenroomError::not_found(format!(
            "chats {}",
            failed.join(", ")
        )));
    }

    Ok(ApiResponse::ok(CompactBatchResponse {
        compacted: outcomes.into_iter().map(|(id, _)| id).collect(),
    }))
}

async fn compact_one(state: &AppState, scope: &crate::scope::AccessScope, id: &str) -> Result<()> {
    let chat = state.chats.find_by_id(id).await?;
    gate_resource(chat, |c| c.account_id.as_deref(), scope, "chat", id)?;
    state.chats.compact(id).await
}
