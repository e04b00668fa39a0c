//! Prompt template resources.
//!
//! Templates may be unowned; an unowned template is public and readable
//! by every caller.

use crate::app::AppState;
use crate::auth::OverrideParams;
use crate::error::Result;
use crate::http::ApiResponse;
use crate::scope::gate_resource;
use async_trait::async_trait;
use axum::{
    Router,
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reusable prompt template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    /// Owning account; `None` marks a built-in, public template.
    pub owner_account_id: Option<String>,
    pub name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Template storage operations.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Template>>;

    /// List templates owned by any of `account_ids` plus all unowned
    /// templates. `None` lists everything.
    async fn list(&self, account_ids: Option<&[String]>) -> Result<Vec<Template>>;
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/templates", get(list_templates))
        .route("/templates/{id}", get(get_template))
}

async fn list_templates(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiResponse<Vec<Template>>> {
    let ctx = state.auth.build(&headers, OverrideParams::default()).await?;
    let scope = state.scopes.build(&ctx, None).await?;
    let templates = state.templates.list(scope.account_ids()).await?;
    Ok(ApiResponse::ok(templates))
}

async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<ApiResponse<Template>> {
    let ctx = state.auth.build(&headers, OverrideParams::default()).await?;
    let scope = state.scopes.build(&ctx, None).await?;

    let template = state.templates.find_by_id(&id).await?;
    let template = gate_resource(
        template,
        |t| t.owner_account_id.as_deref(),
        &scope,
        "template",
        &id,
    )?;
    Ok(ApiResponse::ok(template))
}
