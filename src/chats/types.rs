use crate::auth::OverrideParams;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    /// Owning account. `None` for legacy rooms created before ownership
    /// was tracked; those are treated as public.
    pub account_id: Option<String>,
    /// Artist the conversation is about, if any.
    pub artist_id: Option<String>,
    pub title: String,
    pub message_count: u32,
    /// Set when the conversation history was last compacted.
    pub compacted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for `PATCH /chats/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateChatRequest {
    pub title: String,
    #[serde(flatten)]
    pub overrides: OverrideParams,
}

/// Body for `POST /chats/compact`.
#[derive(Debug, Deserialize)]
pub struct CompactBatchRequest {
    pub ids: Vec<String>,
    #[serde(flatten)]
    pub overrides: OverrideParams,
}

/// Result of a batch compaction.
#[derive(Debug, Serialize)]
pub struct CompactBatchResponse {
    pub compacted: Vec<String>,
}
