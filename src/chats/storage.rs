use super::types::Chat;
use crate::error::Result;
use async_trait::async_trait;

/// Chat storage operations.
///
/// `account_ids` of `None` means the caller holds unrestricted scope; an
/// empty slice must match nothing.
#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Chat>>;

    /// List chats owned by any of `account_ids` (all chats when `None`),
    /// optionally narrowed to one artist.
    async fn list(
        &self,
        account_ids: Option<&[String]>,
        artist_id: Option<&str>,
    ) -> Result<Vec<Chat>>;

    /// Rename a chat. Returns the updated record, `None` if the chat
    /// vanished between fetch and write.
    async fn update_title(&self, id: &str, title: &str) -> Result<Option<Chat>>;

    /// Compact a chat's conversation history.
    async fn compact(&self, id: &str) -> Result<()>;
}
