//! Fixture helpers for tests.

use super::stores::{
    InMemoryApiKeys, InMemoryArtists, InMemoryChats, InMemoryMemberships, InMemoryPulses,
    InMemoryTemplates, StaticTokenVerifier,
};
use crate::app::{AppState, Stores};
use crate::artists::Artist;
use crate::chats::Chat;
use crate::config::ConfigBuilder;
use crate::pulses::Pulse;
use crate::templates::Template;
use chrono::Utc;
use std::sync::Arc;

/// Build a chat owned by `account_id` (`None` = unowned/legacy).
pub fn chat(id: &str, account_id: Option<&str>, artist_id: Option<&str>) -> Chat {
    Chat {
        id: id.to_string(),
        account_id: account_id.map(String::from),
        artist_id: artist_id.map(String::from),
        title: format!("Chat {id}"),
        message_count: 12,
        compacted_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn artist(id: &str, account_id: &str) -> Artist {
    Artist {
        id: id.to_string(),
        account_id: account_id.to_string(),
        name: format!("Artist {id}"),
        genre: None,
        created_at: Utc::now(),
    }
}

pub fn pulse(id: &str, account_id: &str, artist_id: &str) -> Pulse {
    Pulse {
        id: id.to_string(),
        account_id: account_id.to_string(),
        artist_id: artist_id.to_string(),
        content: format!("Pulse {id}"),
        scheduled_for: None,
        created_at: Utc::now(),
    }
}

/// Build a template; `owner` of `None` marks it public.
pub fn template(id: &str, owner: Option<&str>) -> Template {
    Template {
        id: id.to_string(),
        owner_account_id: owner.map(String::from),
        name: format!("Template {id}"),
        body: "...".to_string(),
        created_at: Utc::now(),
    }
}

/// One handle per in-memory store, shared with the state built from it.
#[derive(Clone, Default)]
pub struct TestStores {
    pub api_keys: Arc<InMemoryApiKeys>,
    pub tokens: Arc<StaticTokenVerifier>,
    pub memberships: Arc<InMemoryMemberships>,
    pub chats: Arc<InMemoryChats>,
    pub artists: Arc<InMemoryArtists>,
    pub pulses: Arc<InMemoryPulses>,
    pub templates: Arc<InMemoryTemplates>,
}

impl TestStores {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Wire an [`AppState`] over the test stores.
pub fn test_state(stores: &TestStores, admin_organization_id: &str) -> AppState {
    let config = ConfigBuilder::new()
        .with_admin_organization(admin_organization_id)
        .build();
    AppState::new(
        &config,
        Stores {
            api_keys: stores.api_keys.clone(),
            tokens: stores.tokens.clone(),
            memberships: stores.memberships.clone(),
            chats: stores.chats.clone(),
            artists: stores.artists.clone(),
            pulses: stores.pulses.clone(),
            templates: stores.templates.clone(),
        },
    )
}
