//! In-memory store implementations.
//!
//! Cloning shares the same underlying data (Arc internally). Call
//! counters let tests assert which lookups actually happened.

use crate::artists::{Artist, ArtistStore};
use crate::auth::{ApiKeyRecord, ApiKeyStore, TokenVerifier};
use crate::chats::{Chat, ChatStore};
use crate::error::Result;
use crate::organizations::MembershipStore;
use crate::pulses::{Pulse, PulseStore};
use crate::templates::{Template, TemplateStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

fn matches_accounts(account_ids: Option<&[String]>, owner: &str) -> bool {
    match account_ids {
        None => true,
        Some(ids) => ids.iter().any(|id| id == owner),
    }
}

// =============================================================================
// Credentials
// =============================================================================

#[derive(Clone, Default)]
pub struct InMemoryApiKeys {
    keys: Arc<RwLock<HashMap<String, ApiKeyRecord>>>,
    lookup_calls: Arc<AtomicUsize>,
}

impl InMemoryApiKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, account_id: &str, organization_id: Option<&str>) {
        self.keys.write().unwrap().insert(
            key.to_string(),
            ApiKeyRecord {
                account_id: account_id.to_string(),
                organization_id: organization_id.map(String::from),
                revoked: false,
            },
        );
    }

    pub fn revoke(&self, key: &str) {
        if let Some(record) = self.keys.write().unwrap().get_mut(key) {
            record.revoked = true;
        }
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ApiKeyStore for InMemoryApiKeys {
    async fn find_by_key(&self, key: &str) -> Result<Option<ApiKeyRecord>> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.keys.read().unwrap().get(key).cloned())
    }
}

/// Token verifier backed by a static token → account map.
#[derive(Clone, Default)]
pub struct StaticTokenVerifier {
    tokens: Arc<RwLock<HashMap<String, String>>>,
    verify_calls: Arc<AtomicUsize>,
}

impl StaticTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: &str, account_id: &str) {
        self.tokens
            .write()
            .unwrap()
            .insert(token.to_string(), account_id.to_string());
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Option<String>> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tokens.read().unwrap().get(token).cloned())
    }
}

// =============================================================================
// Memberships
// =============================================================================

#[derive(Clone, Default)]
pub struct InMemoryMemberships {
    rows: Arc<RwLock<HashSet<(String, String)>>>, // (account_id, organization_id)
    is_member_calls: Arc<AtomicUsize>,
    list_calls: Arc<AtomicUsize>,
}

impl InMemoryMemberships {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, account_id: &str, organization_id: &str) {
        self.rows
            .write()
            .unwrap()
            .insert((account_id.to_string(), organization_id.to_string()));
    }

    pub fn is_member_calls(&self) -> usize {
        self.is_member_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MembershipStore for InMemoryMemberships {
    async fn is_member(&self, account_id: &str, organization_id: &str) -> Result<bool> {
        self.is_member_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .rows
            .read()
            .unwrap()
            .contains(&(account_id.to_string(), organization_id.to_string())))
    }

    async fn list_member_ids(&self, organization_id: &str) -> Result<Vec<String>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut members: Vec<String> = self
            .rows
            .read()
            .unwrap()
            .iter()
            .filter(|(_, org)| org == organization_id)
            .map(|(account, _)| account.clone())
            .collect();
        members.sort();
        Ok(members)
    }
}

// =============================================================================
// Resources
// =============================================================================

#[derive(Clone, Default)]
pub struct InMemoryChats {
    chats: Arc<RwLock<HashMap<String, Chat>>>,
}

impl InMemoryChats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, chat: Chat) {
        self.chats.write().unwrap().insert(chat.id.clone(), chat);
    }

    pub fn get(&self, id: &str) -> Option<Chat> {
        self.chats.read().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl ChatStore for InMemoryChats {
    async fn find_by_id(&self, id: &str) -> Result<Option<Chat>> {
        Ok(self.chats.read().unwrap().get(id).cloned())
    }

    async fn list(
        &self,
        account_ids: Option<&[String]>,
        artist_id: Option<&str>,
    ) -> Result<Vec<Chat>> {
        let mut chats: Vec<Chat> = self
            .chats
            .read()
            .unwrap()
            .values()
            .filter(|chat| match &chat.account_id {
                Some(owner) => matches_accounts(account_ids, owner),
                None => account_ids.is_none(),
            })
            .filter(|chat| artist_id.is_none() || chat.artist_id.as_deref() == artist_id)
            .cloned()
            .collect();
        chats.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(chats)
    }

    async fn update_title(&self, id: &str, title: &str) -> Result<Option<Chat>> {
        let mut chats = self.chats.write().unwrap();
        Ok(chats.get_mut(id).map(|chat| {
            chat.title = title.to_string();
            chat.updated_at = Utc::now();
            chat.clone()
        }))
    }

    async fn compact(&self, id: &str) -> Result<()> {
        if let Some(chat) = self.chats.write().unwrap().get_mut(id) {
            chat.compacted_at = Some(Utc::now());
            chat.message_count = 0;
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryArtists {
    artists: Arc<RwLock<HashMap<String, Artist>>>,
}

impl InMemoryArtists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, artist: Artist) {
        self.artists
            .write()
            .unwrap()
            .insert(artist.id.clone(), artist);
    }
}

#[async_trait]
impl ArtistStore for InMemoryArtists {
    async fn create(&self, artist: &Artist) -> Result<()> {
        self.insert(artist.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Artist>> {
        Ok(self.artists.read().unwrap().get(id).cloned())
    }

    async fn list(&self, account_ids: Option<&[String]>) -> Result<Vec<Artist>> {
        let mut artists: Vec<Artist> = self
            .artists
            .read()
            .unwrap()
            .values()
            .filter(|artist| matches_accounts(account_ids, &artist.account_id))
            .cloned()
            .collect();
        artists.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(artists)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryPulses {
    pulses: Arc<RwLock<HashMap<String, Pulse>>>,
}

impl InMemoryPulses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, pulse: Pulse) {
        self.pulses
            .write()
            .unwrap()
            .insert(pulse.id.clone(), pulse);
    }
}

#[async_trait]
impl PulseStore for InMemoryPulses {
    async fn list(
        &self,
        account_ids: Option<&[String]>,
        artist_id: Option<&str>,
    ) -> Result<Vec<Pulse>> {
        let mut pulses: Vec<Pulse> = self
            .pulses
            .read()
            .unwrap()
            .values()
            .filter(|pulse| matches_accounts(account_ids, &pulse.account_id))
            .filter(|pulse| artist_id.is_none() || Some(pulse.artist_id.as_str()) == artist_id)
            .cloned()
            .collect();
        pulses.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(pulses)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryTemplates {
    templates: Arc<RwLock<HashMap<String, Template>>>,
}

impl InMemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, template: Template) {
        self.templates
            .write()
            .unwrap()
            .insert(template.id.clone(), template);
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplates {
    async fn find_by_id(&self, id: &str) -> Result<Option<Template>> {
        Ok(self.templates.read().unwrap().get(id).cloned())
    }

    async fn list(&self, account_ids: Option<&[String]>) -> Result<Vec<Template>> {
        let mut templates: Vec<Template> = self
            .templates
            .read()
            .unwrap()
            .values()
            .filter(|template| match &template.owner_account_id {
                // Unowned templates are public.
                None => true,
                Some(owner) => matches_accounts(account_ids, owner),
            })
            .cloned()
            .collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(templates)
    }
}
