//! Testing utilities.
//!
//! In-memory implementations of every store trait, with call counters so
//! tests can assert that a code path issued (or skipped) a lookup, plus
//! fixture helpers for building records and a fully wired [`AppState`]
//! for router-level tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use greenroom::testing::{TestStores, test_state};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let stores = TestStores::new();
//!     stores.api_keys.insert("gk_1", "acct-1", None);
//!     let app = greenroom::app::router(test_state(&stores, "org-admin"));
//!     // drive `app` with tower::ServiceExt::oneshot
//! }
//! ```

mod fixtures;
mod stores;

pub use fixtures::{TestStores, artist, chat, pulse, template, test_state};
pub use stores::{
    InMemoryApiKeys, InMemoryArtists, InMemoryChats, InMemoryMemberships, InMemoryPulses,
    InMemoryTemplates, StaticTokenVerifier,
};
