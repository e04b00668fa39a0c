//! Credential resolution and auth context construction.
//!
//! Pipeline per request: extract exactly one credential, resolve it to an
//! identity, apply caller-supplied overrides (each validated), and hand
//! the resulting [`AuthContext`] to the handler. Scope construction and
//! ownership checks build on the context; see [`crate::scope`].

mod context;
mod credential;
mod jwt;
mod overrides;
mod storage;

pub use context::{AuthContext, AuthContextBuilder};
pub use credential::{Credential, CredentialResolver, ResolvedIdentity};
pub use jwt::{Jwk, JwkSet, JwtSessionVerifier, SessionClaims};
pub use overrides::{OverrideParams, OverrideValidator, normalize_override};
pub use storage::{ApiKeyRecord, ApiKeyStore, TokenVerifier};
