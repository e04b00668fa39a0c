//! Organization membership.
//!
//! The membership relation is owned by the external store; this crate only
//! reads it. The two queries below are the entire contract the
//! authorization engine needs.

mod storage;

pub use storage::MembershipStore;
