//! HTTP response envelope shared by all handlers.

mod response;

pub use response::ApiResponse;
