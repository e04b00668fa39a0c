use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The main error type for the Greenroom backend.
///
/// Authorization outcomes are values, not panics: every validator in the
/// auth pipeline returns one of these variants and handlers translate the
/// variant into a fixed HTTP status. Messages for the `Forbidden` variants
/// are stable strings that API consumers branch on.
#[derive(Debug, thiserror::Error)]
pub enum GreenroomError {
    /// No credential was supplied on the request.
    #[error("Missing credentials")]
    MissingCredential,

    /// Both an API key and a bearer token were supplied.
    #[error("Provide either an API key or a bearer token, not both")]
    AmbiguousCredential,

    /// A credential was supplied but failed verification.
    #[error("Invalid credentials: {0}")]
    InvalidCredential(String),

    /// The caller is authenticated but not authorized for the requested
    /// override or scope.
    #[error("{0}")]
    Forbidden(String),

    /// The resource does not exist, or the caller may not access it.
    /// The two cases are reported identically so that probing for
    /// resource ids outside the caller's scope leaks nothing.
    #[error("Not found: {0}")]
    NotFoundOrForbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unexpected store or network failure. Surfaced as a 500 with a
    /// generic message; details stay in server-side logs.
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl GreenroomError {
    pub fn invalid_credential(msg: impl Into<String>) -> Self {
        Self::InvalidCredential(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFoundOrForbidden(resource.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// The HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredential | Self::AmbiguousCredential | Self::InvalidCredential(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFoundOrForbidden(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) | Self::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to expose to API consumers.
    ///
    /// Internal errors get a generic message; everything else is already
    /// caller-facing and stable.
    fn safe_message(&self) -> String {
        match self {
            Self::Internal(_) | Self::Anyhow(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

/// Fixed error envelope: `{"status": "error", "message": "..."}`.
#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

impl IntoResponse for GreenroomError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = Json(ErrorBody {
            status: "error",
            message: self.safe_message(),
        });

        (status, body).into_response()
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GreenroomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_map_to_401() {
        assert_eq!(
            GreenroomError::MissingCredential.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GreenroomError::AmbiguousCredential.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GreenroomError::invalid_credential("revoked").status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn forbidden_maps_to_403_and_keeps_message() {
        let err = GreenroomError::forbidden("Access denied to specified account_id");
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Access denied to specified account_id");
    }

    #[test]
    fn ownership_failures_map_to_404() {
        let err = GreenroomError::not_found("chat chat-1");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_errors_hide_detail() {
        let err = GreenroomError::internal("connection refused to db-primary:5432");
        assert_eq!(err.safe_message(), "Internal server error");
    }
}
