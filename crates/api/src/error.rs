use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use prayaas_agents::{ConversationError, ProfileError};
use prayaas_core::AdvisorError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),
    #[error("{0}")]
    InvalidQuery(#[from] AdvisorError),
    #[error("{0}")]
    Conversation(#[from] ConversationError),
    #[error("chat session `{0}` was not found or has expired")]
    SessionNotFound(String),
    #[error("missing or invalid x-api-key")]
    Unauthorized,
    #[error("rate limit exceeded for this client")]
    RateLimited,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidProfile(_) => (StatusCode::BAD_REQUEST, "invalid_profile"),
            Self::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "invalid_query"),
            Self::Conversation(ConversationError::EmptyMessage) => {
                (StatusCode::BAD_REQUEST, "empty_message")
            }
            Self::Conversation(ConversationError::Busy) => {
                (StatusCode::CONFLICT, "conversation_busy")
            }
            Self::Conversation(ConversationError::NotAwaiting) => {
                (StatusCode::CONFLICT, "conversation_not_awaiting")
            }
            Self::Conversation(ConversationError::TurnLimitReached(_)) => {
                (StatusCode::CONFLICT, "turn_limit_reached")
            }
            Self::SessionNotFound(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Self::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let body = Json(json!({
            "error": code,
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_errors_map_to_distinct_statuses() {
        let busy = ApiError::from(ConversationError::Busy);
        assert_eq!(busy.status_and_code(), (StatusCode::CONFLICT, "conversation_busy"));

        let empty = ApiError::from(ConversationError::EmptyMessage);
        assert_eq!(empty.status_and_code().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_profile_message_names_the_field() {
        let error = ApiError::from(ProfileError::UnknownLabel {
            field: "language",
            value: "Klingon".to_string(),
        });
        assert_eq!(error.status_and_code().1, "invalid_profile");
        assert_eq!(
            error.to_string(),
            "invalid profile: unknown language value `Klingon`"
        );
    }
}
