use crate::gateway::GatewayError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Errors returned by relay operations, rendered as `{"error", "details"?}`
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Server not found")]
    ServerNotFound,

    #[error("Channel not found or not a text channel")]
    ChannelNotFound,

    #[error("{action}")]
    OperationFailed {
        action: &'static str,
        #[source]
        source: GatewayError,
    },
}

impl RelayError {
    /// Wrap an upstream failure, logging it under `action`
    pub fn failed(action: &'static str) -> impl FnOnce(GatewayError) -> RelayError {
        move |source| {
            log::error!("{}: {}", action, source);
            RelayError::OperationFailed { action, source }
        }
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::ServerNotFound | RelayError::ChannelNotFound => StatusCode::NOT_FOUND,
            RelayError::OperationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            RelayError::OperationFailed { source, .. } => serde_json::json!({
                "error": self.to_string(),
                "details": source.to_string(),
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
