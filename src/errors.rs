use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Failures of the chat-completion gateway exchange
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("AI gateway credential is not configured")]
    Configuration,
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,
    #[error("Payment required. Please add credits to your workspace.")]
    PaymentRequired,
    #[error("AI gateway error: {status}")]
    Api { status: u16, body: String },
    #[error("AI gateway request timed out")]
    Timeout,
    #[error("AI gateway network error: {0}")]
    Network(String),
    #[error("AI gateway returned an invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// `{ "error": "..." }` body returned with every non-2xx status
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Gateway(GatewayError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Gateway(GatewayError::PaymentRequired) => StatusCode::PAYMENT_REQUIRED,
            AppError::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller. Gateway bodies and transport details stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Gateway(GatewayError::Network(_)) => "AI gateway is unreachable".to_string(),
            AppError::Gateway(GatewayError::InvalidResponse(_)) => {
                "AI gateway returned an invalid response".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = Json(ErrorEnvelope {
            error: self.client_message(),
        });

        match self {
            AppError::Gateway(GatewayError::RateLimited) => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (status, headers, body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}
