use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// Request failure rendered as a plain-text 500.
#[derive(Debug)]
pub struct PageError {
    context: &'static str,
    source: anyhow::Error,
}

impl PageError {
    pub fn new(context: &'static str, source: anyhow::Error) -> Self {
        Self { context, source }
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Module errors already embed their causes in their own message.
        write!(f, "{}: {}", self.context, self.source)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        error!(message = "Request failed", error = %message);
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}
