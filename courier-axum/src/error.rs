use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use courier::MailerError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mailer is not configured")]
    NotConfigured,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<MailerError> for MailError {
    fn from(err: MailerError) -> Self {
        match err {
            MailerError::UnknownMailer(_)
            | MailerError::Address(_)
            | MailerError::Builder(_)
            | MailerError::TemplateNotFound(_) => MailError::BadRequest(err.to_string()),
            MailerError::Smtp(_) | MailerError::Sendmail(_) | MailerError::File(_) => {
                MailError::Delivery(err.to_string())
            }
            other => MailError::InternalError(other.to_string()),
        }
    }
}

impl IntoResponse for MailError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            MailError::NotConfigured => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Mailer is not configured".to_string(),
            ),
            MailError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            MailError::Delivery(msg) => (StatusCode::BAD_GATEWAY, msg),
            MailError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %error_message, "Mail request failed");
        }

        let body = Json(json!({
            "error": error_message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, MailError>;
