use derive_more::{Display, Error};
use ntex::{http, web};
use serde_json::json;

/// Errors surfaced to whoever called the webhook.
///
/// Outbound send failures are not here: Meta only expects an acknowledgement,
/// so those are logged by the dispatcher instead.
#[derive(Debug, Display, Error)]
pub enum WebhookError {
    #[display("webhook verification failed")]
    VerificationFailed,
    #[display("invalid payload signature")]
    InvalidSignature,
    #[display("malformed payload: {_0}")]
    MalformedPayload(#[error(not(source))] String),
    #[display("unsupported webhook object: {_0:?}")]
    UnsupportedSource(#[error(not(source))] String),
}

impl web::error::WebResponseError for WebhookError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        logfire::warn!("{error}", error = self.to_string());

        match self {
            WebhookError::MalformedPayload(detail) => {
                web::HttpResponse::build(self.status_code()).json(&json!({ "error": detail }))
            }
            _ => web::HttpResponse::new(self.status_code()),
        }
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            WebhookError::VerificationFailed | WebhookError::InvalidSignature => {
                http::StatusCode::FORBIDDEN
            }
            WebhookError::MalformedPayload(_) => http::StatusCode::BAD_REQUEST,
            WebhookError::UnsupportedSource(_) => http::StatusCode::NOT_FOUND,
        }
    }
}
