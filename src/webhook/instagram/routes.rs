//! Instagram webhook endpoint handlers
//!
//! Implements both the subscription verification endpoint (GET) and the event
//! receiver (POST).
//!
//! # Security
//!
//! When an app secret is configured, the POST endpoint rejects any body whose
//! `X-Hub-Signature-256` header does not match before looking at it.

use super::{
    handler::{self, DispatchOutcome, DispatchReport},
    security,
};
use crate::{consts, webhook::AppState, webhook::errors::WebhookError};
use ntex::{util::Bytes, web};
use serde_json::json;
use tracing::Instrument;

/// Query parameters for webhook verification
#[derive(Debug, Default, PartialEq, Eq)]
pub struct VerifyQuery {
    /// The mode parameter, should be "subscribe"
    pub mode: String,
    /// The verification token configured in the Meta app dashboard
    pub verify_token: String,
    /// The challenge string to echo back
    pub challenge: String,
}

impl VerifyQuery {
    /// Picks the `hub.*` parameters out of the raw query pairs.
    ///
    /// A repeated key keeps its first value and missing keys stay empty.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        let mut seen = [false; 3];

        for (key, value) in pairs {
            let (slot, field) = match key.as_str() {
                "hub.mode" => (0, &mut query.mode),
                "hub.verify_token" => (1, &mut query.verify_token),
                "hub.challenge" => (2, &mut query.challenge),
                _ => continue,
            };
            if !seen[slot] {
                seen[slot] = true;
                *field = value;
            }
        }

        query
    }
}

/// Webhook verification endpoint (GET)
///
/// # Returns
/// - 200 with the challenge string if verification succeeds
/// - 403 with an empty body otherwise
#[web::get("")]
pub async fn verify(
    pairs: web::types::Query<Vec<(String, String)>>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let query = VerifyQuery::from_pairs(pairs.into_inner());

    if query.mode != consts::SUBSCRIBE_MODE {
        return Err(WebhookError::VerificationFailed.into());
    }

    if query.verify_token != app_state.config.verify_token {
        return Err(WebhookError::VerificationFailed.into());
    }

    logfire::info!("Webhook verification successful");

    Ok(web::HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(query.challenge))
}

/// Webhook receiver endpoint (POST)
///
/// Processes the batch synchronously, replying to every message before the
/// acknowledgement is returned.
///
/// # Returns
/// - 200 `EVENT_RECEIVED` once the batch was processed
/// - 200 `{"status": "failed to send message"}` when a text reply aborted the batch
/// - 400 with an `error` field if the body is not a valid payload
/// - 403 if the payload signature is missing or wrong
/// - 404 if the payload does not come from Instagram
#[web::post("")]
pub async fn receive(
    req: web::HttpRequest,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<web::HttpResponse, web::Error> {
    // The span is only entered while this request's future is being polled.
    let span = logfire::span!("instagram_webhook");
    handle_delivery(&req, &body, &app_state)
        .instrument(span)
        .await
}

async fn handle_delivery(
    req: &web::HttpRequest,
    body: &Bytes,
    app_state: &AppState,
) -> Result<web::HttpResponse, web::Error> {
    if let Some(app_secret) = app_state.config.app_secret.as_deref() {
        let signature = req
            .headers()
            .get(consts::SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());

        let Some(signature) = signature else {
            logfire::warn!("Missing X-Hub-Signature-256 header");
            return Err(WebhookError::InvalidSignature.into());
        };

        if !security::verify_signature(signature, body, app_secret) {
            return Err(WebhookError::InvalidSignature.into());
        }
    }

    let payload = handler::parse_payload(body)?;

    logfire::info!(
        "Received webhook: object={object}, entries={entries}",
        object = payload.object.clone(),
        entries = payload.entry.len() as i64
    );

    let outcome = handler::process_webhook(
        &payload,
        app_state.sender.as_ref(),
        app_state.config.text_failure_policy,
    )
    .await?;

    match outcome {
        DispatchOutcome::Completed(report) => {
            log_report("completed", &report);
            Ok(web::HttpResponse::Ok()
                .content_type("text/plain; charset=utf-8")
                .body(consts::EVENT_RECEIVED))
        }
        DispatchOutcome::Aborted(report) => {
            log_report("aborted", &report);
            Ok(web::HttpResponse::Ok().json(&json!({
                "status": consts::SEND_FAILED_STATUS
            })))
        }
    }
}

fn log_report(outcome: &'static str, report: &DispatchReport) {
    logfire::info!(
        "Webhook {outcome}: texts_sent={texts_sent}, media_sent={media_sent}, echoes_skipped={echoes_skipped}, attachments_skipped={attachments_skipped}, failed_sends={failed_sends}",
        outcome = outcome,
        texts_sent = report.texts_sent as i64,
        media_sent = report.media_sent as i64,
        echoes_skipped = report.echoes_skipped as i64,
        attachments_skipped = report.attachments_skipped as i64,
        failed_sends = report.failed_sends as i64
    );
}
