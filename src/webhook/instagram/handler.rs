//! # Instagram Webhook Handler
//!
//! Turns an inbound webhook payload into outbound Send API calls: every non-echo
//! message gets its text replied back to the sender, followed by each of its
//! attachments.

use super::{
    client::MessageSender,
    outgoing_schemas::{MediaType, OutgoingMediaMessage, OutgoingTextMessage},
    schemas::{Attachment, AttachmentKind, MessagingEvent, WebhookPayload},
};
use crate::{config::TextFailurePolicy, consts, webhook::errors::WebhookError};

/// Counters describing what a dispatch did
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub texts_sent: usize,
    pub media_sent: usize,
    pub echoes_skipped: usize,
    pub attachments_skipped: usize,
    pub failed_sends: usize,
}

/// Result of processing a whole payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Every event was visited. Individual sends may still have failed.
    Completed(DispatchReport),
    /// A text reply failed under [`TextFailurePolicy::Abort`] and the
    /// remaining events were left untouched.
    Aborted(DispatchReport),
}

/// Deserializes the raw request body
pub fn parse_payload(body: &[u8]) -> Result<WebhookPayload, WebhookError> {
    serde_json::from_slice(body).map_err(|e| WebhookError::MalformedPayload(e.to_string()))
}

/// Decides which media type and URL an attachment is forwarded with.
///
/// Images without a URL fall back to [`consts::PLACEHOLDER_IMAGE_URL`]. Video,
/// file and audio attachments without a URL are skipped, as is every other type.
pub fn resolve_media(attachment: &Attachment) -> Option<(MediaType, String)> {
    let url = attachment.payload.url();

    let media_type = match attachment.kind {
        AttachmentKind::Image => {
            let url = url.unwrap_or(consts::PLACEHOLDER_IMAGE_URL);
            return Some((MediaType::Image, url.to_string()));
        }
        AttachmentKind::Video => MediaType::Video,
        AttachmentKind::File => MediaType::File,
        AttachmentKind::Audio => MediaType::Audio,
        AttachmentKind::Other(ref kind) => {
            logfire::warn!(
                "Received unsupported attachment type: {type}",
                r#type = kind.clone()
            );
            return None;
        }
    };

    match url {
        Some(url) => Some((media_type, url.to_string())),
        None => {
            logfire::warn!(
                "No URL found for {type} attachment",
                r#type = media_type.as_str()
            );
            None
        }
    }
}

/// Sends every resolvable attachment of one event. Failures are only logged.
async fn forward_attachments(
    event: &MessagingEvent,
    sender: &dyn MessageSender,
    report: &mut DispatchReport,
) {
    for attachment in &event.message.attachments {
        let Some((media_type, url)) = resolve_media(attachment) else {
            report.attachments_skipped += 1;
            continue;
        };

        let message = OutgoingMediaMessage::new(event.sender.id.clone(), media_type, url);
        match sender.send_media_message(message).await {
            Ok(()) => report.media_sent += 1,
            Err(e) => {
                report.failed_sends += 1;
                logfire::error!(
                    "Error sending {type} message: {error}",
                    r#type = media_type.as_str(),
                    error = e.to_string()
                );
            }
        }
    }
}

/// Main webhook processor
///
/// # Arguments
///
/// * `payload` - The webhook payload from Meta
/// * `sender` - Outbound Send API client
/// * `policy` - What to do when a text reply fails
///
/// # Returns
///
/// [`WebhookError::UnsupportedSource`] when the payload does not come from
/// Instagram, in which case nothing is sent.
pub async fn process_webhook(
    payload: &WebhookPayload,
    sender: &dyn MessageSender,
    policy: TextFailurePolicy,
) -> Result<DispatchOutcome, WebhookError> {
    if payload.object != consts::INSTAGRAM_OBJECT {
        return Err(WebhookError::UnsupportedSource(payload.object.clone()));
    }

    let mut report = DispatchReport::default();

    for event in payload.entry.iter().flat_map(|entry| &entry.messaging) {
        if event.message.is_echo {
            logfire::info!("Ignoring echo message");
            report.echoes_skipped += 1;
            continue;
        }

        if let Some(text) = event.message.reply_text() {
            let message = OutgoingTextMessage::new(event.sender.id.clone(), text.to_string());
            match sender.send_text_message(message).await {
                Ok(()) => report.texts_sent += 1,
                Err(e) => {
                    report.failed_sends += 1;
                    logfire::error!(
                        "Failed to send text message to {recipient}: {error}",
                        recipient = event.sender.id.clone(),
                        error = e.to_string()
                    );
                    if policy == TextFailurePolicy::Abort {
                        return Ok(DispatchOutcome::Aborted(report));
                    }
                }
            }
        }

        forward_attachments(event, sender, &mut report).await;
    }

    Ok(DispatchOutcome::Completed(report))
}
