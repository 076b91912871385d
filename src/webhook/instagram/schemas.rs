//! # Instagram Webhook Schemas
//!
//! Data structures for the JSON payload Meta posts when an Instagram messaging
//! event occurs. Every field is optional on the wire: missing or `null` values
//! fall back to their defaults instead of failing the whole payload.

use serde::{Deserialize, Deserializer};

/// Treats an explicit `null` the same as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Root webhook payload
#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    /// The product that produced the event, "instagram" for this relay
    #[serde(default, deserialize_with = "nullable")]
    pub object: String,
    /// Batched entries, in delivery order
    #[serde(default, deserialize_with = "nullable")]
    pub entry: Vec<Entry>,
}

/// Entry object grouping messaging events for one account
#[derive(Debug, Default, Deserialize)]
pub struct Entry {
    /// Instagram account ID
    pub id: Option<String>,
    /// Time of the update in epoch milliseconds
    pub time: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub messaging: Vec<MessagingEvent>,
}

/// A single messaging event
#[derive(Debug, Default, Deserialize)]
pub struct MessagingEvent {
    /// Instagram-scoped ID of the user who sent the message
    #[serde(default, deserialize_with = "nullable")]
    pub sender: Participant,
    /// ID of the account that received the message
    #[serde(default, deserialize_with = "nullable")]
    pub recipient: Participant,
    pub timestamp: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub message: Message,
}

#[derive(Debug, Default, Deserialize)]
pub struct Participant {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
}

/// Message object
#[derive(Debug, Default, Deserialize)]
pub struct Message {
    /// Message ID
    pub mid: Option<String>,
    /// Text body (absent for attachment-only messages)
    pub text: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub attachments: Vec<Attachment>,
    /// Set when the message was sent by the page itself
    #[serde(default, deserialize_with = "nullable")]
    pub is_echo: bool,
}

impl Message {
    /// Returns the text body if there is something to reply with.
    pub fn reply_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.is_empty())
    }
}

/// Attachment object
#[derive(Debug, Default, Deserialize)]
pub struct Attachment {
    /// Attachment type (image, video, file, audio, ...)
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: AttachmentKind,
    #[serde(default, deserialize_with = "nullable")]
    pub payload: AttachmentPayload,
}

/// Attachment type tag. Unknown tags are kept verbatim for logging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum AttachmentKind {
    Image,
    Video,
    File,
    Audio,
    Other(String),
}

impl Default for AttachmentKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl AttachmentKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::File => "file",
            Self::Audio => "audio",
            Self::Other(kind) => kind,
        }
    }
}

impl From<String> for AttachmentKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "image" => Self::Image,
            "video" => Self::Video,
            "file" => Self::File,
            "audio" => Self::Audio,
            _ => Self::Other(kind),
        }
    }
}


/// Attachment payload
#[derive(Debug, Default, Deserialize)]
pub struct AttachmentPayload {
    /// CDN URL of the media, when Meta provides one
    pub url: Option<String>,
}

impl AttachmentPayload {
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_payload_deserialization() {
        let json = r#"{
            "object": "instagram",
            "entry": [{
                "id": "17841400000000000",
                "time": 1700000000000,
                "messaging": [{
                    "sender": {"id": "user-1"},
                    "recipient": {"id": "page-1"},
                    "timestamp": 1700000000000,
                    "message": {
                        "mid": "m_1",
                        "text": "hello",
                        "attachments": [
                            {"type": "image", "payload": {"url": "https://cdn.example/a.png"}},
                            {"type": "story_mention", "payload": {"url": "https://cdn.example/s"}}
                        ]
                    }
                }]
            }]
        }"#;

        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.object, "instagram");

        let event = &payload.entry[0].messaging[0];
        assert_eq!(event.sender.id, "user-1");
        assert_eq!(event.recipient.id, "page-1");
        assert_eq!(event.message.reply_text(), Some("hello"));
        assert!(!event.message.is_echo);

        let attachments = &event.message.attachments;
        assert_eq!(attachments[0].kind, AttachmentKind::Image);
        assert_eq!(attachments[0].payload.url(), Some("https://cdn.example/a.png"));
        assert_eq!(
            attachments[1].kind,
            AttachmentKind::Other("story_mention".to_string())
        );
    }

    #[test]
    fn test_missing_and_null_fields_fall_back_to_defaults() {
        let json = r#"{
            "object": "instagram",
            "entry": [
                {},
                {"messaging": null},
                {"messaging": [{"sender": {"id": "user-1"}, "message": {"attachments": null, "is_echo": true}}]},
                {"messaging": [{"sender": {"id": "user-2"}, "message": {"text": "", "attachments": [{"type": "video"}]}}]}
            ]
        }"#;

        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        assert!(payload.entry[0].messaging.is_empty());
        assert!(payload.entry[1].messaging.is_empty());

        let echo = &payload.entry[2].messaging[0];
        assert!(echo.message.is_echo);
        assert!(echo.message.attachments.is_empty());
        assert_eq!(echo.recipient.id, "");

        let empty_text = &payload.entry[3].messaging[0].message;
        assert_eq!(empty_text.reply_text(), None);
        assert_eq!(empty_text.attachments[0].kind, AttachmentKind::Video);
        assert_eq!(empty_text.attachments[0].payload.url(), None);
    }

    #[test]
    fn test_missing_object_is_empty() {
        let payload: WebhookPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload.object, "");
        assert!(payload.entry.is_empty());
    }
}
