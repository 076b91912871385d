//! # Instagram Outgoing Message Schemas
//!
//! Request bodies for the Graph API Send API. Bodies are always built from these
//! types and serialized by serde, so message text is escaped properly.

use serde::{Deserialize, Serialize};

/// Message recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    /// Instagram-scoped user ID
    pub id: String,
}

/// Text message to send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingTextMessage {
    pub recipient: Recipient,
    pub message: OutgoingTextContent,
}

impl OutgoingTextMessage {
    /// Creates a new text message
    pub fn new(recipient_id: String, text: String) -> Self {
        Self {
            recipient: Recipient { id: recipient_id },
            message: OutgoingTextContent { text },
        }
    }
}

/// Text content for outgoing messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingTextContent {
    pub text: String,
}

/// Media types the Send API accepts as URL attachments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    File,
    Audio,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::File => "file",
            Self::Audio => "audio",
        }
    }
}

/// Media (attachment) message to send
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMediaMessage {
    pub recipient: Recipient,
    pub message: OutgoingMediaContent,
}

impl OutgoingMediaMessage {
    /// Creates a new media message pointing at a public URL
    pub fn new(recipient_id: String, media_type: MediaType, url: String) -> Self {
        Self {
            recipient: Recipient { id: recipient_id },
            message: OutgoingMediaContent {
                attachment: OutgoingAttachment {
                    media_type,
                    payload: MediaPayload {
                        url,
                        is_reusable: true,
                    },
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMediaContent {
    pub attachment: OutgoingAttachment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingAttachment {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub payload: MediaPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaPayload {
    pub url: String,
    /// Lets Meta cache the asset for later sends
    pub is_reusable: bool,
}

/// Response from the Send API on success
#[derive(Debug, Deserialize)]
pub struct SendMessageResponse {
    pub recipient_id: Option<String>,
    pub message_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_message_body() {
        let message = OutgoingTextMessage::new("user-1".into(), "say \"hi\"\n".into());
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"recipient": {"id": "user-1"}, "message": {"text": "say \"hi\"\n"}})
        );
    }

    #[test]
    fn test_media_message_body() {
        let message = OutgoingMediaMessage::new(
            "user-1".into(),
            MediaType::Video,
            "https://cdn.example/v.mp4".into(),
        );
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "recipient": {"id": "user-1"},
                "message": {
                    "attachment": {
                        "type": "video",
                        "payload": {"url": "https://cdn.example/v.mp4", "is_reusable": true}
                    }
                }
            })
        );
    }
}
