pub const WEBHOOK_PATH: &str = "/webhook/messaging-webhook";
pub const SUBSCRIBE_MODE: &str = "subscribe";
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// Value of the `object` field for events coming from Instagram messaging
pub const INSTAGRAM_OBJECT: &str = "instagram";

/// Sent instead of an image attachment that arrives without a URL
pub const PLACEHOLDER_IMAGE_URL: &str = "https://i.gifer.com/Ifph.gif";

pub const EVENT_RECEIVED: &str = "EVENT_RECEIVED";
pub const SEND_FAILED_STATUS: &str = "failed to send message";
