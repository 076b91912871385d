use crate::consts;
use ntex::web;

/// Configures the Instagram webhook routes.
///
/// These are public endpoints: Meta authenticates through the verify token
/// and, when configured, the payload signature.
///
/// # Routes
/// - `GET /webhook/messaging-webhook` - subscription verification
/// - `POST /webhook/messaging-webhook` - event receiver
pub fn instagram(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(consts::WEBHOOK_PATH)
            .service((super::instagram::verify, super::instagram::receive)),
    );
}
