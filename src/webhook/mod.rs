//! Webhook handlers for external integrations
//!
//! - [`instagram`] - Instagram messaging webhook relay

pub mod errors;
pub mod instagram;
pub mod routes;

use crate::config::AppConfig;
use instagram::client::ImplMessageSender;

/// Per-worker application state
pub struct AppState {
    pub config: AppConfig,
    pub sender: ImplMessageSender,
}
