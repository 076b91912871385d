//! Instagram messaging webhook integration
//!
//! ## Submodules
//!
//! - [`handler`] - Dispatch of webhook events into outbound replies
//! - [`routes`] - HTTP endpoint handlers (verification and event receiver)
//! - [`schemas`] - Inbound webhook payload structures
//! - [`outgoing_schemas`] - Send API request bodies
//! - [`client`] - Graph API client for sending replies
//! - [`security`] - `X-Hub-Signature-256` verification

pub mod client;
pub mod handler;
pub mod outgoing_schemas;
pub mod routes;
pub mod schemas;
pub mod security;

pub use routes::{receive, verify};
