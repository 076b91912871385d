//! Application configuration.
//!
//! Every value is read once from the environment at startup (after loading an
//! optional `.env` file) and then handed to the web server state. Handlers never
//! read the environment on their own.
//!
//! # Security Notes
//! - Sensitive fields are clearly marked and should never be logged

use envconfig::Envconfig;
use std::{str::FromStr, time::Duration};

/// What the dispatcher does when a text reply cannot be delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFailurePolicy {
    /// Stop processing the whole batch and report the failure to the caller.
    #[default]
    Abort,
    /// Log the failure and keep going with the remaining messages.
    Continue,
}

impl FromStr for TextFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "continue" => Ok(Self::Continue),
            other => Err(format!("unknown text failure policy: {other}")),
        }
    }
}

/// Relay configuration loaded from environment variables.
///
/// Credentials are not validated here: an empty page token only shows up as
/// a delivery error from the Graph API.
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// 🔒 SENSITIVE: token echoed back by Meta during the subscription handshake
    #[envconfig(default = "")]
    pub verify_token: String,

    /// Page (or Instagram professional account) ID used for text replies (SEMI-SENSITIVE)
    #[envconfig(default = "")]
    pub page_id: String,

    /// 🔒 SENSITIVE: page access token sent as `access_token` on every outbound call
    #[envconfig(default = "")]
    pub page_access_token: String,

    /// 🔒 SENSITIVE: Meta app secret. When set, POST bodies must carry a valid
    /// `X-Hub-Signature-256` header
    pub app_secret: Option<String>,

    /// Graph API base URL (NON-SENSITIVE)
    #[envconfig(default = "https://graph.facebook.com")]
    pub graph_api_host: String,

    /// Pinned Graph API version (NON-SENSITIVE)
    #[envconfig(default = "v19.0")]
    pub graph_api_version: String,

    /// Upper bound in seconds for each outbound call
    #[envconfig(default = "10")]
    pub outbound_timeout_secs: u64,

    /// Values: "abort", "continue"
    #[envconfig(default = "abort")]
    pub text_failure_policy: TextFailurePolicy,

    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(default = "0.0.0.0")]
    pub web_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(default = "8080")]
    pub web_server_port: u16,

    /// Path to SSL private key file, only used in prod (SENSITIVE PATH)
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file, only used in prod (NON-SENSITIVE)
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,

    /// 🔒 SENSITIVE: Logfire write token. Traces stay local when unset
    pub logfire_token: Option<String>,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    fn graph_base_url(&self) -> String {
        format!(
            "{host}/{version}",
            host = self.graph_api_host.trim_end_matches('/'),
            version = self.graph_api_version
        )
    }

    /// Endpoint for text replies sent on behalf of the configured page
    pub fn text_send_endpoint(&self) -> String {
        format!("{}/{}/messages", self.graph_base_url(), self.page_id)
    }

    /// Endpoint for media replies, resolved by Meta from the access token
    pub fn media_send_endpoint(&self) -> String {
        format!("{}/me/messages", self.graph_base_url())
    }

    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_secs(self.outbound_timeout_secs)
    }
}

/// Builds a config for tests without touching the process environment.
#[cfg(test)]
pub fn test_config(overrides: &[(&str, &str)]) -> AppConfig {
    let vars: std::collections::HashMap<String, String> = [
        ("VERIFY_TOKEN", "verify-secret"),
        ("PAGE_ID", "page-1"),
        ("PAGE_ACCESS_TOKEN", "page-token"),
    ]
    .into_iter()
    .chain(overrides.iter().copied())
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    AppConfig::init_from_hashmap(&vars).expect("test config should be valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = test_config(&[]);
        assert_eq!(config.graph_api_host, "https://graph.facebook.com");
        assert_eq!(config.graph_api_version, "v19.0");
        assert_eq!(config.outbound_timeout(), Duration::from_secs(10));
        assert_eq!(config.text_failure_policy, TextFailurePolicy::Abort);
        assert_eq!(config.web_server_port, 8080);
        assert!(config.app_secret.is_none());
        assert!(!config.is_prod());
    }

    #[test]
    fn test_endpoints() {
        let config = test_config(&[("GRAPH_API_HOST", "http://localhost:9000/")]);
        assert_eq!(
            config.text_send_endpoint(),
            "http://localhost:9000/v19.0/page-1/messages"
        );
        assert_eq!(
            config.media_send_endpoint(),
            "http://localhost:9000/v19.0/me/messages"
        );
    }

    #[test]
    fn test_text_failure_policy_parsing() {
        assert_eq!(
            "abort".parse::<TextFailurePolicy>(),
            Ok(TextFailurePolicy::Abort)
        );
        assert_eq!(
            " Continue ".parse::<TextFailurePolicy>(),
            Ok(TextFailurePolicy::Continue)
        );
        assert!("retry".parse::<TextFailurePolicy>().is_err());

        let config = test_config(&[("TEXT_FAILURE_POLICY", "continue")]);
        assert_eq!(config.text_failure_policy, TextFailurePolicy::Continue);
    }

    #[test]
    fn test_credentials_default_to_empty() {
        let config = AppConfig::init_from_hashmap(&std::collections::HashMap::new()).unwrap();
        assert_eq!(config.verify_token, "");
        assert_eq!(config.page_id, "");
        assert_eq!(config.page_access_token, "");
        assert_eq!(config.text_send_endpoint(), "https://graph.facebook.com/v19.0//messages");
    }
}
