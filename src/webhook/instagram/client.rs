//! # Graph API Client
//!
//! Sends replies through the Instagram Send API. Text replies go to the page's
//! own messages endpoint while media replies go to `me/messages`. Both are
//! authenticated with the page access token as a query parameter.

use super::outgoing_schemas::{OutgoingMediaMessage, OutgoingTextMessage, SendMessageResponse};
use crate::config::AppConfig;
use anyhow::Context;
use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::Serialize;

/// Failure of a single outbound call
#[derive(Debug, Display, Error)]
pub enum SendError {
    /// The Graph API answered with something other than 200
    #[display("Graph API returned error status {status}: {body}")]
    Delivery {
        status: u16,
        body: String,
    },
    /// The request could not be built or executed (DNS, connect, timeout, ...)
    #[display("Failed to send request to Graph API: {_0}")]
    Transport(reqwest::Error),
}

/// Outbound side of the relay.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender {
    async fn send_text_message(&self, message: OutgoingTextMessage) -> Result<(), SendError>;

    async fn send_media_message(&self, message: OutgoingMediaMessage) -> Result<(), SendError>;
}

pub type ImplMessageSender = Box<dyn MessageSender>;

/// Graph API client for sending messages
#[derive(Clone)]
pub struct GraphClient {
    /// HTTP client, shared by every worker
    client: reqwest::Client,
    /// `{host}/{version}/{page_id}/messages`
    text_endpoint: String,
    /// `{host}/{version}/me/messages`
    media_endpoint: String,
    /// Page access token
    access_token: String,
}

impl GraphClient {
    /// Creates a new client with the configured outbound timeout
    pub fn new(app_config: &AppConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(app_config.outbound_timeout())
            .build()
            .context("failed to build Graph API http client")?;

        Ok(Self {
            client,
            text_endpoint: app_config.text_send_endpoint(),
            media_endpoint: app_config.media_send_endpoint(),
            access_token: app_config.page_access_token.clone(),
        })
    }

    /// Internal method to post any message type to the Send API
    async fn send_message<T: Serialize + Sync>(
        &self,
        endpoint: &str,
        message: &T,
    ) -> Result<(), SendError> {
        let response = self
            .client
            .post(endpoint)
            .query(&[("access_token", self.access_token.as_str())])
            .json(message)
            .send()
            .await
            .map_err(SendError::Transport)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());

        if status != reqwest::StatusCode::OK {
            return Err(SendError::Delivery {
                status: status.as_u16(),
                body,
            });
        }

        if let Ok(sent) = serde_json::from_str::<SendMessageResponse>(&body) {
            tracing::debug!(
                recipient_id = sent.recipient_id.as_deref().unwrap_or_default(),
                message_id = sent.message_id.as_deref().unwrap_or_default(),
                "message accepted by Graph API"
            );
        }

        Ok(())
    }
}

#[async_trait]
impl MessageSender for GraphClient {
    async fn send_text_message(&self, message: OutgoingTextMessage) -> Result<(), SendError> {
        self.send_message(&self.text_endpoint, &message).await
    }

    async fn send_media_message(&self, message: OutgoingMediaMessage) -> Result<(), SendError> {
        self.send_message(&self.media_endpoint, &message).await
    }
}
