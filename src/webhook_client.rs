use std::time::Duration;

use anyhow::Context;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{redirect, Client, Url};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

use crate::domain::OutboundRecord;
use crate::routes::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum ForwardError {
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ForwardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Posts accepted signups to the spreadsheet webhook.
#[derive(Clone)]
pub struct WebhookClient {
    http_client: Client,
    url: Url,
}

impl WebhookClient {
    pub fn new(url: &Secret<String>, timeout: Duration) -> Result<Self, anyhow::Error> {
        let url = Url::parse(url.expose_secret()).context("Webhook url is not a valid url")?;
        // Apps Script answers a successful doPost with a 302.
        let http_client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()
            .context("Failed to build the webhook http client")?;
        Ok(Self { http_client, url })
    }

    #[tracing::instrument(name = "Forwarding signup to webhook", skip_all)]
    pub async fn forward(&self, record: &OutboundRecord) -> Result<(), ForwardError> {
        let response = self
            .http_client
            .post(self.url.clone())
            .header(CACHE_CONTROL, "no-cache")
            .json(record)
            .send()
            .await
            .context("Failed to reach the webhook")?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Webhook answered");
        if status.is_redirection() {
            return Ok(());
        }
        if !status.is_success() {
            return Err(ForwardError::Rejected(format!(
                "Webhook failed with status {}.",
                status.as_u16()
            )));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        if is_json {
            let reply: Value = response
                .json()
                .await
                .context("Failed to read the webhook reply")?;
            if !reply.is_object() {
                return Err(anyhow::anyhow!("Webhook replied with JSON that is not an object").into());
            }
            if reply.get("ok") == Some(&Value::Bool(false)) {
                let message = reply
                    .get("error")
                    .and_then(Value::as_str)
                    .unwrap_or("Webhook script returned an error.");
                return Err(ForwardError::Rejected(message.to_string()));
            }
        }
        Ok(())
    }
}
