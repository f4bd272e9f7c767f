use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use innube_email_contracts::{ContentType, Email, EmailService};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::http::HttpClient;

mod http;

pub const RESEND_ENDPOINT: &str = "https://api.resend.com";

/// Email Delivery Service backed by the Resend HTTP API.
#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    config: Arc<EmailServiceConfig>,
    client: HttpClient,
}

#[derive(Debug, Clone)]
pub struct EmailServiceConfig {
    emails_url: Url,
    from: String,
    api_key: Option<String>,
}

impl EmailServiceConfig {
    /// `endpoint` is the base url of the provider api, `from` the sender
    /// mailbox (e.g. `Innube Contacto <onboarding@resend.dev>`).
    pub fn new(endpoint: &Url, from: String, api_key: Option<String>) -> anyhow::Result<Self> {
        let mut endpoint = endpoint.clone();
        if !endpoint.path().ends_with('/') {
            endpoint.set_path(&format!("{}/", endpoint.path()));
        }

        Ok(Self {
            emails_url: endpoint
                .join("emails")
                .context("Invalid email provider endpoint")?,
            from,
            api_key,
        })
    }
}

impl EmailServiceImpl {
    pub fn new(config: EmailServiceConfig) -> anyhow::Result<Self> {
        Ok(Self {
            config: config.into(),
            client: HttpClient::new().context("Failed to build http client")?,
        })
    }
}

impl EmailService for EmailServiceImpl {
    async fn send(&self, email: Email) -> anyhow::Result<serde_json::Value> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("No api key configured for the email provider"))?;

        let (html, text) = match email.content_type {
            ContentType::Html => (Some(email.body.as_str()), None),
            ContentType::Text => (None, Some(email.body.as_str())),
        };

        let request = SendEmailRequest {
            from: &self.config.from,
            to: [&email.recipient],
            subject: &email.subject,
            html,
            text,
            reply_to: email.reply_to.as_deref(),
        };

        debug!(url = %self.config.emails_url, "submit email to provider");

        let response = self
            .client
            .post(self.config.emails_url.clone())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to reach the email provider")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Email provider responded with {status}: {body}");
        }

        response
            .json()
            .await
            .context("Failed to decode the email provider response")
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}
