use anyhow::ensure;
use clap::Subcommand;
use innube_config::Config;
use innube_email_contracts::{ContentType, Email, EmailService};
use tracing::info;

use crate::environment;

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// Test email deliverability
    Test { recipient: String },
}

impl EmailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            EmailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: String) -> anyhow::Result<()> {
    let email_service = environment::email_service(&config)?;

    ensure!(
        email_service.is_configured(),
        "No email provider api key configured, set {}",
        innube_config::API_KEY_ENV
    );

    let result = email_service
        .send(Email {
            recipient,
            subject: "Email Deliverability Test".into(),
            body: "Email deliverability seems to be working!".into(),
            content_type: ContentType::Text,
            reply_to: None,
        })
        .await?;

    info!("Email accepted by provider: {result}");

    Ok(())
}
