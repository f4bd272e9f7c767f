//! Wiring of the concrete services from the loaded config.

use std::net::SocketAddr;

use anyhow::Context;
use innube_api_rest::{RestServer, RestServerConfig};
use innube_config::Config;
use innube_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use innube_email_impl::{EmailServiceConfig, EmailServiceImpl};
use innube_templates_impl::TemplateServiceImpl;

pub type ContactService = ContactServiceImpl<EmailServiceImpl, TemplateServiceImpl>;

pub fn email_service(config: &Config) -> anyhow::Result<EmailServiceImpl> {
    let email_config = EmailServiceConfig::new(
        &config.email.endpoint,
        config.email.from.clone(),
        config.email.api_key.as_ref().map(|x| x.0.clone()),
    )?;

    EmailServiceImpl::new(email_config).context("Failed to create email service")
}

pub fn contact_service(config: &Config) -> anyhow::Result<ContactService> {
    let templates = TemplateServiceImpl::new().context("Failed to compile templates")?;

    Ok(ContactServiceImpl::new(
        email_service(config)?,
        templates,
        ContactServiceConfig {
            recipient: config.contact.recipient.as_str().into(),
        },
    ))
}

pub fn rest_server(config: &Config) -> anyhow::Result<RestServer<ContactService>> {
    let rest_server_config = RestServerConfig {
        addr: SocketAddr::new(config.http.host, config.http.port),
        allowed_origins: config.http.allowed_origins.as_slice().into(),
    };

    Ok(RestServer::new(rest_server_config, contact_service(config)?))
}
