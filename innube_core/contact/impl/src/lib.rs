use std::sync::Arc;

use innube_core_contact_contracts::{ContactSendMessageError, ContactService};
use innube_email_contracts::{ContentType, Email, EmailService};
use innube_models::contact::ContactSubmission;
use innube_templates_contracts::{ContactMessageTemplate, TemplateService};
use tracing::{trace, warn};

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<Email, Template> {
    email: Email,
    template: Template,
    config: ContactServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    /// Mailbox receiving all contact form messages.
    pub recipient: Arc<str>,
}

impl<EmailS, Template> ContactServiceImpl<EmailS, Template> {
    pub fn new(email: EmailS, template: Template, config: ContactServiceConfig) -> Self {
        Self {
            email,
            template,
            config,
        }
    }
}

impl<EmailS, Template> ContactService for ContactServiceImpl<EmailS, Template>
where
    EmailS: EmailService,
    Template: TemplateService,
{
    async fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> Result<serde_json::Value, ContactSendMessageError> {
        if !self.email.is_configured() {
            warn!("Refusing to send contact message: no api key configured for the email provider");
            return Err(ContactSendMessageError::NotConfigured);
        }

        let subject = match &submission.subject {
            Some(subject) => format!("Contacto web: {}", **subject),
            None => "Nuevo contacto web".into(),
        };

        trace!("render contact message");
        let body = self.template.render(&ContactMessageTemplate {
            service: submission.service.map(|x| x.into_inner()),
            name: submission.author.name.into_inner(),
            email: (*submission.author.email).clone(),
            subject: submission.subject.map(|x| x.into_inner()),
            message: submission.message.into_inner(),
        })?;

        let email = Email {
            recipient: self.config.recipient.to_string(),
            subject,
            body,
            content_type: ContentType::Html,
            reply_to: Some(submission.author.email.into_inner()),
        };

        trace!("send contact message");
        self.email.send(email).await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use innube_email_contracts::MockEmailService;
    use innube_templates_contracts::MockTemplateService;
    use innube_utils::assert_matches;
    use serde_json::json;

    use super::*;

    fn config() -> ContactServiceConfig {
        ContactServiceConfig {
            recipient: "contact@example.com".into(),
        }
    }

    fn submission(subject: Option<&str>, service: Option<&str>) -> ContactSubmission {
        ContactSubmission::from_fields(
            Some("Ana".into()),
            Some("ana@x.com".into()),
            subject.map(Into::into),
            Some("Hola".into()),
            service.map(Into::into),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let template = MockTemplateService::new().with_render(
            ContactMessageTemplate {
                service: Some("Cloud".into()),
                name: "Ana".into(),
                email: "ana@x.com".into(),
                subject: Some("Presupuesto".into()),
                message: "Hola".into(),
            },
            "<p>rendered</p>".into(),
        );

        let email = MockEmailService::new().with_is_configured(true).with_send(
            Email {
                recipient: "contact@example.com".into(),
                subject: "Contacto web: Presupuesto".into(),
                body: "<p>rendered</p>".into(),
                content_type: ContentType::Html,
                reply_to: Some("ana@x.com".into()),
            },
            json!({"id": "49a3999c-0ce1-4ea6-ab68-afcd6dc2e794"}),
        );

        let sut = ContactServiceImpl::new(email, template, config());

        // Act
        let result = sut
            .send_message(submission(Some("Presupuesto"), Some("Cloud")))
            .await;

        // Assert
        assert_eq!(
            result.unwrap(),
            json!({"id": "49a3999c-0ce1-4ea6-ab68-afcd6dc2e794"})
        );
    }

    #[tokio::test]
    async fn ok_default_subject() {
        // Arrange
        let template = MockTemplateService::new().with_render(
            ContactMessageTemplate {
                service: None,
                name: "Ana".into(),
                email: "ana@x.com".into(),
                subject: None,
                message: "Hola".into(),
            },
            "<p>rendered</p>".into(),
        );

        let email = MockEmailService::new().with_is_configured(true).with_send(
            Email {
                recipient: "contact@example.com".into(),
                subject: "Nuevo contacto web".into(),
                body: "<p>rendered</p>".into(),
                content_type: ContentType::Html,
                reply_to: Some("ana@x.com".into()),
            },
            json!({"id": "1"}),
        );

        let sut = ContactServiceImpl::new(email, template, config());

        // Act
        let result = sut.send_message(submission(None, None)).await;

        // Assert
        assert_eq!(result.unwrap(), json!({"id": "1"}));
    }

    #[tokio::test]
    async fn not_configured() {
        // Arrange
        let template = MockTemplateService::new();
        let email = MockEmailService::new().with_is_configured(false);

        let sut = ContactServiceImpl::new(email, template, config());

        // Act
        let result = sut.send_message(submission(None, None)).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::NotConfigured));
    }

    #[tokio::test]
    async fn send_error() {
        // Arrange
        let template = MockTemplateService::new().with_render(
            ContactMessageTemplate {
                service: None,
                name: "Ana".into(),
                email: "ana@x.com".into(),
                subject: None,
                message: "Hola".into(),
            },
            "<p>rendered</p>".into(),
        );

        let email = MockEmailService::new()
            .with_is_configured(true)
            .with_send_error(
                Email {
                    recipient: "contact@example.com".into(),
                    subject: "Nuevo contacto web".into(),
                    body: "<p>rendered</p>".into(),
                    content_type: ContentType::Html,
                    reply_to: Some("ana@x.com".into()),
                },
                "connection refused",
            );

        let sut = ContactServiceImpl::new(email, template, config());

        // Act
        let result = sut.send_message(submission(None, None)).await;

        // Assert
        assert_matches!(result, Err(ContactSendMessageError::Other(_)));
    }
}
