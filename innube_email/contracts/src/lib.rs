use std::future::Future;

/// Email Delivery Service: hands an email to a transactional email provider.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait EmailService: Send + Sync + 'static {
    /// Submit the email to the provider and return its response unmodified.
    fn send(&self, email: Email) -> impl Future<Output = anyhow::Result<serde_json::Value>> + Send;

    /// Whether the provider credential is available.
    fn is_configured(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub content_type: ContentType,
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Html,
}

#[cfg(feature = "mock")]
impl MockEmailService {
    pub fn with_is_configured(mut self, result: bool) -> Self {
        self.expect_is_configured().return_const(result);
        self
    }

    pub fn with_send(mut self, email: Email, result: serde_json::Value) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(Ok(result))));
        self
    }

    pub fn with_send_error(mut self, email: Email, error: &'static str) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(email))
            .return_once(move |_| Box::pin(std::future::ready(Err(anyhow::anyhow!(error)))));
        self
    }
}
