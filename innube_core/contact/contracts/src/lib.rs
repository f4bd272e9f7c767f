use std::future::Future;

use innube_models::contact::ContactSubmission;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Relay the submission to the site owner by email.
    ///
    /// Returns the response of the email provider unmodified.
    fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<serde_json::Value, ContactSendMessageError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSendMessageError {
    #[error("The email provider api key is not configured.")]
    NotConfigured,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_send_message(
        mut self,
        submission: ContactSubmission,
        result: Result<serde_json::Value, ContactSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
