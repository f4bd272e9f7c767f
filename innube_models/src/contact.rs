use nutype::nutype;
use thiserror::Error;

/// A contact form submission that passed validation.
///
/// Only exists for the duration of a single request; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub author: ContactAuthor,
    pub subject: Option<ContactSubject>,
    pub message: ContactMessage,
    pub service: Option<ContactServiceCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactAuthor {
    pub name: ContactAuthorName,
    /// Used as the reply-to address of the relayed email. Not validated
    /// beyond being non-empty.
    pub email: ContactAuthorEmail,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactSubmissionError {
    #[error("Missing required fields.")]
    MissingFields,
}

impl ContactSubmission {
    /// Builds a submission from raw form values.
    ///
    /// `name`, `email` and `message` are required and must not be empty. Empty
    /// optional values are dropped.
    pub fn from_fields(
        name: Option<String>,
        email: Option<String>,
        subject: Option<String>,
        message: Option<String>,
        service: Option<String>,
    ) -> Result<Self, ContactSubmissionError> {
        let (Some(name), Some(email), Some(message)) = (
            name.and_then(|x| ContactAuthorName::try_new(x).ok()),
            email.and_then(|x| ContactAuthorEmail::try_new(x).ok()),
            message.and_then(|x| ContactMessage::try_new(x).ok()),
        ) else {
            return Err(ContactSubmissionError::MissingFields);
        };

        Ok(Self {
            author: ContactAuthor { name, email },
            subject: subject.and_then(|x| ContactSubject::try_new(x).ok()),
            message,
            service: service.and_then(|x| ContactServiceCategory::try_new(x).ok()),
        })
    }
}

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref)
)]
pub struct ContactAuthorName(String);

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref)
)]
pub struct ContactAuthorEmail(String);

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref)
)]
pub struct ContactSubject(String);

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref)
)]
pub struct ContactMessage(String);

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref)
)]
pub struct ContactServiceCategory(String);
