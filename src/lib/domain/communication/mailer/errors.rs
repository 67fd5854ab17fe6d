//! Mailer errors

use lettre::{address::AddressError, error::Error as MessageError};
use thiserror::Error;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// The selected relay is missing credentials
    #[error("Missing {0} configuration")]
    Configuration(&'static str),

    /// A test mailbox could not be provisioned
    #[error("could not create test account: {0}")]
    TestAccount(String),

    /// The sender or recipient could not be parsed as a mailbox
    #[error("Invalid email address")]
    InvalidEmail,

    /// The body template could not be rendered
    #[error(transparent)]
    Template(#[from] crate::domain::communication::templates::TemplateError),

    /// The transport rejected or failed to deliver the message
    #[error("An error occurred while sending the email: {0}")]
    SendError(#[from] lettre::transport::smtp::Error),

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}

impl From<AddressError> for MailerError {
    fn from(_err: AddressError) -> Self {
        MailerError::InvalidEmail
    }
}

impl From<MessageError> for MailerError {
    fn from(err: MessageError) -> Self {
        MailerError::UnknownError(err.into())
    }
}

impl From<reqwest::Error> for MailerError {
    fn from(err: reqwest::Error) -> Self {
        MailerError::TestAccount(err.to_string())
    }
}
