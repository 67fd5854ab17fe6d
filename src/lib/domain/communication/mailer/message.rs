//! Email message

use std::collections::BTreeMap;

use thiserror::Error;

use crate::domain::communication::email_addresses::{EmailAddress, EmailAddressError};

/// Errors that can occur when building a [`MessageRequest`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageRequestError {
    /// The recipient is missing or malformed
    #[error(transparent)]
    Recipient(#[from] EmailAddressError),

    /// The subject is empty
    #[error("subject is empty")]
    EmptySubject,

    /// The body has no content
    #[error("body is empty")]
    EmptyBody,
}

/// A reference to a named template on disk and the parameters to render it with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateRef {
    /// The template name, without directory or extension
    pub name: String,

    /// Named parameters substituted into the template
    pub params: BTreeMap<String, String>,
}

impl TemplateRef {
    /// Creates a reference to the template `name` with the given parameters
    pub fn new<I, K, V>(name: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.to_string(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// The body of an email
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageBody {
    /// A ready-made HTML body
    Html(String),

    /// A template rendered into HTML at send time
    Template(TemplateRef),
}

impl MessageBody {
    fn is_empty(&self) -> bool {
        match self {
            MessageBody::Html(html) => html.trim().is_empty(),
            MessageBody::Template(template) => {
                template.name.trim().is_empty()
                    || template.params.values().any(|value| value.trim().is_empty())
            }
        }
    }
}

/// A validated request to send one email
///
/// Recipient, subject and body are guaranteed to be non-empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageRequest {
    to: EmailAddress,
    subject: String,
    body: MessageBody,
}

impl MessageRequest {
    /// Validates and creates a new message request
    pub fn new(to: &str, subject: &str, body: MessageBody) -> Result<Self, MessageRequestError> {
        let to = EmailAddress::new(to)?;

        if subject.trim().is_empty() {
            return Err(MessageRequestError::EmptySubject);
        }

        if body.is_empty() {
            return Err(MessageRequestError::EmptyBody);
        }

        Ok(Self {
            to,
            subject: subject.to_string(),
            body,
        })
    }

    /// The recipient
    pub fn to(&self) -> &EmailAddress {
        &self.to
    }

    /// The subject line
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The body
    pub fn body(&self) -> &MessageBody {
        &self.body
    }
}

/// The outcome of a successful send
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentMessage {
    /// The `Message-ID` of the sent email
    pub message_id: String,

    /// Where the message can be viewed, for test transports only
    pub preview_url: Option<String>,
}
