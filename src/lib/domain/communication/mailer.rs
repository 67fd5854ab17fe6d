//! Mailer module

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

mod errors;
mod message;

pub use errors::MailerError;
pub use message::{MessageBody, MessageRequest, MessageRequestError, SentMessage, TemplateRef};

/// Sends a single email
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send an email
    ///
    /// Each call makes exactly one delivery attempt through a freshly
    /// resolved transport.
    ///
    /// # Arguments
    /// * `request` - The validated [`MessageRequest`] to deliver.
    ///
    /// # Returns
    /// - [`Ok`] with the [`SentMessage`] describing the accepted message.
    /// - [`Err`] with a [`MailerError`] if the transport could not be
    ///   resolved, the body could not be rendered or the send failed.
    async fn send(&self, request: &MessageRequest) -> Result<SentMessage, MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send(&self, request: &MessageRequest) -> Result<SentMessage, MailerError>;
    }
}
