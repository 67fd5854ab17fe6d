//! Outgoing communication: email addresses, messages and the mailer contract.

pub mod email_addresses;
pub mod mailer;
pub mod templates;
