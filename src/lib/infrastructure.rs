//! Infrastructure adapters: SMTP mailer and HTTP server

pub mod email;
pub mod http;
