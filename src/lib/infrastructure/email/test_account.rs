//! Ethereal test accounts
//!
//! In development mail goes to a throwaway mailbox provisioned on demand
//! through the nodemailer API instead of a real relay. Sent messages can be
//! viewed in the browser at a preview URL.

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::domain::communication::mailer::MailerError;

/// Default endpoint used to provision test accounts
pub const DEFAULT_TEST_ACCOUNT_URL: &str = "https://api.nodemailer.com/user";

lazy_static! {
    static ref MSGID_REGEX: Regex = Regex::new(r"MSGID=([^\s\]]+)").unwrap();
}

/// SMTP server details of a test account
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ServerSettings {
    /// SMTP host
    pub host: String,

    /// SMTP port
    pub port: u16,

    /// Whether the port expects TLS from the first byte
    pub secure: bool,
}

/// A provisioned test mailbox
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct TestAccount {
    /// SMTP username
    pub user: String,

    /// SMTP password
    pub pass: String,

    /// SMTP server details
    pub smtp: ServerSettings,

    /// Base URL of the web interface
    pub web: String,
}

impl std::fmt::Debug for TestAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestAccount")
            .field("user", &self.user)
            .field("pass", &"********")
            .field("smtp", &self.smtp)
            .field("web", &self.web)
            .finish()
    }
}

impl TestAccount {
    /// Provisions a new test account from the API at `url`
    pub async fn create(url: &str) -> Result<Self, MailerError> {
        debug!("provisioning test account from {url}");

        let response: Value = Client::new()
            .post(url)
            .json(&json!({
                "requestor": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Self::from_response(response)
    }

    /// Parses the provisioning API's response body
    pub fn from_response(response: Value) -> Result<Self, MailerError> {
        if response["status"] != "success" {
            let reason = response["error"]
                .as_str()
                .unwrap_or("unexpected response from test account API");

            return Err(MailerError::TestAccount(reason.to_string()));
        }

        serde_json::from_value(response).map_err(|e| MailerError::TestAccount(e.to_string()))
    }

    /// Returns the preview URL of a message, given the server's reply to it
    pub fn preview_url(&self, reply: &str) -> Option<String> {
        preview_url(&self.web, reply)
    }
}

/// Builds `<web>/message/<MSGID>` from an SMTP reply such as
/// `250 Accepted [STATUS=new MSGID=abc]`.
pub fn preview_url(web: &str, reply: &str) -> Option<String> {
    let id = MSGID_REGEX.captures(reply)?.get(1)?.as_str();

    Some(format!("{}/message/{}", web.trim_end_matches('/'), id))
}
