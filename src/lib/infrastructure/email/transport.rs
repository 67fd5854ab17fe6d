//! Transport resolution
//!
//! Production sends through a configured relay; everything else goes to a
//! freshly provisioned test mailbox. A transport is built for every send and
//! dropped afterwards.

use std::fmt;

use clap::ValueEnum;
use lettre::{
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::debug;

use crate::{
    domain::communication::mailer::MailerError,
    infrastructure::email::{smtp::MailerConfig, test_account::TestAccount},
};

/// Port for SMTP over implicit TLS
pub const SMTPS_PORT: u16 = 465;

/// The environment the application runs in
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    /// Mail goes to a test mailbox
    #[default]
    Development,

    /// Mail goes through the configured relay
    Production,
}

/// The SMTP relay used in production
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Relay {
    /// Resend (`smtp.resend.com`)
    #[default]
    Resend,

    /// Mailgun (`smtp.mailgun.org`)
    Mailgun,
}

impl Relay {
    /// Human-readable relay name
    pub fn name(&self) -> &'static str {
        match self {
            Relay::Resend => "Resend",
            Relay::Mailgun => "Mailgun",
        }
    }

    /// Builds the relay's connection settings from the credentials in `config`
    pub fn settings(&self, config: &MailerConfig) -> Result<RelaySettings, MailerError> {
        let missing = || MailerError::Configuration(self.name());

        match self {
            Relay::Resend => {
                let api_key = non_empty(&config.resend_api_key).ok_or_else(missing)?;

                Ok(RelaySettings {
                    host: "smtp.resend.com".to_string(),
                    port: SMTPS_PORT,
                    username: "resend".to_string(),
                    password: api_key.to_string(),
                })
            }
            Relay::Mailgun => {
                let api_key = non_empty(&config.mailgun_api_key).ok_or_else(missing)?;
                let domain = non_empty(&config.mailgun_domain).ok_or_else(missing)?;

                Ok(RelaySettings {
                    host: "smtp.mailgun.org".to_string(),
                    port: SMTPS_PORT,
                    username: format!("postmaster@{domain}"),
                    password: api_key.to_string(),
                })
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Connection settings for a production relay
#[derive(Clone, PartialEq, Eq)]
pub struct RelaySettings {
    /// SMTP host
    pub host: String,

    /// SMTP port, spoken over implicit TLS
    pub port: u16,

    /// SMTP username
    pub username: String,

    /// SMTP password or API key
    pub password: String,
}

impl fmt::Debug for RelaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelaySettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Where mail should be delivered
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportConfig {
    /// A test mailbox provisioned from `account_url`
    Test {
        /// Test account provisioning endpoint
        account_url: String,
    },

    /// A production relay
    Relay(RelaySettings),
}

impl TransportConfig {
    /// Chooses the transport for the configured environment.
    ///
    /// Fails with [`MailerError::Configuration`] in production when the
    /// relay's credentials are missing. No network calls are made.
    pub fn from_config(config: &MailerConfig) -> Result<Self, MailerError> {
        match config.environment {
            Environment::Production => Ok(Self::Relay(config.relay.settings(config)?)),
            Environment::Development => Ok(Self::Test {
                account_url: config.test_account_url.clone(),
            }),
        }
    }
}

/// An SMTP transport ready to send
pub struct Transport {
    smtp: AsyncSmtpTransport<Tokio1Executor>,
    test_account: Option<TestAccount>,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("test_account", &self.test_account)
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Builds the transport described by `config`, provisioning a test
    /// account first if needed.
    pub async fn resolve(config: &TransportConfig) -> Result<Self, MailerError> {
        match config {
            TransportConfig::Relay(relay) => {
                debug!("using relay {}:{}", relay.host, relay.port);

                let smtp = AsyncSmtpTransport::<Tokio1Executor>::relay(&relay.host)?
                    .port(relay.port)
                    .credentials(Credentials::new(
                        relay.username.clone(),
                        relay.password.clone(),
                    ))
                    .build();

                Ok(Self {
                    smtp,
                    test_account: None,
                })
            }
            TransportConfig::Test { account_url } => {
                let account = TestAccount::create(account_url).await?;

                debug!("using test account {}", account.user);

                // Plain ports upgrade with STARTTLS when the server offers it
                let builder = if account.smtp.secure {
                    AsyncSmtpTransport::<Tokio1Executor>::relay(&account.smtp.host)?
                } else {
                    let tls = TlsParameters::new(account.smtp.host.clone())?;

                    AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&account.smtp.host)
                        .tls(Tls::Opportunistic(tls))
                };

                let smtp = builder
                    .port(account.smtp.port)
                    .credentials(Credentials::new(
                        account.user.clone(),
                        account.pass.clone(),
                    ))
                    .build();

                Ok(Self {
                    smtp,
                    test_account: Some(account),
                })
            }
        }
    }

    /// Sends `message`, returning its preview URL when delivered to a test
    /// mailbox.
    pub async fn send(&self, message: Message) -> Result<Option<String>, MailerError> {
        let response = self.smtp.send(message).await?;

        let reply = response.message().collect::<Vec<_>>().join(" ");
        debug!("SMTP reply: {} {}", response.code(), reply);

        Ok(self
            .test_account
            .as_ref()
            .and_then(|account| account.preview_url(&reply)))
    }
}
