//! SMTP email service implementation

use std::path::PathBuf;

use async_trait::async_trait;
use clap::Parser;
use lettre::{
    message::{header::ContentType, Mailbox},
    Message,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    domain::communication::{
        mailer::{Mailer, MailerError, MessageBody, MessageRequest, SentMessage},
        templates::TemplateRenderer,
    },
    infrastructure::email::{
        test_account::DEFAULT_TEST_ACCOUNT_URL,
        transport::{Environment, Relay, Transport, TransportConfig},
    },
};

/// Mailer configuration
#[derive(Clone, Debug, Parser)]
pub struct MailerConfig {
    /// The environment; `production` sends through the relay
    #[clap(long, env = "APP_ENV", value_enum, default_value = "development")]
    pub environment: Environment,

    /// The production relay
    #[clap(long, env = "MAIL_RELAY", value_enum, default_value = "resend")]
    pub relay: Relay,

    /// The sender mailbox
    #[clap(long, env = "SEND_EMAIL_FROM", default_value = "MyApp <noreply@example.com>")]
    pub sender: String,

    /// Resend API key
    #[clap(long, env = "RESEND_API_KEY", hide_env_values = true)]
    pub resend_api_key: Option<String>,

    /// Mailgun API key
    #[clap(long, env = "MAILGUN_API_KEY", hide_env_values = true)]
    pub mailgun_api_key: Option<String>,

    /// Mailgun sending domain
    #[clap(long, env = "MAILGUN_DOMAIN")]
    pub mailgun_domain: Option<String>,

    /// Endpoint that provisions test accounts in development
    #[clap(long, env = "TEST_ACCOUNT_URL", default_value = DEFAULT_TEST_ACCOUNT_URL)]
    pub test_account_url: String,

    /// Directory containing the email templates
    #[clap(long, env = "EMAIL_TEMPLATES_DIR", default_value = "templates/emails")]
    pub templates_dir: PathBuf,
}

/// SMTP mailer
#[derive(Debug, Clone)]
pub struct SMTPMailer {
    config: MailerConfig,
    templates: TemplateRenderer,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: MailerConfig) -> Self {
        let templates = TemplateRenderer::new(config.templates_dir.clone());

        Self { config, templates }
    }

    async fn deliver(&self, request: &MessageRequest) -> Result<SentMessage, MailerError> {
        let transport = Transport::resolve(&TransportConfig::from_config(&self.config)?).await?;

        let html = match request.body() {
            MessageBody::Html(html) => html.clone(),
            MessageBody::Template(template) => {
                self.templates
                    .render(&template.name, &template.params)
                    .await?
            }
        };

        let from: Mailbox = self.config.sender.parse()?;
        let message_id = format!("<{}@{}>", Uuid::new_v4(), from.email.domain());

        let email = Message::builder()
            .from(from)
            .to(request.to().as_str().parse()?)
            .subject(request.subject())
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_HTML)
            .body(html)?;

        let preview_url = transport.send(email).await?;

        info!(message_id = %message_id, "Message sent");

        if let Some(url) = &preview_url {
            info!(preview_url = %url, "Preview URL");
        }

        Ok(SentMessage {
            message_id,
            preview_url,
        })
    }
}

#[async_trait]
impl Mailer for SMTPMailer {
    async fn send(&self, request: &MessageRequest) -> Result<SentMessage, MailerError> {
        self.deliver(request).await.inspect_err(|err| {
            error!(error = %err, to = %request.to(), "failed to send email");
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::net::SocketAddr;

    use axum::{routing::post, Json, Router};
    use serde_json::json;
    use testresult::TestResult;
    use tokio::{
        io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
        net::TcpListener,
        sync::oneshot,
    };

    use super::*;
    use crate::domain::communication::{mailer::TemplateRef, templates::TemplateError};

    pub(crate) fn test_config(environment: Environment) -> MailerConfig {
        MailerConfig {
            environment,
            relay: Relay::Resend,
            sender: "MyApp <noreply@example.com>".to_string(),
            resend_api_key: None,
            mailgun_api_key: None,
            mailgun_domain: None,
            test_account_url: "http://127.0.0.1:9/user".to_string(),
            templates_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/emails")),
        }
    }

    fn html_request() -> TestResult<MessageRequest> {
        Ok(MessageRequest::new(
            "email@example.com",
            "Hello",
            MessageBody::Html("<div>Hi</div>".to_string()),
        )?)
    }

    #[test]
    fn test_mailer_config_defaults() -> TestResult {
        let config = MailerConfig::try_parse_from(["mailer"])?;

        assert_eq!(config.sender, "MyApp <noreply@example.com>");
        assert_eq!(config.test_account_url, DEFAULT_TEST_ACCOUNT_URL);
        assert_eq!(config.templates_dir, PathBuf::from("templates/emails"));

        Ok(())
    }

    #[test]
    fn test_mailer_config_from_args() -> TestResult {
        let config = MailerConfig::try_parse_from([
            "mailer",
            "--environment",
            "production",
            "--relay",
            "mailgun",
            "--mailgun-api-key",
            "key-123",
            "--mailgun-domain",
            "mg.example.com",
        ])?;

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.relay, Relay::Mailgun);
        assert_eq!(config.mailgun_api_key.as_deref(), Some("key-123"));
        assert_eq!(config.mailgun_domain.as_deref(), Some("mg.example.com"));

        Ok(())
    }

    #[tokio::test]
    async fn test_production_without_credentials_fails_before_sending() -> TestResult {
        let mailer = SMTPMailer::new(test_config(Environment::Production));

        let result = mailer.send(&html_request()?).await;

        assert!(matches!(result, Err(MailerError::Configuration("Resend"))));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_template_fails_before_sending() -> TestResult {
        let mut config = test_config(Environment::Production);
        config.resend_api_key = Some("re_123".to_string());

        let mailer = SMTPMailer::new(config);
        let request = MessageRequest::new(
            "email@example.com",
            "Hello",
            MessageBody::Template(TemplateRef::new("does-not-exist", [("name", "Ada")])),
        )?;

        let result = mailer.send(&request).await;

        assert!(matches!(
            result,
            Err(MailerError::Template(TemplateError::NotFound(_)))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_sender_fails_before_sending() -> TestResult {
        let mut config = test_config(Environment::Production);
        config.resend_api_key = Some("re_123".to_string());
        config.sender = "not a mailbox".to_string();

        let mailer = SMTPMailer::new(config);

        let result = mailer.send(&html_request()?).await;

        assert!(matches!(result, Err(MailerError::InvalidEmail)));

        Ok(())
    }

    #[tokio::test]
    async fn test_development_propagates_test_account_failure() -> TestResult {
        let mailer = SMTPMailer::new(test_config(Environment::Development));

        let result = mailer.send(&html_request()?).await;

        assert!(matches!(result, Err(MailerError::TestAccount(_))));

        Ok(())
    }

    /// Accepts one SMTP session and hands back the DATA it received, replying
    /// the way Ethereal does.
    async fn fake_smtp_server() -> TestResult<(SocketAddr, oneshot::Receiver<String>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (data_tx, data_rx) = oneshot::channel();

        tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let (reader, mut writer) = stream.into_split();
            let mut lines = BufReader::new(reader).lines();
            let mut data_tx = Some(data_tx);

            let _ = writer.write_all(b"220 localhost ESMTP\r\n").await;

            while let Ok(Some(line)) = lines.next_line().await {
                let command = line.to_ascii_uppercase();

                let reply: &[u8] = if command.starts_with("EHLO") || command.starts_with("HELO") {
                    b"250-localhost\r\n250 AUTH PLAIN LOGIN\r\n"
                } else if command.starts_with("AUTH") {
                    b"235 Authentication successful\r\n"
                } else if command == "DATA" {
                    let _ = writer.write_all(b"354 End data with <CR><LF>.<CR><LF>\r\n").await;

                    let mut data = String::new();
                    while let Ok(Some(line)) = lines.next_line().await {
                        if line == "." {
                            break;
                        }
                        data.push_str(&line);
                        data.push('\n');
                    }

                    if let Some(tx) = data_tx.take() {
                        let _ = tx.send(data);
                    }

                    b"250 Accepted [STATUS=new MSGID=abc]\r\n"
                } else if command == "QUIT" {
                    let _ = writer.write_all(b"221 Bye\r\n").await;
                    break;
                } else {
                    b"250 OK\r\n"
                };

                if writer.write_all(reply).await.is_err() {
                    break;
                }
            }
        });

        Ok((addr, data_rx))
    }

    /// Serves a provisioning API that hands out an account on `smtp`
    async fn fake_test_account_api(smtp: SocketAddr) -> TestResult<SocketAddr> {
        let account = json!({
            "status": "success",
            "user": "jane.doe@ethereal.email",
            "pass": "s3cr3t",
            "smtp": { "host": smtp.ip().to_string(), "port": smtp.port(), "secure": false },
            "web": "https://ethereal.email"
        });

        let app = Router::new().route(
            "/user",
            post(move || {
                let account = account.clone();
                async move { Json(account) }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(addr)
    }

    #[tokio::test]
    async fn test_development_send_returns_preview_url() -> TestResult {
        let (smtp_addr, data) = fake_smtp_server().await?;
        let api_addr = fake_test_account_api(smtp_addr).await?;

        let mut config = test_config(Environment::Development);
        config.test_account_url = format!("http://{api_addr}/user");

        let sent = SMTPMailer::new(config).send(&html_request()?).await?;

        assert_eq!(
            sent.preview_url.as_deref(),
            Some("https://ethereal.email/message/abc")
        );
        assert!(sent.message_id.starts_with('<') && sent.message_id.ends_with("@example.com>"));

        let data = data.await?;

        assert!(data.contains("To: email@example.com"));
        assert!(data.contains("Subject: Hello"));
        assert!(data.contains(&format!("Message-ID: {}", sent.message_id)));
        assert!(data.contains("<div>Hi</div>"));

        Ok(())
    }
}
