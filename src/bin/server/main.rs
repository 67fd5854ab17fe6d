#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Form mailer web server

use anyhow::Result;
use clap::Parser;
use form_mailer::infrastructure::{
    email::smtp::{MailerConfig, SMTPMailer},
    http::{HttpServer, HttpServerConfig},
};
use tracing::{debug, info};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The mailer configuration
    #[clap(flatten)]
    pub mailer: MailerConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    if let Err(e) = dotenv {
        debug!("not loading .env: {e}");
    }

    let args = Args::parse();

    info!(
        environment = ?args.mailer.environment,
        relay = ?args.mailer.relay,
        "starting form mailer"
    );

    let mailer = SMTPMailer::new(args.mailer);

    HttpServer::new(mailer, args.server).await?.run().await
}
