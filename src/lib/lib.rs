#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Form mailer library
//!
//! HTTP form handlers that relay submissions to an SMTP mailer.

pub mod domain;
pub mod infrastructure;
