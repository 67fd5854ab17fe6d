//! Email delivery over SMTP

pub mod smtp;
pub mod test_account;
pub mod transport;
