//! Form actions that send an email and redirect to the success page

use axum::{response::Redirect, routing::post, Router};
use tracing::debug;

use crate::{
    domain::communication::mailer::{Mailer, MessageRequest},
    infrastructure::http::{errors::ApiError, handlers::pages::SUCCESS_PATH, state::AppState},
};

pub mod send_custom_email;
pub mod send_email;
pub mod send_welcome_email;

/// Prefix the action routes are mounted under
pub const PATH_PREFIX: &str = "/actions";

/// Routes for the form actions
pub fn router<M: Mailer>() -> Router<AppState<M>> {
    Router::new()
        .route(send_email::PATH, post(send_email::handler))
        .route(send_custom_email::PATH, post(send_custom_email::handler))
        .route(send_welcome_email::PATH, post(send_welcome_email::handler))
}

/// Treats absent, empty and whitespace-only fields alike
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

/// Sends `request` once and redirects to the success page
async fn dispatch<M: Mailer>(
    state: &AppState<M>,
    request: MessageRequest,
) -> Result<Redirect, ApiError> {
    let sent = state.mailer.send(&request).await?;

    debug!(message_id = %sent.message_id, "redirecting to {SUCCESS_PATH}");

    Ok(Redirect::to(SUCCESS_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_filters_blank_fields() {
        assert_eq!(present(None), None);
        assert_eq!(present(Some(String::new())), None);
        assert_eq!(present(Some(" \t\n".to_string())), None);
        assert_eq!(present(Some(" hi ".to_string())), Some(" hi ".to_string()));
    }
}
