//! Send an email with a plain HTML body

use axum::{
    extract::{rejection::FormRejection, State},
    response::Redirect,
    Form,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::communication::mailer::{Mailer, MessageBody, MessageRequest},
    infrastructure::http::{errors::ApiError, state::AppState},
};

use super::{dispatch, present};

/// Route of this action, relative to the actions prefix
pub const PATH: &str = "/send-email";

/// Send email form
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SendEmailForm {
    /// The recipient's email address
    #[schema(example = "email@example.com")]
    pub recipient: Option<String>,

    /// The subject line
    #[schema(example = "Hello")]
    pub subject: Option<String>,

    /// The message, wrapped in a `<div>` and sent as HTML
    #[schema(example = "It's been a while!")]
    pub message: Option<String>,
}

/// Send an email whose body is the submitted message
#[utoipa::path(
    post,
    operation_id = "send_email",
    tag = "Actions",
    path = "/actions/send-email",
    request_body(content = SendEmailForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = StatusCode::SEE_OTHER, description = "Email sent, redirects to /success"),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Missing required fields", body = ErrorResponse, example = json!({ "error": "Missing required fields" })),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "The email could not be sent", body = ErrorResponse, example = json!({ "error": "Failed to send email" })),
    )
)]
pub async fn handler<M: Mailer>(
    State(state): State<AppState<M>>,
    form: Result<Form<SendEmailForm>, FormRejection>,
) -> Result<Redirect, ApiError> {
    let Form(form) = form?;

    let (Some(to), Some(subject), Some(message)) = (
        present(form.recipient),
        present(form.subject),
        present(form.message),
    ) else {
        return Err(ApiError::missing_fields());
    };

    let html = format!("<div>{message}</div>");
    let request = MessageRequest::new(&to, &subject, MessageBody::Html(html))?;

    dispatch(&state, request).await
}
