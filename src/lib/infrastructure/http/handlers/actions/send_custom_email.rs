//! Send an email rendered from the `custom` template

use axum::{
    extract::{rejection::FormRejection, State},
    response::Redirect,
    Form,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::communication::mailer::{Mailer, MessageBody, MessageRequest, TemplateRef},
    infrastructure::http::{errors::ApiError, state::AppState},
};

use super::{dispatch, present};

/// Route of this action, relative to the actions prefix
pub const PATH: &str = "/send-custom-email";

/// Template used for the message body
pub const TEMPLATE: &str = "custom";

/// Send custom email form
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SendCustomEmailForm {
    /// The recipient's email address
    #[schema(example = "email@example.com")]
    pub recipient: Option<String>,

    /// The subject line
    #[schema(example = "Our spring newsletter")]
    pub subject: Option<String>,

    /// Raw HTML inserted into the `custom` template
    #[schema(example = "<h1>Spring is here</h1>")]
    pub message: Option<String>,
}

/// Send an email with the submitted HTML wrapped in the `custom` template
#[utoipa::path(
    post,
    operation_id = "send_custom_email",
    tag = "Actions",
    path = "/actions/send-custom-email",
    request_body(content = SendCustomEmailForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = StatusCode::SEE_OTHER, description = "Email sent, redirects to /success"),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Missing required fields", body = ErrorResponse, example = json!({ "error": "Missing required fields" })),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "The email could not be sent", body = ErrorResponse, example = json!({ "error": "Failed to send email" })),
    )
)]
pub async fn handler<M: Mailer>(
    State(state): State<AppState<M>>,
    form: Result<Form<SendCustomEmailForm>, FormRejection>,
) -> Result<Redirect, ApiError> {
    let Form(form) = form?;

    let (Some(to), Some(subject), Some(html)) = (
        present(form.recipient),
        present(form.subject),
        present(form.message),
    ) else {
        return Err(ApiError::missing_fields());
    };

    let body = MessageBody::Template(TemplateRef::new(TEMPLATE, [("html", html)]));
    let request = MessageRequest::new(&to, &subject, body)?;

    dispatch(&state, request).await
}
