//! Send the welcome email

use axum::{
    extract::{rejection::FormRejection, State},
    response::Redirect,
    Form,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::communication::mailer::{Mailer, MessageBody, MessageRequest, TemplateRef},
    infrastructure::http::{errors::ApiError, handlers::pages::APP_NAME, state::AppState},
};

use super::{dispatch, present};

/// Route of this action, relative to the actions prefix
pub const PATH: &str = "/send-welcome-email";

/// Template used for the message body
pub const TEMPLATE: &str = "welcome";

/// Send welcome email form
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SendWelcomeEmailForm {
    /// The recipient's email address
    #[schema(example = "email@example.com")]
    pub recipient: Option<String>,

    /// The name to greet the recipient with
    #[schema(example = "Ada")]
    pub name: Option<String>,
}

/// The welcome email's subject line
pub fn subject() -> String {
    format!("Welcome to {APP_NAME}!")
}

/// Send the welcome email to the submitted recipient
#[utoipa::path(
    post,
    operation_id = "send_welcome_email",
    tag = "Actions",
    path = "/actions/send-welcome-email",
    request_body(content = SendWelcomeEmailForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = StatusCode::SEE_OTHER, description = "Email sent, redirects to /success"),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Missing required fields", body = ErrorResponse, example = json!({ "error": "Missing required fields" })),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "The email could not be sent", body = ErrorResponse, example = json!({ "error": "Failed to send email" })),
    )
)]
pub async fn handler<M: Mailer>(
    State(state): State<AppState<M>>,
    form: Result<Form<SendWelcomeEmailForm>, FormRejection>,
) -> Result<Redirect, ApiError> {
    let Form(form) = form?;

    let (Some(to), Some(name)) = (present(form.recipient), present(form.name)) else {
        return Err(ApiError::missing_fields());
    };

    let body = MessageBody::Template(TemplateRef::new(TEMPLATE, [("name", name)]));
    let request = MessageRequest::new(&to, &subject(), body)?;

    dispatch(&state, request).await
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use testresult::TestResult;

    use crate::{
        domain::communication::mailer::{tests::MockMailer, MessageBody, SentMessage, TemplateRef},
        infrastructure::http::{errors::ErrorResponse, router, state::tests::test_state},
    };

    const URL: &str = "/actions/send-welcome-email";

    #[tokio::test]
    async fn test_send_welcome_email_success() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send()
            .times(1)
            .withf(|request| {
                request.to().as_str() == "email@example.com"
                    && request.subject() == "Welcome to MyApp!"
                    && request.body()
                        == &MessageBody::Template(TemplateRef::new("welcome", [("name", "Ada")]))
            })
            .returning(|_| {
                Ok(SentMessage {
                    message_id: "<id@example.com>".to_string(),
                    preview_url: None,
                })
            });

        let response = TestServer::new(router(test_state(Some(mailer))))?
            .post(URL)
            .form(&[("recipient", "email@example.com"), ("name", "Ada")])
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/success");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_welcome_email_ignores_subject_field() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send()
            .times(1)
            .withf(|request| request.subject() == "Welcome to MyApp!")
            .returning(|_| {
                Ok(SentMessage {
                    message_id: "<id@example.com>".to_string(),
                    preview_url: None,
                })
            });

        let response = TestServer::new(router(test_state(Some(mailer))))?
            .post(URL)
            .form(&[
                ("recipient", "email@example.com"),
                ("name", "Ada"),
                ("subject", "Something else"),
            ])
            .await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);

        Ok(())
    }

    #[tokio::test]
    async fn test_send_welcome_email_missing_name() -> TestResult {
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);

        let response = TestServer::new(router(test_state(Some(mailer))))?
            .post(URL)
            .form(&[("recipient", "email@example.com"), ("name", "")])
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json.error, "Missing required fields");

        Ok(())
    }
}
