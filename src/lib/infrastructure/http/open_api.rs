//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::{
    errors::ErrorResponse,
    handlers::{actions::*, v1::*},
};

/// OpenAPI description of the form actions and system endpoints
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Form Mailer"),
    paths(
        send_email::handler,
        send_custom_email::handler,
        send_welcome_email::handler,
        uptime::handler
    ),
    components(schemas(
        send_email::SendEmailForm,
        send_custom_email::SendCustomEmailForm,
        send_welcome_email::SendWelcomeEmailForm,
        uptime::UptimeResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use serde_json::Value;
    use testresult::TestResult;

    use crate::infrastructure::http::{router, state::tests::test_state};

    #[tokio::test]
    async fn test_openapi_lists_actions() -> TestResult {
        let response = TestServer::new(router(test_state(None)))?
            .get("/api/v1/openapi.json")
            .await;

        response.assert_status_ok();

        let json = response.json::<Value>();
        let paths = &json["paths"];

        assert!(paths["/actions/send-email"]["post"].is_object());
        assert!(paths["/actions/send-custom-email"]["post"].is_object());
        assert!(paths["/actions/send-welcome-email"]["post"].is_object());
        assert!(paths["/api/v1/uptime"]["get"].is_object());

        Ok(())
    }
}
