//! Browsable documentation for the form actions

use axum::response::Html;

use crate::infrastructure::http::handlers::pages::APP_NAME;

/// Where the viewer loads the OpenAPI description from
const SPEC_URL: &str = "/api/v1/openapi.json";

/// Renders the Stoplight Elements viewer for the form actions
pub async fn handler() -> Html<String> {
    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
    <title>{APP_NAME} mail actions</title>
    <script src="https://unpkg.com/@stoplight/elements/web-components.min.js"></script>
    <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements/styles.min.css">
</head>
<body>
    <main role="main">
        <elements-api apiDescriptionUrl="{SPEC_URL}" router="hash" hideTryIt="true" />
    </main>
</body>
</html>
"#
    ))
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use testresult::TestResult;

    use crate::infrastructure::http::{router, state::tests::test_state};

    #[tokio::test]
    async fn test_docs_page_is_branded() -> TestResult {
        let response = TestServer::new(router(test_state(None)))?
            .get("/api/v1")
            .await;

        response.assert_status_ok();

        let html = response.text();

        assert!(html.contains("<title>MyApp mail actions</title>"));
        assert!(html.contains(r#"apiDescriptionUrl="/api/v1/openapi.json""#));

        Ok(())
    }
}
