//! HTML pages

use askama::Template;

use super::actions::{self, send_custom_email, send_email, send_welcome_email};

/// Application name shown on pages and in the welcome email
pub const APP_NAME: &str = "MyApp";

/// Where the form actions redirect after a successful send
pub const SUCCESS_PATH: &str = "/success";

/// A form input
#[derive(Debug)]
pub struct PageField {
    /// Form field name
    pub name: &'static str,

    /// Label shown next to the input
    pub label: &'static str,

    /// `type` attribute of the input
    pub input_type: &'static str,

    /// Render a textarea instead of an input
    pub multiline: bool,
}

/// A form posting to one of the actions
#[derive(Debug)]
pub struct PageForm {
    /// HTML id prefix
    pub id: &'static str,

    /// Heading above the form
    pub title: &'static str,

    /// The action URL
    pub action: String,

    /// The inputs
    pub fields: &'static [PageField],
}

const RECIPIENT: PageField = PageField {
    name: "recipient",
    label: "Recipient",
    input_type: "email",
    multiline: false,
};

const SUBJECT: PageField = PageField {
    name: "subject",
    label: "Subject",
    input_type: "text",
    multiline: false,
};

const SEND_EMAIL_FIELDS: &[PageField] = &[
    RECIPIENT,
    SUBJECT,
    PageField {
        name: "message",
        label: "Message",
        input_type: "text",
        multiline: true,
    },
];

const SEND_CUSTOM_EMAIL_FIELDS: &[PageField] = &[
    RECIPIENT,
    SUBJECT,
    PageField {
        name: "message",
        label: "HTML",
        input_type: "text",
        multiline: true,
    },
];

const SEND_WELCOME_EMAIL_FIELDS: &[PageField] = &[
    RECIPIENT,
    PageField {
        name: "name",
        label: "Name",
        input_type: "text",
        multiline: false,
    },
];

/// The home page, with one form per action
#[derive(Debug, Template)]
#[template(path = "pages/index.html")]
pub struct IndexTemplate {
    app_name: &'static str,
    forms: Vec<PageForm>,
}

impl IndexTemplate {
    fn new() -> Self {
        let action = |path: &str| format!("{}{path}", actions::PATH_PREFIX);

        Self {
            app_name: APP_NAME,
            forms: vec![
                PageForm {
                    id: "send-email",
                    title: "Send a message",
                    action: action(send_email::PATH),
                    fields: SEND_EMAIL_FIELDS,
                },
                PageForm {
                    id: "send-custom-email",
                    title: "Send custom HTML",
                    action: action(send_custom_email::PATH),
                    fields: SEND_CUSTOM_EMAIL_FIELDS,
                },
                PageForm {
                    id: "send-welcome-email",
                    title: "Send the welcome email",
                    action: action(send_welcome_email::PATH),
                    fields: SEND_WELCOME_EMAIL_FIELDS,
                },
            ],
        }
    }
}

/// Shown after an email was sent
#[derive(Debug, Template)]
#[template(path = "pages/success.html")]
pub struct SuccessTemplate {
    app_name: &'static str,
}

/// Home page handler
pub async fn index() -> IndexTemplate {
    IndexTemplate::new()
}

/// Success page handler
pub async fn success() -> SuccessTemplate {
    SuccessTemplate { app_name: APP_NAME }
}
