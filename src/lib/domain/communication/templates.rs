//! Email templates
//!
//! Templates are Handlebars files named `<name>.hbs` in a directory on disk.
//! They are read and rendered on every call; nothing is cached.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use css_inline::{CSSInliner, InlineError};
use handlebars::{Handlebars, RenderError};
use thiserror::Error;
use tracing::debug;

/// File extension of email templates
pub const TEMPLATE_EXTENSION: &str = "hbs";

/// Errors that can occur when rendering a template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No template file exists for the name
    #[error("email template \"{0}\" not found")]
    NotFound(String),

    /// The template file exists but could not be read
    #[error("could not read email template \"{name}\": {source}")]
    Io {
        /// The template name
        name: String,

        /// The underlying IO error
        source: io::Error,
    },

    /// The template could not be rendered with the given parameters
    #[error("could not render email template: {0}")]
    Render(#[from] RenderError),

    /// CSS could not be inlined into the rendered HTML
    #[error("could not inline email styles: {0}")]
    Inline(#[from] InlineError),
}

/// Renders named templates from a directory
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    dir: PathBuf,
}

impl TemplateRenderer {
    /// Creates a renderer that looks templates up in `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reads the template `name` from disk, substitutes `params` and inlines
    /// its stylesheets.
    ///
    /// `{{param}}` is HTML-escaped, `{{{param}}}` is inserted as-is. Every
    /// parameter the template references must be supplied.
    pub async fn render(
        &self,
        name: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<String, TemplateError> {
        let path = self.path_for(name)?;

        debug!("rendering email template {}", path.display());

        let source = match tokio::fs::read_to_string(&path).await {
            Ok(source) => source,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(TemplateError::NotFound(name.to_string()))
            }
            Err(source) => {
                return Err(TemplateError::Io {
                    name: name.to_string(),
                    source,
                })
            }
        };

        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        let html = handlebars.render_template(&source, params)?;

        let inliner = CSSInliner::options()
            .load_remote_stylesheets(false)
            .build();

        Ok(inliner.inline(&html)?)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, TemplateError> {
        let invalid = name.is_empty()
            || name.contains("..")
            || name.contains(['/', '\\'])
            || Path::new(name).is_absolute();

        if invalid {
            return Err(TemplateError::NotFound(name.to_string()));
        }

        Ok(self.dir.join(format!("{name}.{TEMPLATE_EXTENSION}")))
    }
}
