//! Message template errors.

/// Failure to compile or render the alert template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template referenced a missing field or a helper failed.
    #[error("Failed to render alert message: {0}")]
    RenderError(#[from] handlebars::RenderError),

    /// The template does not compile.
    #[error("Invalid message template: {0}")]
    RegistrationError(#[from] handlebars::TemplateError),
}
