//! Error types shared by the data model, the renderer and the entry points.

use thiserror::Error;

/// Problems with the three input documents. Always fatal to the request and
/// raised before any layout work begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("`{0}` must be a JSON array")]
    NotAnArray(&'static str),
    #[error("`{0}` must be a JSON object")]
    NotAnObject(&'static str),
    #[error("search window starts ({start}) after it ends ({end})")]
    InvertedWindow { start: String, end: String },
    #[error("malformed JSON in `{document}`: {message}")]
    Json {
        document: &'static str,
        message: String,
    },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    /// Startup problems such as an unreadable logo or options file.
    #[error("configuration error: {0}")]
    Config(String),
    #[error("render error: {0}")]
    Render(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    /// HTTP status an HTTP front end should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ReportError::Validation(_) => 400,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_client_error() {
        let err: ReportError = ValidationError::MissingField("plate").into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_string(),
            "validation error: missing required field `plate`"
        );
    }

    #[test]
    fn everything_else_is_server_error() {
        assert_eq!(ReportError::Config("logo".into()).status_code(), 500);
        assert_eq!(ReportError::Render("oom".into()).status_code(), 500);
    }
}
