//! All error types for the message-format crate.
//!
//! Load-time errors abort the whole catalog load. Render-time errors abort
//! only the render call that produced them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("malformed resource `{source_name}` at line {line}: {message}")]
    MalformedResource {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("duplicate key `{key}` for locale `{locale}` in `{source_name}` at line {line}")]
    DuplicateKey {
        locale: String,
        key: String,
        source_name: String,
        line: usize,
    },

    #[error("missing key `{key}` for locale `{locale}`")]
    MissingKey { locale: String, key: String },

    #[error("malformed template at byte {position}: {reason}")]
    MalformedTemplate { position: usize, reason: String },

    #[error("unresolved placeholder `{0}`")]
    UnresolvedPlaceholder(String),

    #[error("no formatter registered for hint `{0}`")]
    UnknownFormatter(String),

    #[error("invalid locale `{0}`")]
    InvalidLocale(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("snapshot error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Creates a new malformed resource error.
    pub fn malformed_resource(
        source_name: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Error::MalformedResource {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }

    /// Creates a new malformed template error.
    pub fn malformed_template(position: usize, reason: impl Into<String>) -> Self {
        Error::MalformedTemplate {
            position,
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors raised while loading a catalog.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedResource { .. }
                | Error::DuplicateKey { .. }
                | Error::InvalidLocale(_)
                | Error::UnsupportedFormat(_)
                | Error::Io(_)
                | Error::Csv(_)
                | Error::Json(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_malformed_resource_error() {
        let error = Error::malformed_resource("en.properties", 3, "missing separator");
        assert_eq!(
            error.to_string(),
            "malformed resource `en.properties` at line 3: missing separator"
        );
    }

    #[test]
    fn test_duplicate_key_error() {
        let error = Error::DuplicateKey {
            locale: "en".to_string(),
            key: "greet".to_string(),
            source_name: "en.properties".to_string(),
            line: 7,
        };
        assert_eq!(
            error.to_string(),
            "duplicate key `greet` for locale `en` in `en.properties` at line 7"
        );
    }

    #[test]
    fn test_missing_key_error() {
        let error = Error::MissingKey {
            locale: "fr".to_string(),
            key: "greet".to_string(),
        };
        assert_eq!(error.to_string(), "missing key `greet` for locale `fr`");
    }

    #[test]
    fn test_malformed_template_error() {
        let error = Error::malformed_template(4, "unterminated placeholder");
        assert_eq!(
            error.to_string(),
            "malformed template at byte 4: unterminated placeholder"
        );
    }

    #[test]
    fn test_unresolved_placeholder_error() {
        let error = Error::UnresolvedPlaceholder("name".to_string());
        assert_eq!(error.to_string(), "unresolved placeholder `name`");
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::from(io_error);
        assert!(error.to_string().contains("I/O error"));
        assert!(error.is_load_error());
    }

    #[test]
    fn test_render_errors_are_not_load_errors() {
        let errors = vec![
            Error::malformed_template(0, "test"),
            Error::UnresolvedPlaceholder("test".to_string()),
            Error::UnknownFormatter("test".to_string()),
            Error::MissingKey {
                locale: "en".to_string(),
                key: "test".to_string(),
            },
        ];

        for error in errors {
            assert!(!error.is_load_error());
            assert!(error.to_string().contains("test"));
        }
    }

    #[test]
    fn test_error_debug() {
        let error = Error::InvalidLocale("xx_!!".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("InvalidLocale"));
        assert!(debug.contains("xx_!!"));
    }
}
