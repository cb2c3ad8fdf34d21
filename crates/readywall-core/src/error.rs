//! Error types shared by the `ReadyWall` admin crates

use std::{error::Error as StdError, fmt, path::PathBuf};

/// Main error type for configuration, local I/O and input handling
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Configuration error
    Configuration {
        /// Error message
        message: String,
    },

    /// Serialization error
    Serialization(serde_json::Error),

    /// An image picked for upload was rejected before sending
    InvalidUpload {
        /// File that was rejected
        file: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// A value typed by the user could not be interpreted
    InvalidInput {
        /// Field the value belongs to
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// Other error
    Other(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Configuration { message } => write!(f, "Configuration error: {message}"),
            Self::Serialization(err) => write!(f, "Serialization error: {err}"),
            Self::InvalidUpload { file, reason } => {
                write!(f, "{} cannot be uploaded: {reason}", file.display())
            }
            Self::InvalidInput { field, message } => write!(f, "Invalid {field}: {message}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    #[test]
    fn test_io_error_conversion() {
        let app_error = Error::from(io::Error::new(io::ErrorKind::NotFound, "missing"));

        assert!(matches!(app_error, Error::Io(_)));
        assert!(app_error.to_string().contains("I/O error"));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_configuration_error() {
        let error = Error::Configuration {
            message: "gateway.base_url must be an http(s) URL".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Configuration error: gateway.base_url must be an http(s) URL"
        );
        assert!(error.source().is_none());
    }

    #[test]
    fn test_invalid_upload_error() {
        let error = Error::InvalidUpload {
            file: PathBuf::from("/tmp/brochure.pdf"),
            reason: "not a valid image format".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "/tmp/brochure.pdf cannot be uploaded: not a valid image format"
        );
    }

    #[test]
    fn test_invalid_input_error() {
        let error = Error::InvalidInput {
            field: "status".to_string(),
            message: "expected one of new, contacted, closed".to_string(),
        };

        assert_eq!(
            format!("{}", error),
            "Invalid status: expected one of new, contacted, closed"
        );
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let app_error = Error::from(json_error);

        assert!(matches!(app_error, Error::Serialization(_)));
        assert!(app_error.source().is_some());
    }

    #[test]
    fn test_other_error_displays_message_verbatim() {
        assert_eq!(Error::Other("boom".to_string()).to_string(), "boom");
    }
}
