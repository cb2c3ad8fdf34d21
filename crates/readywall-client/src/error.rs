//! Error types for gateway calls

use thiserror::Error;

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Shown for transport failures, where the raw error means nothing to an operator
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Default text for a 401 without a message body
pub const UNAUTHORIZED_FALLBACK: &str = "Unauthorized. Token is missing, invalid, or expired.";

/// Errors that can occur while talking to the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No token in the session; the request was never sent
    #[error("Admin token missing. Please login again.")]
    MissingToken,

    /// The gateway answered 401
    #[error("{message}")]
    Unauthorized {
        /// Server message, or a generic re-login hint
        message: String,
    },

    /// The gateway answered with a non-2xx status
    #[error("{message}")]
    Business {
        /// HTTP status code
        status: u16,
        /// Server message, or a per-operation fallback
        message: String,
    },

    /// The gateway answered 2xx but flagged the call as unsuccessful
    #[error("{message}")]
    Rejected {
        /// Server message
        message: String,
    },

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected shape
    #[error("Unexpected response while trying to {context}: {message}")]
    Decode {
        /// Operation being performed
        context: String,
        /// What was wrong with the body
        message: String,
    },

    /// The entity has no endpoint for this operation
    #[error("{entity} records cannot be {operation}")]
    Unsupported {
        /// Entity name
        entity: &'static str,
        /// Operation name, past tense
        operation: &'static str,
    },

    /// Local storage or input error
    #[error(transparent)]
    Local(#[from] readywall_core::Error),
}

impl GatewayError {
    /// Create a decode error
    pub fn decode(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Text to show the operator in a notification or inline error region
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }

    /// Whether recovering requires logging in again
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::MissingToken | Self::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_business_error_surfaces_server_message_verbatim() {
        let error = GatewayError::Business {
            status: 409,
            message: "Product with this name already exists".to_string(),
        };

        assert_eq!(error.user_message(), "Product with this name already exists");
        assert!(!error.is_auth_failure());
    }

    #[test]
    fn test_missing_token_is_an_auth_failure() {
        let error = GatewayError::MissingToken;

        assert!(error.is_auth_failure());
        assert_eq!(error.user_message(), "Admin token missing. Please login again.");
    }

    #[test]
    fn test_decode_error_names_operation() {
        let error = GatewayError::decode("fetch leads", "response has no `leads` field");

        assert_eq!(
            error.to_string(),
            "Unexpected response while trying to fetch leads: response has no `leads` field"
        );
    }

    #[test]
    fn test_unsupported_operation_message() {
        let error = GatewayError::Unsupported {
            entity: "user",
            operation: "deleted",
        };

        assert_eq!(error.to_string(), "user records cannot be deleted");
    }
}
