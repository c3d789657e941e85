//! Errors seen by the views.

use thiserror::Error;

use crate::views::form::FormError;

/// A call through the gateway did not produce the expected result.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success status; `body` is the raw upstream text.
    #[error("Error {status}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid gateway URL `{0}`")]
    InvalidUrl(String),
}

impl ApiError {
    /// Message shown on a form: the upstream body text when there is one.
    pub fn form_message(&self) -> String {
        match self {
            ApiError::Status { body, .. } if !body.trim().is_empty() => body.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Why a create or save did not go through.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] FormError),

    #[error(transparent)]
    Rejected(#[from] ApiError),

    /// No record is loaded to save against.
    #[error("no client loaded")]
    NotLoaded,
}

impl SubmitError {
    pub fn form_message(&self) -> String {
        match self {
            SubmitError::Rejected(e) => e.form_message(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_message_prefers_body() {
        let err = ApiError::Status {
            status: 409,
            body: "email already used".into(),
        };
        assert_eq!(err.form_message(), "email already used");
        assert_eq!(err.to_string(), "Error 409");

        let err = ApiError::Status {
            status: 500,
            body: "  ".into(),
        };
        assert_eq!(err.form_message(), "Error 500");
    }

    #[test]
    fn test_not_found() {
        let err = ApiError::Status {
            status: 404,
            body: String::new(),
        };
        assert!(err.is_not_found());
        assert!(!ApiError::InvalidUrl("x".into()).is_not_found());
    }

    #[test]
    fn test_submit_error_messages() {
        assert_eq!(
            SubmitError::from(FormError::MissingName).form_message(),
            "nom and prenom are required"
        );
        let rejected = SubmitError::from(ApiError::Status {
            status: 400,
            body: "bad".into(),
        });
        assert_eq!(rejected.form_message(), "bad");
    }
}
