//! Create/edit form state and its local validation.
//!
//! Checks run before anything is sent: both names non-blank, email (when
//! given) shaped like `local@domain.tld`, telephone at most 30 characters.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::views::model::{Client, ClientPayload};

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Errors surfaced at form level. The first failing rule wins.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("nom and prenom are required")]
    MissingName,

    #[error("invalid email")]
    InvalidEmail,

    #[error("telephone too long")]
    TelephoneTooLong,

    #[error("validation errors: {0}")]
    Validation(ValidationErrors),
}

impl From<ValidationErrors> for FormError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors.field_errors();
        if fields.contains_key("nom") || fields.contains_key("prenom") {
            FormError::MissingName
        } else if fields.contains_key("email") {
            FormError::InvalidEmail
        } else if fields.contains_key("telephone") {
            FormError::TelephoneTooLong
        } else {
            FormError::Validation(errors)
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn optional_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || EMAIL_REGEX.is_match(value) {
        return Ok(());
    }
    Err(ValidationError::new("email"))
}

/// Raw form inputs, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ClientForm {
    #[validate(custom(function = "not_blank"))]
    pub nom: String,
    #[validate(custom(function = "not_blank"))]
    pub prenom: String,
    #[validate(custom(function = "optional_email"))]
    pub email: String,
    #[validate(length(max = 30))]
    pub telephone: String,
}

impl ClientForm {
    /// Form defaults taken from a stored record (`null` becomes empty).
    pub fn from_client(client: &Client) -> Self {
        Self {
            nom: client.nom.clone(),
            prenom: client.prenom.clone(),
            email: client.email.clone().unwrap_or_default(),
            telephone: client.telephone.clone().unwrap_or_default(),
        }
    }

    /// Validate and build the payload to submit.
    pub fn check(&self) -> Result<ClientPayload, FormError> {
        self.validate()?;
        Ok(self.to_payload())
    }

    /// Trimmed payload; blank optional fields become `null`.
    pub fn to_payload(&self) -> ClientPayload {
        fn optional(value: &str) -> Option<String> {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        }

        ClientPayload {
            nom: self.nom.trim().to_string(),
            prenom: self.prenom.trim().to_string(),
            email: optional(&self.email),
            telephone: optional(&self.telephone),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
