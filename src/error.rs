use std::fmt;

use thiserror::Error;

/// A single rejected form field, shown inline next to the input named `field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Email not registered")]
    UnknownEmail,

    #[error("Wrong password")]
    WrongPassword,

    #[error("Invalid input: {}", join_fields(.0))]
    ValidationFailed(Vec<FieldError>),

    #[error("Password confirmation does not match")]
    PasswordMismatch,

    #[error("Terms of use must be accepted")]
    TermsNotAccepted,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Recipe {0} not found")]
    RecipeNotFound(i64),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        AppError::ValidationFailed(vec![FieldError::new(field, message)])
    }

    /// Field errors to surface inline. Errors not tied to a single input are
    /// reported under `"form"`.
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            AppError::ValidationFailed(errors) => errors.clone(),
            AppError::PasswordMismatch => vec![FieldError::new("confirmPassword", self.to_string())],
            AppError::TermsNotAccepted => vec![FieldError::new("agreeTerms", self.to_string())],
            other => vec![FieldError::new("form", other.to_string())],
        }
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type AppResult<T> = Result<T, AppError>;
