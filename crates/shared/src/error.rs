use thiserror::Error;

use crate::domain::{FieldName, SubmissionStatus};

/// User-facing text shown whenever a submission could not be delivered.
pub const DELIVERY_FAILED_MESSAGE: &str =
    "Failed to send message. Please try again or email me directly.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(FieldName),
    #[error("'{0}' is not a valid email address")]
    MalformedEmail(String),
}

impl ValidationError {
    pub fn field(&self) -> FieldName {
        match self {
            ValidationError::MissingField(field) => *field,
            ValidationError::MalformedEmail(_) => FieldName::Email,
        }
    }
}

/// Failure reported by a submission transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("submission rejected: {message}")]
    Rejected { message: String },
    #[error("transport failure: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    #[error("a submission is already in flight")]
    AlreadySubmitting,
    #[error("form is locked while {0:?}")]
    Locked(SubmissionStatus),
}

impl ContactError {
    pub fn user_message(&self) -> String {
        match self {
            ContactError::Validation(err) => err.to_string(),
            ContactError::Delivery(_) => DELIVERY_FAILED_MESSAGE.to_string(),
            ContactError::AlreadySubmitting => "Sending...".to_string(),
            ContactError::Locked(_) => "Message sent, the form will reset shortly.".to_string(),
        }
    }
}
