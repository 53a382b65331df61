//! Client error types

use academy_common::FieldError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Checkout called with no programs; no request was sent
    #[error("Cart is empty")]
    EmptyCart,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Portal answered with a non-success status
    #[error("Portal returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Fields rejected locally or by the portal (422)
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("Chat poller has stopped")]
    PollerStopped,
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{} {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<academy_common::Error> for ClientError {
    fn from(err: academy_common::Error) -> Self {
        match err {
            academy_common::Error::Validation(fields) => ClientError::Validation(fields),
            other => ClientError::Validation(vec![FieldError::new("request", other.to_string())]),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let err = ClientError::Validation(vec![
            FieldError::new("name", "is required"),
            FieldError::new("email", "is not a valid address"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: name is required; email is not a valid address"
        );
    }
}
