//! Client-side error type.
//!
//! Every failure of an API call ends up here, whether it happened while
//! building the request, on the wire, on the server, or while decoding the
//! response. Errors are `Clone` because a single failed fetch is handed to
//! every consumer that joined it.

use serde::Deserialize;
use thiserror::Error;

/// Shown to the user when the server did not send a usable message.
pub const FALLBACK_ERROR_MESSAGE: &str = "Ocurrió un error inesperado. Inténtalo de nuevo.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request could not be built (serialization, header encoding).
    #[error("request could not be built: {0}")]
    Request(String),

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("server responded with status {status}")]
    Status {
        status: u16,
        /// Message extracted from the server's error body, if any.
        message: Option<String>,
    },

    /// The response body did not match the expected schema.
    #[error("response could not be decoded: {0}")]
    Decode(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Builds a status error from the raw response body.
    pub fn from_status(status: u16, body: &str) -> Self {
        ApiError::Status {
            status,
            message: server_message(body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// The message to show in the UI: the server's own message when it sent
    /// one, otherwise a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => FALLBACK_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MessageField {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: MessageField,
}

/// Extracts `message` from an error body. Validation errors send a list of
/// messages; they are joined into one line.
fn server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match parsed.message {
        MessageField::One(message) => message,
        MessageField::Many(messages) => messages.join(", "),
    };
    let message = message.trim().to_string();
    (!message.is_empty()).then_some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_keeps_server_message() {
        let err = ApiError::from_status(409, r#"{"statusCode":409,"message":"El cupón ya existe"}"#);
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.user_message(), "El cupón ya existe");
    }

    #[test]
    fn validation_messages_are_joined() {
        let err = ApiError::from_status(400, r#"{"message":["email inválido","password corto"]}"#);
        assert_eq!(err.user_message(), "email inválido, password corto");
    }

    #[test]
    fn non_json_body_falls_back_to_generic_message() {
        let err = ApiError::from_status(502, "Bad Gateway");
        assert_eq!(
            err,
            ApiError::Status {
                status: 502,
                message: None
            }
        );
        assert_eq!(err.user_message(), FALLBACK_ERROR_MESSAGE);
    }

    #[test]
    fn network_errors_use_fallback() {
        let err = ApiError::Network("offline".to_string());
        assert_eq!(err.user_message(), FALLBACK_ERROR_MESSAGE);
        assert!(!err.is_unauthorized());
    }
}
