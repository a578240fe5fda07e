use thiserror::Error;

use crate::forms::FormError;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(FormError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// 页面内提示条展示的文字
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            ClientError::Status { message, .. } if !message.is_empty() => message.clone(),
            ClientError::Status { status, .. } => format!("Request failed ({})", status),
            ClientError::Unauthorized => "Please sign in to continue.".to_string(),
            ClientError::NotFound => "The requested item could not be found.".to_string(),
            ClientError::Decode(_) => "Unexpected response from the server.".to_string(),
            ClientError::Validation(e) => e.message.clone(),
            ClientError::Storage(_) => "Could not access local storage.".to_string(),
            ClientError::Config(msg) => msg.clone(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

impl From<FormError> for ClientError {
    fn from(e: FormError) -> Self {
        ClientError::Validation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors_collapse_to_generic_message() {
        let err = ClientError::Network("connection refused".into());
        assert!(err.user_message().starts_with("Network error"));
    }

    #[test]
    fn test_status_prefers_backend_message() {
        let err = ClientError::Status {
            status: 409,
            message: "Email already registered".into(),
        };
        assert_eq!(err.user_message(), "Email already registered");

        let err = ClientError::Status {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.user_message(), "Request failed (500)");
    }
}
