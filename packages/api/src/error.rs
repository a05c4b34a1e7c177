//! Error taxonomy shared by every backend binding.

/// Failure of a client operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Required form fields are empty. Raised locally; no request was made.
    #[error("missing required fields: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Missing, expired or rejected bearer token.
    #[error("authentication required: {0}")]
    Auth(String),

    /// The request could not complete.
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response.
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// 2xx response whose body could not be decoded.
    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn auth(message: impl Into<String>) -> Self {
        ApiError::Auth(message.into())
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        ApiError::Server {
            status,
            message: message.into(),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Server { status: 404, .. })
    }

    /// The message to show a user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Validation(_) => "Please fill all required fields.".to_string(),
            ApiError::Auth(message) | ApiError::Server { message, .. } => message.clone(),
            ApiError::Network(_) => "Network error".to_string(),
            ApiError::Decode(_) => "Unexpected response from server".to_string(),
            ApiError::Config(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        assert_eq!(
            ApiError::Network("connection refused".into()).user_message(),
            "Network error"
        );
        assert_eq!(
            ApiError::server(400, "a user with this email already exists").user_message(),
            "a user with this email already exists"
        );
        assert_eq!(
            ApiError::Validation(vec!["age".into()]).user_message(),
            "Please fill all required fields."
        );
    }

    #[test]
    fn test_display_lists_missing_fields() {
        let err = ApiError::Validation(vec!["full_name".into(), "age".into()]);
        assert_eq!(err.to_string(), "missing required fields: full_name, age");
    }

    #[test]
    fn test_classification() {
        assert!(ApiError::auth("expired").is_auth());
        assert!(ApiError::server(404, "Not found").is_not_found());
        assert!(!ApiError::server(500, "boom").is_not_found());
    }
}
