use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by [`crate::api::ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: u64 },
    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected error: {0}")]
    Unknown(String),
}

impl ApiError {
    /// Transport failures and server-side errors are worth a second attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            ApiError::NotFound { .. } | ApiError::Unknown(_) => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    pub(crate) fn from_status(status: StatusCode, body: String) -> Self {
        ApiError::Status {
            status: status.as_u16(),
            body,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Unknown(format!("invalid response body: {err}"))
        } else if err.is_builder() {
            ApiError::Unknown(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_policy_covers_transport_and_server_errors() {
        assert!(ApiError::Network("refused".into()).is_retryable());
        assert!(ApiError::Status {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(!ApiError::Status {
            status: 400,
            body: String::new()
        }
        .is_retryable());
        assert!(!ApiError::NotFound {
            resource: "post",
            id: 5
        }
        .is_retryable());
    }

    #[test]
    fn not_found_message_names_resource() {
        let err = ApiError::NotFound {
            resource: "post",
            id: 5,
        };
        assert_eq!(err.to_string(), "post 5 not found");
        assert!(err.is_not_found());
    }
}
