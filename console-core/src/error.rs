use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Coarse error category exposed to callers that decide UI treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    Transport,
    Validation,
    Unknown,
}

impl ErrorKind {
    /// Short human-readable description suitable for an inline message.
    pub fn describe(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "The requested document could not be found",
            ErrorKind::Unauthorized => "Your session has expired, please sign in again",
            ErrorKind::Transport => "The document service could not be reached",
            ErrorKind::Validation => "The request was rejected as invalid",
            ErrorKind::Unknown => "Something went wrong",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Transport => "transport",
            ErrorKind::Validation => "validation",
            ErrorKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),

    #[error("Configuration error: {0}")]
    Config(anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Unauthorized(_) => ErrorKind::Unauthorized,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Unknown(_) | ApiError::Config(_) => ErrorKind::Unknown,
        }
    }

    /// Map a non-success HTTP response onto the error taxonomy.
    ///
    /// | Status | Kind |
    /// |--------|------|
    /// | 404 | `NotFound` |
    /// | 401, 403 | `Unauthorized` |
    /// | 400, 422 | `Validation` |
    /// | 502, 503, 504 | `Transport` |
    /// | anything else | `Unknown` |
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = error_message_from_body(body)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        match status {
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::Validation(message)
            }
            StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => ApiError::Transport(message),
            _ => ApiError::Unknown(message),
        }
    }
}

/// Pull a message out of `{"detail": "..."}` or `{"error": "..."}` bodies.
fn error_message_from_body(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: Option<serde_json::Value>,
        error: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match (parsed.detail, parsed.error) {
        (Some(serde_json::Value::String(detail)), _) => Some(detail),
        (Some(detail), _) if !detail.is_null() => Some(detail.to_string()),
        (_, Some(error)) => Some(error),
        _ => None,
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Unknown(format!("Failed to decode response: {}", err))
        } else if let Some(status) = err.status() {
            ApiError::from_status(status, "")
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::Config(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from_status(StatusCode::NOT_FOUND, "").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, "").kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            ApiError::from_status(StatusCode::FORBIDDEN, "").kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY, "").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, "").kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "").kind(),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn test_message_from_detail_body() {
        let err = ApiError::from_status(StatusCode::NOT_FOUND, r#"{"detail":"Document not found"}"#);
        assert_eq!(err.to_string(), "Not found: Document not found");
    }

    #[test]
    fn test_message_from_error_body() {
        let err = ApiError::from_status(StatusCode::BAD_REQUEST, r#"{"error":"bad operation"}"#);
        assert_eq!(err.to_string(), "Validation error: bad operation");
    }

    #[test]
    fn test_message_falls_back_to_status_code() {
        let err = ApiError::from_status(StatusCode::IM_A_TEAPOT, "<html>teapot</html>");
        assert_eq!(err.to_string(), "Unexpected error: HTTP 418");
    }

    #[test]
    fn test_config_error_is_unknown_kind() {
        let err = ApiError::Config(anyhow::anyhow!("missing base url"));
        assert_eq!(err.kind(), ErrorKind::Unknown);
    }
}
