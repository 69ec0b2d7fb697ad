use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Index {index} is out of range for {kind}")]
    UnknownIndex { kind: &'static str, index: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Status,
    MalformedBody,
    Misuse,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Status { .. } => ErrorKind::Status,
            ApiError::Json(_) => ErrorKind::MalformedBody,
            ApiError::InvalidUrl(_)
            | ApiError::UnknownIndex { .. }
            | ApiError::InvalidArgument(_) => ErrorKind::Misuse,
        }
    }

    /// HTTP status when one is known, otherwise `0`.
    pub fn code(&self) -> u16 {
        match self {
            ApiError::Status { status, .. } => *status,
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()).unwrap_or(0),
            _ => 0,
        }
    }

    /// Diagnostic text for this failure.
    ///
    /// For status errors the body is cut at its first `{`, since the server
    /// may put non-JSON noise in front of the payload. A body without `{` is
    /// returned whole; an empty body falls back to the error's display text.
    pub fn message(&self) -> String {
        match self {
            ApiError::Status { body, .. } if !body.is_empty() => match body.find('{') {
                Some(start) => body[start..].to_string(),
                None => body.clone(),
            },
            other => other.to_string(),
        }
    }

    /// The string a caller of the uniform-string dispatcher receives.
    pub fn to_legacy_string(&self, debug: bool) -> String {
        if debug {
            self.message()
        } else {
            self.code().to_string()
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status { status: 401, .. })
    }

    pub fn suggestion(&self) -> Option<&str> {
        match self {
            ApiError::Status { status: 401, .. } => {
                Some("Verify your token using: edusoho auth whoami")
            }
            ApiError::Status { status: 403, .. } => {
                Some("The current account lacks permission for this resource")
            }
            ApiError::Status { status: 404, .. } => Some("Check if the resource ID is correct"),
            ApiError::Transport(_) => Some("Check your network connection and the base URL"),
            ApiError::UnknownIndex { .. } => Some("Review the enum index passed to the call"),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, body: &str) -> ApiError {
        ApiError::Status {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_message_strips_prefix_before_json() {
        let err = status(422, r#"prefix{"error":"bad"}"#);
        assert_eq!(err.message(), r#"{"error":"bad"}"#);
    }

    #[test]
    fn test_message_without_brace_keeps_body() {
        let err = status(500, "Internal Server Error");
        assert_eq!(err.message(), "Internal Server Error");
    }

    #[test]
    fn test_message_empty_body_uses_display() {
        let err = status(502, "");
        assert_eq!(err.message(), "Server responded with 502: ");
    }

    #[test]
    fn test_legacy_string_modes() {
        let err = status(422, r#"prefix{"error":"bad"}"#);
        assert_eq!(err.to_legacy_string(true), r#"{"error":"bad"}"#);
        assert_eq!(err.to_legacy_string(false), "422");
    }

    #[test]
    fn test_misuse_errors_have_zero_code() {
        let err = ApiError::UnknownIndex {
            kind: "target type",
            index: 7,
        };
        assert_eq!(err.code(), 0);
        assert_eq!(err.kind(), ErrorKind::Misuse);
        assert_eq!(err.to_string(), "Index 7 is out of range for target type");
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(status(404, "").kind(), ErrorKind::Status);
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ApiError::from(json_err).kind(), ErrorKind::MalformedBody);
    }

    #[test]
    fn test_status_helpers() {
        assert!(status(404, "").is_not_found());
        assert!(status(401, "").is_unauthorized());
        assert!(!status(500, "").is_not_found());
        assert!(status(401, "").suggestion().is_some());
        assert!(status(500, "").suggestion().is_none());
    }
}
