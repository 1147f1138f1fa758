#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend answered with an `{"error": "..."}` payload.
    #[error("backend rejected the request: {0}")]
    Rejected(String),

    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    #[error("rate limited")]
    RateLimited,

    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// The message the backend itself supplied, if any.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected(message) if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_only_for_rejections() {
        let rejected = ClientError::Rejected("file not found".into());
        assert_eq!(rejected.backend_message(), Some("file not found"));

        let missing = ClientError::MissingField("fields");
        assert_eq!(missing.backend_message(), None);

        let status = ClientError::Status {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(status.backend_message(), None);
    }

    #[test]
    fn blank_rejection_has_no_message() {
        assert_eq!(ClientError::Rejected("  ".into()).backend_message(), None);
    }

    #[test]
    fn display_includes_status_and_body() {
        let err = ClientError::Status {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "backend returned HTTP 502: bad gateway");
    }
}
