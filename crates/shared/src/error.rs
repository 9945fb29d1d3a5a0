use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    NotFound,
    Validation,
    RateLimited,
    Unavailable,
    Internal,
}

/// Error raised by media service implementations behind the gateway.
#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct ApiException {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiException {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exception_display_includes_code_and_message() {
        let err = ApiException::new(ErrorCode::NotFound, "playlist p9");
        assert_eq!(err.to_string(), "NotFound: playlist p9");
    }

    #[test]
    fn codes_serialize_in_snake_case() {
        assert_eq!(
            serde_json::to_value(ErrorCode::RateLimited).expect("json"),
            "rate_limited"
        );
    }
}
