use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    Internal,
}

/// Error body returned by the bills API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
#[error("{code:?} ({status}): {message}")]
pub struct ApiException {
    pub status: u16,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiException {
    pub fn new(status: u16, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Builds an exception from a status code and an optional decoded body.
    pub fn from_response(status: u16, body: Option<ApiError>) -> Self {
        match body {
            Some(body) => Self::new(status, body.code, body.message),
            None => Self::new(
                status,
                ErrorCode::from_status(status),
                format!("request failed with status {status}"),
            ),
        }
    }
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorCode::Unauthorized,
            403 => ErrorCode::Forbidden,
            404 => ErrorCode::NotFound,
            400 | 422 => ErrorCode::Validation,
            _ => ErrorCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoded_body_wins_over_status_mapping() {
        let exception = ApiException::from_response(
            500,
            Some(ApiError::new(ErrorCode::Validation, "amount is required")),
        );
        assert_eq!(exception.code, ErrorCode::Validation);
        assert_eq!(exception.message, "amount is required");
        assert_eq!(exception.status, 500);
    }

    #[test]
    fn status_only_response_maps_to_error_code() {
        assert_eq!(
            ApiException::from_response(401, None).code,
            ErrorCode::Unauthorized
        );
        assert_eq!(
            ApiException::from_response(503, None).code,
            ErrorCode::Internal
        );
    }
}
