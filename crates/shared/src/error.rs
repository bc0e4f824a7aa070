use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Validation,
    Conflict,
    Internal,
    Unavailable,
}

/// JSON error body returned by the customer API on non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_uses_snake_case_on_the_wire() {
        let body = serde_json::to_string(&ApiError::new(ErrorCode::NotFound, "customer 5 not found"))
            .expect("serialize");
        assert_eq!(body, r#"{"code":"not_found","message":"customer 5 not found"}"#);
    }
}
