use shared::error::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned {status}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        code: Option<ErrorCode>,
        message: String,
    },
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("customer api is unavailable: {0}")]
    Unavailable(String),
}

impl ClientError {
    pub fn api(endpoint: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            endpoint: endpoint.into(),
            status,
            code: None,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status, code, .. } => {
                *status == 404 || matches!(code, Some(ErrorCode::NotFound))
            }
            _ => false,
        }
    }
}
