//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{ClientError, ScreenCompletion};

pub enum UiEvent {
    Info(String),
    Connected { server_url: String },
    Completed(ScreenCompletion),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    NotFound,
    Server,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    List,
    Save,
    Delete,
    Reset,
}

impl UiErrorContext {
    pub fn for_completion(completion: &ScreenCompletion) -> Self {
        match completion {
            ScreenCompletion::Listed { .. } => UiErrorContext::List,
            ScreenCompletion::Saved(_) => UiErrorContext::Save,
            ScreenCompletion::Deleted { .. } => UiErrorContext::Delete,
            ScreenCompletion::Reset(_) => UiErrorContext::Reset,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Transport { .. } | ClientError::Unavailable(_) => {
                UiErrorCategory::Transport
            }
            ClientError::InvalidServerUrl { .. } => UiErrorCategory::Validation,
            ClientError::Api { .. } if err.is_not_found() => UiErrorCategory::NotFound,
            ClientError::Api { status, .. } if matches!(*status, 400 | 409 | 422) => {
                UiErrorCategory::Validation
            }
            ClientError::Api { status, .. } if *status >= 500 => UiErrorCategory::Server,
            ClientError::Api { .. } | ClientError::Decode { .. } => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    /// Error carried by a finished request, if it failed.
    pub fn from_completion(completion: &ScreenCompletion) -> Option<Self> {
        let context = UiErrorContext::for_completion(completion);
        completion
            .error()
            .map(|err| Self::from_client_error(context, err))
    }

    /// The backend worker could not start, so no request will reach the API.
    pub fn backend_startup(message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Transport,
            context: UiErrorContext::BackendStartup,
            message: message.into(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
