use std::error::Error as StdError;

use thiserror::Error;

use crate::{
    config::LoadError,
    domain::error::DomainError,
    infra::{error::InfraError, http::ClientError},
};

/// Error message chain collected by walking `source()`.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { source, messages }
    }

    /// Messages joined outermost first, skipping repeats from transparent wrappers.
    pub fn joined(&self) -> String {
        let mut out: Vec<&str> = Vec::with_capacity(self.messages.len());
        for message in &self.messages {
            if out.last() != Some(&message.as_str()) {
                out.push(message);
            }
        }
        out.join(": ")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("failed to load configuration: {0}")]
    Config(#[from] LoadError),
    #[error("not logged in; run `reybex login` first")]
    NotAuthenticated,
    #[error("login failed: {0}")]
    Login(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn login(message: impl Into<String>) -> Self {
        Self::Login(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Whether the backend rejected the stored credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Client(ClientError::Unauthorized { .. }))
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_error("application::error::AppError", self)
    }
}
