use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session store `{path}`: {message}")]
    SessionStore { path: PathBuf, message: String },
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

impl InfraError {
    pub fn session_store(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::SessionStore {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
