//! File-backed persistence for the authenticated session.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::domain::session::Session;

use super::error::InfraError;

/// Stores the session as a JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session; a missing file means no session.
    pub async fn load(&self) -> Result<Option<Session>, InfraError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(InfraError::session_store(&self.path, err.to_string())),
        };

        let session: Session = serde_json::from_slice(&bytes).map_err(|err| {
            InfraError::session_store(&self.path, format!("corrupt session file: {err}"))
        })?;

        Ok(session.is_authenticated().then_some(session))
    }

    pub async fn save(&self, session: &Session) -> Result<(), InfraError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| InfraError::session_store(parent, err.to_string()))?;
        }

        let body = serde_json::to_vec_pretty(session)
            .map_err(|err| InfraError::session_store(&self.path, err.to_string()))?;
        fs::write(&self.path, body)
            .await
            .map_err(|err| InfraError::session_store(&self.path, err.to_string()))?;

        debug!(
            target = "reybex::session",
            path = %self.path.display(),
            "Session saved"
        );
        Ok(())
    }

    /// Remove the stored session. Clearing an absent session succeeds.
    pub async fn clear(&self) -> Result<(), InfraError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(
                    target = "reybex::session",
                    path = %self.path.display(),
                    "Session cleared"
                );
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(InfraError::session_store(&self.path, err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reybex_api_types::{EntityId, LoginResponse};

    fn sample_session() -> Session {
        Session::new(
            "dG9rZW4=",
            LoginResponse {
                token: Some("dG9rZW4=".to_string()),
                user_id: Some(EntityId::from(17)),
                ..LoginResponse::default()
            },
        )
    }

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(store.load().await.expect("load").is_none());
    }

    #[tokio::test]
    async fn save_then_load_returns_same_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        let session = sample_session();
        store.save(&session).await.expect("save");
        let loaded = store.load().await.expect("load").expect("session");
        assert_eq!(loaded, session);
        assert_eq!(loaded.user_id().map(EntityId::as_str), Some("17"));
    }

    #[tokio::test]
    async fn clear_removes_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&sample_session()).await.expect("save");

        store.clear().await.expect("clear");
        assert!(!store.path().exists());
        store.clear().await.expect("clear twice");
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{not json").expect("write");

        let err = SessionStore::new(&path).load().await.expect_err("corrupt");
        assert!(matches!(err, InfraError::SessionStore { .. }));
    }
}
