//! Login, logout and access to the stored session.

use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use reybex_api_types::{EntityId, LoginRequest};

use crate::{
    application::{
        error::AppError,
        tracker::{Clock, TrackerController},
    },
    domain::session::{Session, avatar_url},
    infra::{
        http::{ClientError, ReybexClient},
        session_store::SessionStore,
    },
};

const TOKEN_MISSING: &str = "Token not found in response";
const CONNECTION_FAILED: &str = "could not reach the server; check your network connection";
const LOGIN_FAILED: &str = "login failed; please try again";
const USER_ID_MISSING: &str = "user id not found";

/// Who is logged in, as printed by `whoami`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user_id: Option<EntityId>,
    pub display_name: String,
    pub initials: String,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SessionService {
    client: ReybexClient,
    store: SessionStore,
    file_base_url: Url,
}

impl SessionService {
    pub fn new(client: ReybexClient, store: SessionStore, file_base_url: Url) -> Self {
        Self {
            client,
            store,
            file_base_url,
        }
    }

    pub async fn current(&self) -> Result<Option<Session>, AppError> {
        Ok(self.store.load().await?)
    }

    pub async fn is_authenticated(&self) -> Result<bool, AppError> {
        Ok(self.current().await?.is_some())
    }

    /// The stored session, or [`AppError::NotAuthenticated`].
    pub async fn require(&self) -> Result<Session, AppError> {
        self.current().await?.ok_or(AppError::NotAuthenticated)
    }

    /// A client that authenticates as `session`.
    pub fn client_for(&self, session: &Session) -> ReybexClient {
        self.client.clone().with_token(Some(session.token.clone()))
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AppError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .client
            .login(&request)
            .await
            .map_err(login_failure)?;

        let Some(token) = response.token.clone().filter(|token| !token.is_empty()) else {
            return Err(AppError::login(TOKEN_MISSING));
        };

        let mut session = Session::new(token, response);
        if let Some(user_id) = session.login.user_id.clone() {
            match self.client_for(&session).user(&user_id).await {
                Ok(profile) => session.user = Some(profile),
                Err(err) => warn!(
                    target = "reybex::session",
                    user_id = %user_id,
                    error = %err,
                    "Failed to fetch user profile after login"
                ),
            }
        }

        self.store.save(&session).await?;
        info!(
            target = "reybex::session",
            user_id = session.user_id().map(EntityId::as_str),
            path = %self.store.path().display(),
            "Logged in"
        );
        Ok(session)
    }

    /// Stop tracking, tell the backend, and forget the session. Backend
    /// failures do not keep the local session alive.
    pub async fn logout<C: Clock>(&self, tracker: &TrackerController<C>) -> Result<(), AppError> {
        tracker.stop().await;

        if let Some(session) = self.current().await? {
            if let Err(err) = self.client_for(&session).logout().await {
                warn!(
                    target = "reybex::session",
                    error = %err,
                    "Backend logout failed; clearing local session anyway"
                );
            }
        }

        self.store.clear().await?;
        info!(
            target = "reybex::session",
            path = %self.store.path().display(),
            "Logged out"
        );
        Ok(())
    }

    /// Clear the stored session when `error` is a rejected credential, then
    /// hand the error back.
    pub async fn expire_on_unauthorized(&self, error: AppError) -> AppError {
        if error.is_unauthorized() {
            if let Err(clear_err) = self.store.clear().await {
                warn!(
                    target = "reybex::session",
                    error = %clear_err,
                    "Failed to clear expired session"
                );
            } else {
                info!(target = "reybex::session", "Session expired; cleared");
            }
        }
        error
    }

    pub fn profile(&self, session: &Session) -> ProfileView {
        let user = session.user.as_ref();
        ProfileView {
            user_id: session.user_id().cloned(),
            display_name: session.display_name(),
            initials: session.initials(),
            username: user.and_then(|user| user.username.clone()),
            avatar_url: avatar_url(user, &self.file_base_url).map(String::from),
        }
    }
}

/// The signed-in user's id; endpoints scoped to the user cannot run without it.
pub fn require_user_id(session: &Session) -> Result<&EntityId, AppError> {
    session
        .user_id()
        .ok_or_else(|| AppError::validation(USER_ID_MISSING))
}

fn login_failure(err: ClientError) -> AppError {
    if let Some(message) = err.server_message() {
        return AppError::login(message);
    }
    if err.is_connection() {
        return AppError::login(CONNECTION_FAILED);
    }
    warn!(target = "reybex::session", error = %err, "Login request failed");
    AppError::login(LOGIN_FAILED)
}
