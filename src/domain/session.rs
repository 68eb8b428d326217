use serde::{Deserialize, Serialize};
use url::Url;

use reybex_api_types::{EntityId, LoginResponse, UserProfile};

const FALLBACK_DISPLAY_NAME: &str = "Kullanıcı";
const FALLBACK_INITIAL: &str = "U";

/// Authenticated session persisted between invocations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub login: LoginResponse,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn new(token: impl Into<String>, login: LoginResponse) -> Self {
        Self {
            token: token.into(),
            login,
            user: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// The login payload's `userId`, falling back to the profile id.
    pub fn user_id(&self) -> Option<&EntityId> {
        self.login
            .user_id
            .as_ref()
            .or_else(|| self.user.as_ref().and_then(|user| user.id.as_ref()))
    }

    pub fn display_name(&self) -> String {
        display_name(self.user.as_ref())
    }

    pub fn initials(&self) -> String {
        initials(self.user.as_ref())
    }
}

/// `firstname surname` trimmed, else the username, else a generic label.
pub fn display_name(user: Option<&UserProfile>) -> String {
    let Some(user) = user else {
        return FALLBACK_DISPLAY_NAME.to_string();
    };

    let full = format!(
        "{} {}",
        user.firstname.as_deref().unwrap_or_default(),
        user.surname.as_deref().unwrap_or_default()
    );
    let full = full.trim();
    if !full.is_empty() {
        return full.to_string();
    }

    user.username
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_DISPLAY_NAME)
        .to_string()
}

pub fn initials(user: Option<&UserProfile>) -> String {
    user.and_then(|user| {
        [user.firstname.as_deref(), user.username.as_deref()]
            .into_iter()
            .flatten()
            .find_map(|name| name.trim().chars().next())
    })
    .map(|first| first.to_uppercase().collect())
    .unwrap_or_else(|| FALLBACK_INITIAL.to_string())
}

/// `{file_base}/{file.id}` when the profile carries an avatar.
pub fn avatar_url(user: Option<&UserProfile>, file_base: &Url) -> Option<Url> {
    let id = user?.file.as_ref()?.id.as_ref()?;
    file_base.join(id.as_str()).ok()
}
