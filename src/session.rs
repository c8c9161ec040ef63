//! Signed-in session: bearer token and user id.
//!
//! These two values are the only client state that outlives a page load.
//! In the browser they live in `localStorage`; on the server the session is
//! always empty.

pub const TOKEN_KEY: &str = "authToken";
pub const USER_ID_KEY: &str = "userId";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user_id: Option<i64>,
}

impl Session {
    pub fn new(token: impl Into<String>, user_id: Option<i64>) -> Self {
        let token = token.into();
        Self {
            token: (!token.trim().is_empty()).then_some(token),
            user_id,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Build from raw stored strings; unparsable ids are dropped
    pub fn from_stored(token: Option<String>, user_id: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            user_id: user_id.and_then(|id| id.trim().parse().ok()),
        }
    }

    /// Read the stored session
    pub fn load() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = local_storage();
            let get = |key: &str| {
                storage
                    .as_ref()
                    .and_then(|s| s.get_item(key).ok().flatten())
            };
            Self::from_stored(get(TOKEN_KEY), get(USER_ID_KEY))
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::default()
        }
    }

    /// Persist this session, replacing whatever was stored
    pub fn save(&self) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(storage) = local_storage() else {
                return;
            };
            let _ = match &self.token {
                Some(token) => storage.set_item(TOKEN_KEY, token),
                None => storage.remove_item(TOKEN_KEY),
            };
            let _ = match self.user_id {
                Some(id) => storage.set_item(USER_ID_KEY, &id.to_string()),
                None => storage.remove_item(USER_ID_KEY),
            };
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::debug!("Session not persisted outside the browser: {:?}", self.user_id);
        }
    }

    /// Forget the stored session
    pub fn clear() {
        Session::default().save();
        tracing::info!("Session cleared");
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}
