//! Session context: who is signed in.
//!
//! The stored session is read once on the client after hydration. Pages that
//! need a session call [`use_require_session`], which sends signed-out users
//! to the sign-in page.

use dioxus::prelude::*;

use crate::app::browser::page_origin;
use crate::app::Route;
use crate::client::{ApiClient, ApiError};
use crate::session::Session;

/// Global session state shared via context
#[derive(Clone, Copy)]
pub struct SessionContext {
    session: Signal<Session>,
    /// Whether the stored session has been read (never true during SSR)
    loaded: Signal<bool>,
}

impl SessionContext {
    pub fn is_loaded(&self) -> bool {
        (self.loaded)()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.session.read().user_id
    }

    /// API client carrying the current token
    pub fn client(&self) -> ApiClient {
        ApiClient::new(page_origin()).with_token(self.session.read().token.clone())
    }

    /// Store a fresh session after sign in
    pub fn sign_in(&self, token: String, user_id: Option<i64>) {
        let session = Session::new(token, user_id);
        session.save();
        let mut current = self.session;
        current.set(session);
        tracing::info!("Signed in (user {:?})", user_id);
    }

    pub fn sign_out(&self) {
        Session::clear();
        let mut current = self.session;
        current.set(Session::default());
    }

    /// Drop the session when the backend no longer accepts it.
    /// Returns whether it did.
    pub fn expire_on(&self, err: &ApiError) -> bool {
        if err.requires_sign_in() {
            tracing::info!("Session rejected by backend: {}", err);
            self.sign_out();
            return true;
        }
        false
    }
}

/// Initialize session context provider - call once at app root
pub fn use_session_provider() {
    let session = use_signal(Session::default);
    let loaded = use_signal(|| false);

    let ctx = SessionContext { session, loaded };
    use_context_provider(|| ctx);

    // Client-side only: read localStorage after hydration
    #[cfg(target_arch = "wasm32")]
    {
        let mut session = session;
        let mut loaded = loaded;
        use_effect(move || {
            session.set(Session::load());
            loaded.set(true);
        });
    }
}

/// Get session context - use in any component
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}

/// Session for pages behind sign in; redirects to /login once it is known to be missing
pub fn use_require_session() -> SessionContext {
    let session = use_session();
    let navigator = use_navigator();

    use_effect(move || {
        if session.is_loaded() && !session.is_authenticated() {
            navigator.replace(Route::Login {});
        }
    });

    session
}
