//! Authentication state.
//!
//! Kept apart from routing: the router only receives the derived
//! `is_authenticated` signal and guards routes with it. The token and the
//! `isAuth` flag are persisted by `SessionStore`; this module only holds the
//! in-memory signals.

use aula_shared::models::{AuthResponse, UserProfile};
use aula_shared::protocol::{GetProfile, Login, Signup};
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::query::QueryKey;

/// What the UI knows about the current session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    /// From the login response or the profile endpoint.
    pub user: Option<UserProfile>,
}

/// Read and write halves of the auth state, shared through context.
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// Injected into the router for its guard.
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_authenticated)
    }

    /// Whether the current user may open the instructor studio.
    pub fn can_teach_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || {
            state.with(|s| s.user.as_ref().is_some_and(|u| u.role.can_teach()))
        })
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// Restores the persisted session and loads the current user in the
/// background. A 401 on that request ends the session.
pub fn init_auth(app: &AppContext, auth: &AuthContext) {
    let session = app.session();
    if !session.is_authenticated() {
        return;
    }

    auth.set_state.set(AuthState {
        is_authenticated: true,
        user: None,
    });

    let app = *app;
    let auth = *auth;
    spawn_local(async move {
        match app.api().send(&GetProfile).await {
            Ok(user) => auth.set_state.update(|state| state.user = Some(user)),
            Err(e) if e.is_unauthorized() => {
                warn!("stored session rejected by the server");
                logout(&app, &auth);
            }
            Err(e) => warn!(error = %e, "could not load the current user"),
        }
    });
}

pub async fn login(
    app: &AppContext,
    auth: &AuthContext,
    email: String,
    password: String,
) -> ApiResult<()> {
    let response = app.api().send(&Login { email, password }).await?;
    start_session(app, auth, response);
    Ok(())
}

/// Creates the account and signs in with it.
pub async fn signup(
    app: &AppContext,
    auth: &AuthContext,
    name: String,
    email: String,
    password: String,
) -> ApiResult<()> {
    let response = app
        .api()
        .send(&Signup {
            name,
            email,
            password,
        })
        .await?;
    start_session(app, auth, response);
    Ok(())
}

fn start_session(app: &AppContext, auth: &AuthContext, response: AuthResponse) {
    app.session().sign_in(&response.token);
    info!(user = %response.user.id, role = ?response.user.role, "signed in");
    // The cache may hold data fetched for a guest or another user.
    app.cache().reset(&QueryKey::root());
    auth.set_state.set(AuthState {
        is_authenticated: true,
        user: Some(response.user),
    });
}

/// Ends the session and forgets every cached query. The cart is kept.
///
/// Navigation away from guarded pages is left to the router, which watches
/// the auth signal.
pub fn logout(app: &AppContext, auth: &AuthContext) {
    app.teardown();
    app.cache().reset(&QueryKey::root());
    auth.set_state.set(AuthState::default());
}

/// Replaces the current user after a profile update.
pub fn set_user(auth: &AuthContext, user: UserProfile) {
    auth.set_state.update(|state| state.user = Some(user));
}
