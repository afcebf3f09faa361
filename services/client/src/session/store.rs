//! services/client/src/session/store.rs
//!
//! The process-wide session: the current token and user, their persistence to
//! `SessionStorage`, and the derived authenticated flag.
//!
//! All mutations go through the named operations below (`init`, `login`,
//! `signup`, `logout`, `expire`, `refresh_user`). Observers read snapshots or
//! subscribe to the underlying watch channel.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tradevision_core::domain::{AuthResponse, LoginRequest, Session, SignupRequest, User};
use tradevision_core::ports::{
    AuthService, Notifier, PortError, PortResult, SessionStorage, TOKEN_KEY, USER_KEY,
};
use tradevision_core::route::Route;

use crate::session::guard::{guard, GuardDecision};

//=========================================================================================
// Session State
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    /// Persisted values are being read.
    Loading,
    Ready,
}

/// The externally visible authentication status, derived from phase and session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Uninitialized,
    Loading,
    Authenticated,
    Anonymous,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub session: Session,
}

impl SessionState {
    pub fn status(&self) -> AuthStatus {
        match self.phase {
            SessionPhase::Uninitialized => AuthStatus::Uninitialized,
            SessionPhase::Loading => AuthStatus::Loading,
            SessionPhase::Ready if self.session.is_authenticated() => AuthStatus::Authenticated,
            SessionPhase::Ready => AuthStatus::Anonymous,
        }
    }
}

/// Shared handle to the in-memory session.
///
/// Held by the `SessionStore` and by the 401 handler, which must be able to
/// clear the session without owning the store.
#[derive(Clone)]
pub struct SessionCell {
    tx: Arc<watch::Sender<SessionState>>,
}

impl SessionCell {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionState::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        self.tx.send_modify(f);
    }

    /// Drops the in-memory token and user. Storage is left to the caller.
    fn clear(&self) {
        self.update(|state| state.session = Session::default());
    }

    /// The 401 path: the HTTP client already cleared storage, so only
    /// memory is dropped here.
    pub fn expire(&self) {
        if self.snapshot().session.is_authenticated() {
            warn!("Session expired; clearing credentials");
        }
        self.clear();
    }
}

impl Default for SessionCell {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================================
// The Session Store
//=========================================================================================

pub struct SessionStore {
    cell: SessionCell,
    auth: Arc<dyn AuthService>,
    storage: Arc<dyn SessionStorage>,
    notifier: Arc<dyn Notifier>,
}

impl SessionStore {
    pub fn new(
        cell: SessionCell,
        auth: Arc<dyn AuthService>,
        storage: Arc<dyn SessionStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            cell,
            auth,
            storage,
            notifier,
        }
    }

    pub fn cell(&self) -> &SessionCell {
        &self.cell
    }

    pub fn snapshot(&self) -> SessionState {
        self.cell.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.cell.subscribe()
    }

    pub fn status(&self) -> AuthStatus {
        self.cell.snapshot().status()
    }

    pub fn is_loading(&self) -> bool {
        self.cell.snapshot().phase != SessionPhase::Ready
    }

    pub fn is_authenticated(&self) -> bool {
        self.cell.snapshot().session.is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        self.cell.snapshot().session.token
    }

    pub fn user(&self) -> Option<User> {
        self.cell.snapshot().session.user
    }

    /// Applies the route guard to the current session.
    pub fn guard(&self, requested: &Route) -> GuardDecision {
        guard(&self.cell.snapshot(), requested)
    }

    /// Waits until `init` has finished, then applies the route guard.
    pub async fn guard_when_ready(&self, requested: &Route) -> GuardDecision {
        let mut rx = self.cell.subscribe();
        let decision = match rx.wait_for(|state| state.phase == SessionPhase::Ready).await {
            Ok(state) => guard(&state, requested),
            Err(_) => guard(&self.cell.snapshot(), requested),
        };
        decision
    }

    //-------------------------------------------------------------------------------------
    // Initialization
    //-------------------------------------------------------------------------------------

    /// Restores the session from storage. Always ends in the `Ready` phase.
    pub fn init(&self) {
        self.cell.update(|state| state.phase = SessionPhase::Loading);
        let restored = self.restore();
        let authenticated = restored.is_authenticated();
        self.cell.update(|state| {
            state.session = restored;
            state.phase = SessionPhase::Ready;
        });
        info!(authenticated, "Session initialized");
    }

    fn restore(&self) -> Session {
        let token = match self.storage.get_present(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => return self.discard_storage(e),
        };

        let user = match self.storage.get_present(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    // Only the unreadable user is dropped; the token stays.
                    error!("Failed to parse the stored user: {}", e);
                    if let Err(e) = self.storage.remove(USER_KEY) {
                        error!("Failed to remove the stored user: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => return self.discard_storage(e),
        };

        Session { token, user }
    }

    fn discard_storage(&self, cause: PortError) -> Session {
        error!("Error reading the persisted session: {}", cause);
        if let Err(e) = self.storage.clear_session() {
            error!("Failed to clear the persisted session: {}", e);
        }
        Session::default()
    }

    //-------------------------------------------------------------------------------------
    // Login, Signup, Logout
    //-------------------------------------------------------------------------------------

    pub async fn login(&self, request: &LoginRequest) -> PortResult<User> {
        let outcome = self.auth.login(request).await;
        self.complete_auth(outcome, "Logged in successfully!", "Login failed.")
    }

    pub async fn signup(&self, request: &SignupRequest) -> PortResult<User> {
        let outcome = self.auth.signup(request).await;
        self.complete_auth(outcome, "Signed up successfully!", "Signup failed.")
    }

    fn complete_auth(
        &self,
        outcome: PortResult<AuthResponse>,
        success: &str,
        fallback: &str,
    ) -> PortResult<User> {
        let result = outcome.and_then(|auth| {
            if auth.access_token.trim().is_empty() {
                return Err(PortError::InvalidResponse(
                    "Invalid response from server".to_string(),
                ));
            }
            Ok(auth)
        });

        match result {
            Ok(auth) => {
                let user = auth.user.clone();
                self.establish(auth);
                self.notifier.success(success);
                Ok(user)
            }
            Err(e) => {
                error!("Authentication failed: {}", e);
                let message = e.user_message();
                let message = if message.trim().is_empty() {
                    fallback
                } else {
                    message.as_str()
                };
                self.notifier.error(message);
                Err(e)
            }
        }
    }

    /// In-memory state first, so guarded views see the login at once; then
    /// best-effort persistence.
    fn establish(&self, auth: AuthResponse) {
        let AuthResponse {
            access_token, user, ..
        } = auth;

        self.cell.update(|state| {
            state.session = Session {
                token: Some(access_token.clone()),
                user: Some(user.clone()),
            };
            state.phase = SessionPhase::Ready;
        });

        self.persist(&access_token, &user);
    }

    fn persist(&self, token: &str, user: &User) {
        if let Err(e) = self.storage.set(TOKEN_KEY, token) {
            error!("Failed to persist the token: {}", e);
            return;
        }
        match serde_json::to_string(user) {
            Ok(raw) => {
                if let Err(e) = self.storage.set(USER_KEY, &raw) {
                    error!("Failed to persist the user: {}", e);
                }
            }
            Err(e) => error!("Failed to serialize the user: {}", e),
        }
    }

    /// Local-only logout; the backend is never contacted. Safe to call when anonymous.
    pub fn logout(&self) {
        if let Err(e) = self.storage.clear_session() {
            error!("Failed to clear the persisted session: {}", e);
        }
        self.cell.clear();
        self.notifier.success("You have been logged out.");
    }

    /// Called after the HTTP client saw a 401 and already cleared storage.
    pub fn expire(&self) {
        self.cell.expire();
    }

    /// Replaces the stored user with the backend's current view of it.
    pub async fn refresh_user(&self) -> PortResult<User> {
        let user = self.auth.current_user().await?;
        let token = self.cell.snapshot().session.token;
        self.cell.update(|state| state.session.user = Some(user.clone()));
        if let Some(token) = token {
            self.persist(&token, &user);
        }
        Ok(user)
    }
}
