//! services/client/src/session/guard.rs
//!
//! Gates protected views on session presence.

use tradevision_core::route::Route;

use crate::session::store::{AuthStatus, SessionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Storage has not been read yet; show a neutral loading state and decide later.
    Pending,
    /// Go here instead of the requested view.
    Redirect(Route),
    /// Render the requested view unmodified.
    Render(Route),
}

/// Decides what to show for `requested` given the current session.
///
/// Anonymous visitors of a protected view are sent to login with the requested
/// path preserved, so login can return them there afterwards.
pub fn guard(state: &SessionState, requested: &Route) -> GuardDecision {
    if !requested.is_protected() {
        return GuardDecision::Render(requested.clone());
    }
    match state.status() {
        AuthStatus::Uninitialized | AuthStatus::Loading => GuardDecision::Pending,
        AuthStatus::Anonymous => GuardDecision::Redirect(Route::Login {
            from: Some(requested.path()),
            selected_plan: None,
        }),
        AuthStatus::Authenticated => GuardDecision::Render(requested.clone()),
    }
}
