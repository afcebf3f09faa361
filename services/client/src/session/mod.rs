pub mod guard;
pub mod store;

pub use guard::{guard, GuardDecision};
pub use store::{AuthStatus, SessionCell, SessionPhase, SessionState, SessionStore};
