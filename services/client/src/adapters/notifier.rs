//! services/client/src/adapters/notifier.rs
//!
//! Reports transient notifications as tracing events.

use tracing::{info, warn};
use tradevision_core::ports::Notifier;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "tradevision::notify", "{}", message);
    }

    fn error(&self, message: &str) {
        warn!(target: "tradevision::notify", "{}", message);
    }
}
