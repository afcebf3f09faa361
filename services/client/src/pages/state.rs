//! services/client/src/pages/state.rs
//!
//! State shared by every page controller: the per-page load state and the
//! cancellation scope that outlives none of the page's requests.

use std::future::Future;
use tokio_util::sync::CancellationToken;
use tradevision_core::ports::{Notifier, PortError, PortResult};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    /// The message shown in place of the data.
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn loaded_mut(&mut self) -> Option<&mut T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Ties in-flight requests to the lifetime of a page.
///
/// Dropping the scope cancels its token; any request still awaited through
/// [`PageScope::run`] or [`run_until_cancelled`] then resolves to
/// `PortError::Cancelled` and its result is discarded.
#[derive(Debug, Default)]
pub struct PageScope {
    token: CancellationToken,
}

impl PageScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A token for work spawned off the page, cancelled together with it.
    pub fn token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub async fn run<T, F>(&self, fut: F) -> PortResult<T>
    where
        F: Future<Output = PortResult<T>>,
    {
        run_until_cancelled(&self.token, fut).await
    }
}

impl Drop for PageScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Shows `e` to the user unless the request was cancelled with its page.
pub fn notify_failure(notifier: &dyn Notifier, e: &PortError) {
    if *e != PortError::Cancelled {
        notifier.error(&e.user_message());
    }
}

/// Awaits `fut` unless `token` is cancelled first.
pub async fn run_until_cancelled<T, F>(token: &CancellationToken, fut: F) -> PortResult<T>
where
    F: Future<Output = PortResult<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(PortError::Cancelled),
        result = fut => result,
    }
}
