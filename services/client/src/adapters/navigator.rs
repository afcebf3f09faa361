//! services/client/src/adapters/navigator.rs
//!
//! Tracks the current location on a watch channel so any observer can react
//! to forced navigation (for example the redirect to login after a 401).

use tokio::sync::watch;
use tracing::info;
use tradevision_core::ports::Navigator;
use tradevision_core::route::Route;

pub struct WatchNavigator {
    current: watch::Sender<Route>,
}

impl WatchNavigator {
    pub fn new(initial: Route) -> Self {
        let (current, _) = watch::channel(initial);
        Self { current }
    }

    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

impl Default for WatchNavigator {
    fn default() -> Self {
        Self::new(Route::Landing)
    }
}

impl Navigator for WatchNavigator {
    fn navigate(&self, route: Route) {
        info!("Navigating to {}", route);
        self.current.send_replace(route);
    }
}
