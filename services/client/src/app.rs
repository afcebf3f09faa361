//! services/client/src/app.rs
//!
//! Wires the configured adapters, API modules, session store and pages into
//! one application value. This is the only place that knows the concrete
//! types behind the ports.

use std::sync::Arc;
use tracing::info;
use tradevision_core::ports::{
    ChartService, LearningService, Navigator, Notifier, SessionStorage, SubscriptionService,
    TechniqueService, UnauthorizedListener,
};
use tradevision_core::route::Route;

use crate::adapters::{FileStorage, TracingNotifier, WatchNavigator};
use crate::api::{AuthApi, ChartsApi, LearningApi, SubscriptionApi, TechniquesApi};
use crate::config::Config;
use crate::error::ClientError;
use crate::http::ApiClient;
use crate::pages::{
    AnalysisPage, ContentViewerPage, DashboardPage, LearningModulesPage, LoginPage,
    ModuleContentsPage, PricingPage, ProfilePage, SignupPage, TechniquesPage,
};
use crate::session::{GuardDecision, SessionCell, SessionStore};

//=========================================================================================
// Session Expiry
//=========================================================================================

/// Receives the HTTP client's 401 event: the in-memory session is dropped
/// and the user is sent to the login page. Storage was already cleared by
/// the client.
pub struct SessionExpiryHandler {
    cell: SessionCell,
    navigator: Arc<dyn Navigator>,
}

impl SessionExpiryHandler {
    pub fn new(cell: SessionCell, navigator: Arc<dyn Navigator>) -> Self {
        Self { cell, navigator }
    }
}

impl UnauthorizedListener for SessionExpiryHandler {
    fn on_unauthorized(&self) {
        self.cell.expire();
        self.navigator.navigate(Route::login());
    }
}

//=========================================================================================
// The Application
//=========================================================================================

pub struct App {
    pub config: Arc<Config>,
    pub storage: Arc<dyn SessionStorage>,
    pub navigator: Arc<WatchNavigator>,
    pub notifier: Arc<dyn Notifier>,
    pub client: ApiClient,
    pub charts: Arc<dyn ChartService>,
    pub techniques: Arc<dyn TechniqueService>,
    pub learning: Arc<dyn LearningService>,
    pub subscriptions: Arc<dyn SubscriptionService>,
    pub session: Arc<SessionStore>,
}

impl App {
    /// Builds the application with file-backed storage and tracing notifications.
    pub fn from_config(config: Config) -> Result<Self, ClientError> {
        let storage: Arc<dyn SessionStorage> = Arc::new(FileStorage::new(config.storage_path.clone()));
        Self::with_parts(config, storage, Arc::new(TracingNotifier))
    }

    /// Builds the application around the given storage and notifier, then
    /// restores the persisted session.
    pub fn with_parts(
        config: Config,
        storage: Arc<dyn SessionStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ClientError> {
        let config = Arc::new(config);

        // 1. Shared session cell and navigation.
        let cell = SessionCell::new();
        let navigator = Arc::new(WatchNavigator::default());

        // 2. The HTTP pipeline, reporting 401s to the expiry handler.
        let expiry = Arc::new(SessionExpiryHandler::new(cell.clone(), navigator.clone()));
        let client = ApiClient::new(config.api_base_url.clone(), storage.clone())?
            .with_unauthorized_listener(expiry);

        // 3. Domain API modules.
        let auth = Arc::new(AuthApi::new(client.clone()));
        let charts = Arc::new(ChartsApi::new(client.clone()));
        let techniques = Arc::new(TechniquesApi::new(client.clone()));
        let learning = Arc::new(LearningApi::new(client.clone()));
        let subscriptions = Arc::new(SubscriptionApi::new(client.clone()));

        // 4. Session store, restored from storage.
        let session = Arc::new(SessionStore::new(cell, auth, storage.clone(), notifier.clone()));
        session.init();
        info!(base_url = %config.api_base_url, "Client ready");

        Ok(Self {
            config,
            storage,
            navigator,
            notifier,
            client,
            charts,
            techniques,
            learning,
            subscriptions,
            session,
        })
    }

    /// Applies the route guard and moves to the resulting route.
    pub async fn enter(&self, requested: Route) -> GuardDecision {
        let decision = self.session.guard_when_ready(&requested).await;
        match &decision {
            GuardDecision::Render(route) | GuardDecision::Redirect(route) => {
                self.navigator.navigate(route.clone());
            }
            GuardDecision::Pending => {}
        }
        decision
    }

    //-------------------------------------------------------------------------------------
    // Pages
    //-------------------------------------------------------------------------------------

    pub fn login_page(&self, entered_via: &Route) -> LoginPage {
        LoginPage::new(self.session.clone(), self.navigator.clone(), entered_via)
    }

    pub fn signup_page(&self) -> SignupPage {
        SignupPage::new(self.session.clone(), self.navigator.clone())
    }

    pub fn analysis_page(&self) -> AnalysisPage {
        AnalysisPage::new(self.charts.clone(), self.notifier.clone())
    }

    pub fn techniques_page(&self) -> TechniquesPage {
        TechniquesPage::new(self.techniques.clone(), self.notifier.clone())
    }

    pub fn learning_page(&self) -> LearningModulesPage {
        LearningModulesPage::new(self.learning.clone(), self.notifier.clone())
    }

    pub fn module_page(&self, module_id: i64) -> ModuleContentsPage {
        ModuleContentsPage::new(self.learning.clone(), self.notifier.clone(), module_id)
    }

    pub fn content_page(&self, content_id: i64) -> ContentViewerPage {
        ContentViewerPage::new(self.learning.clone(), self.notifier.clone(), content_id)
    }

    pub fn dashboard_page(&self) -> DashboardPage {
        DashboardPage::new(self.learning.clone(), self.charts.clone(), self.notifier.clone())
    }

    pub fn profile_page(&self) -> ProfilePage {
        ProfilePage::new(
            self.session.clone(),
            self.learning.clone(),
            self.subscriptions.clone(),
            self.notifier.clone(),
        )
    }

    pub fn pricing_page(&self) -> PricingPage {
        PricingPage::new(self.subscriptions.clone(), self.navigator.clone(), self.notifier.clone())
    }
}
