//! services/client/src/testing.rs
//!
//! In-memory fakes of the core ports, shared by the unit tests of the session
//! store and the page controllers.

use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::watch;
use tradevision_core::domain::*;
use tradevision_core::ports::*;
use tradevision_core::route::Route;

use crate::pages::analysis::AnalysisStage;

//=========================================================================================
// Sample Data
//=========================================================================================

pub fn sample_user() -> User {
    User {
        id: 1,
        username: None,
        nickname: "A".into(),
        email: "user@test.com".into(),
        created_at: None,
    }
}

pub fn technique(id: i64, category: &str, difficulty: Difficulty, title: &str) -> TradingTechnique {
    TradingTechnique {
        id,
        title: title.into(),
        description: format!("How to trade {}", title),
        category: category.into(),
        difficulty,
        content: String::new(),
        image_url: None,
        view_count: 0,
        bookmark_count: 0,
        is_bookmarked: false,
        created_at: None,
        updated_at: None,
    }
}

pub fn module(id: i64, difficulty: Difficulty) -> LearningModule {
    LearningModule {
        id,
        title: format!("Module {}", id),
        description: String::new(),
        difficulty,
        order_index: id as i32,
        total_contents: 2,
        completed_contents: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn content(id: i64, module_id: i64) -> LearningContent {
    LearningContent {
        id,
        module_id,
        title: format!("Lesson {}", id),
        content: String::new(),
        content_type: ContentType::Text,
        order_index: id as i32,
        estimated_minutes: 5,
        like_count: 3,
        is_liked: false,
        is_bookmarked: false,
        is_completed: false,
        created_at: None,
        updated_at: None,
    }
}

pub fn chart(id: i64, status: AnalysisStatus) -> ChartAnalysis {
    ChartAnalysis {
        id,
        user_id: Some(1),
        image_path: format!("/uploads/{}.png", id),
        analysis: match status {
            AnalysisStatus::Completed => Some("Uptrend with higher lows".into()),
            _ => None,
        },
        status,
        created_at: None,
        updated_at: None,
    }
}

pub fn history_entry(id: i64) -> AnalysisHistory {
    AnalysisHistory {
        id,
        image_path: format!("/uploads/{}.png", id),
        analysis: Some("analysis".into()),
        created_at: None,
    }
}

pub fn plan(id: i64, name: &str) -> SubscriptionPlan {
    SubscriptionPlan {
        id,
        name: name.into(),
        name_ko: None,
        description: String::new(),
        price: if name == "FREE" { 0.0 } else { 9900.0 },
        billing_period: "MONTHLY".into(),
        features: vec![],
        max_analyses_per_month: 5,
        is_active: true,
    }
}

fn unreachable_error() -> PortError {
    PortError::Api(ApiError::new(500, "boom"))
}

//=========================================================================================
// Environment Fakes
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    Success(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    notes: Mutex<Vec<Note>>,
}

impl RecordingNotifier {
    pub fn notes(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notes.lock().unwrap().push(Note::Success(message.into()));
    }

    fn error(&self, message: &str) {
        self.notes.lock().unwrap().push(Note::Error(message.into()));
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

/// Storage whose every operation fails.
pub struct FailingStorage;

impl SessionStorage for FailingStorage {
    fn get(&self, _key: &str) -> PortResult<Option<String>> {
        Err(PortError::Storage("quota exceeded".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> PortResult<()> {
        Err(PortError::Storage("quota exceeded".into()))
    }

    fn remove(&self, _key: &str) -> PortResult<()> {
        Err(PortError::Storage("quota exceeded".into()))
    }
}

//=========================================================================================
// Service Fakes
//=========================================================================================

pub struct FakeAuth {
    pub token: String,
    pub error: Option<PortError>,
    pub me: Option<User>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeAuth {
    pub fn returning_token(token: &str) -> Self {
        Self {
            token: token.into(),
            error: None,
            me: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: PortError) -> Self {
        Self {
            error: Some(error),
            ..Self::returning_token("")
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, call: &str) -> PortResult<AuthResponse> {
        self.calls.lock().unwrap().push(call.into());
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        Ok(AuthResponse {
            access_token: self.token.clone(),
            refresh_token: Some("refresh".into()),
            token_type: Some("Bearer".into()),
            user: sample_user(),
        })
    }
}

#[async_trait]
impl AuthService for FakeAuth {
    async fn login(&self, _request: &LoginRequest) -> PortResult<AuthResponse> {
        self.respond("login")
    }

    async fn signup(&self, _request: &SignupRequest) -> PortResult<AuthResponse> {
        self.respond("signup")
    }

    async fn current_user(&self) -> PortResult<User> {
        self.calls.lock().unwrap().push("me".into());
        self.me.clone().ok_or_else(unreachable_error)
    }
}

#[derive(Default)]
pub struct FakeCharts {
    pub upload_error: Option<PortError>,
    pub analyze_error: Option<PortError>,
    pub history: Vec<AnalysisHistory>,
    pub calls: Mutex<Vec<String>>,
    pub stage_rx: Mutex<Option<watch::Receiver<AnalysisStage>>>,
    pub observed: Mutex<Vec<AnalysisStage>>,
}

impl FakeCharts {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Records the workflow stage visible at the moment of each network call.
    pub fn observe(&self, rx: watch::Receiver<AnalysisStage>) {
        *self.stage_rx.lock().unwrap() = Some(rx);
    }

    pub fn observed(&self) -> Vec<AnalysisStage> {
        self.observed.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
        if let Some(rx) = self.stage_rx.lock().unwrap().as_ref() {
            self.observed.lock().unwrap().push(rx.borrow().clone());
        }
    }
}

#[async_trait]
impl ChartService for FakeCharts {
    async fn upload_chart(&self, upload: &ChartUpload) -> PortResult<ChartAnalysis> {
        self.record(format!("upload:{}", upload.file_name));
        match &self.upload_error {
            Some(err) => Err(err.clone()),
            None => Ok(chart(42, AnalysisStatus::Pending)),
        }
    }

    async fn analyze_chart(&self, chart_id: i64) -> PortResult<ChartAnalysis> {
        self.record(format!("analyze:{}", chart_id));
        match &self.analyze_error {
            Some(err) => Err(err.clone()),
            None => Ok(chart(chart_id, AnalysisStatus::Completed)),
        }
    }

    async fn history(&self) -> PortResult<Vec<AnalysisHistory>> {
        self.record("history".into());
        Ok(self.history.clone())
    }

    async fn get_analysis(&self, id: i64) -> PortResult<ChartAnalysis> {
        self.record(format!("get:{}", id));
        Ok(chart(id, AnalysisStatus::Completed))
    }

    async fn delete_analysis(&self, id: i64) -> PortResult<()> {
        self.record(format!("delete:{}", id));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeTechniques {
    pub catalog: Vec<TradingTechnique>,
    pub bookmark_error: Option<PortError>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeTechniques {
    pub fn with_catalog(catalog: Vec<TradingTechnique>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn toggle(&self, call: String) -> PortResult<()> {
        self.record(call);
        match &self.bookmark_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TechniqueService for FakeTechniques {
    async fn all(&self) -> PortResult<Vec<TradingTechnique>> {
        self.record("all".into());
        Ok(self.catalog.clone())
    }

    async fn by_id(&self, id: i64) -> PortResult<TradingTechnique> {
        self.record(format!("by_id:{}", id));
        self.catalog
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| PortError::Api(ApiError::new(404, "Not found")))
    }

    async fn by_category(&self, category: &str) -> PortResult<Vec<TradingTechnique>> {
        self.record(format!("by_category:{}", category));
        Ok(self.catalog.iter().filter(|t| t.category == category).cloned().collect())
    }

    async fn by_difficulty(&self, difficulty: Difficulty) -> PortResult<Vec<TradingTechnique>> {
        self.record(format!("by_difficulty:{}", difficulty));
        Ok(self.catalog.iter().filter(|t| t.difficulty == difficulty).cloned().collect())
    }

    async fn search(&self, keyword: &str) -> PortResult<Vec<TradingTechnique>> {
        self.record(format!("search:{}", keyword));
        Ok(self.catalog.clone())
    }

    async fn popular(&self) -> PortResult<Vec<TradingTechnique>> {
        self.record("popular".into());
        Ok(self.catalog.clone())
    }

    async fn bookmark(&self, id: i64) -> PortResult<()> {
        self.toggle(format!("bookmark:{}", id))
    }

    async fn remove_bookmark(&self, id: i64) -> PortResult<()> {
        self.toggle(format!("remove_bookmark:{}", id))
    }
}

#[derive(Default)]
pub struct FakeLearning {
    pub modules: Vec<LearningModule>,
    pub contents: Vec<LearningContent>,
    pub stats: LearningStats,
    pub toggle_error: Option<PortError>,
    pub stats_error: Option<PortError>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeLearning {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn toggle(&self, call: String) -> PortResult<()> {
        self.record(call);
        match &self.toggle_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LearningService for FakeLearning {
    async fn modules(&self) -> PortResult<Vec<LearningModule>> {
        self.record("modules".into());
        Ok(self.modules.clone())
    }

    async fn module_by_id(&self, id: i64) -> PortResult<LearningModule> {
        self.record(format!("module:{}", id));
        self.modules
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| PortError::Api(ApiError::new(404, "Module not found")))
    }

    async fn modules_by_difficulty(&self, difficulty: Difficulty) -> PortResult<Vec<LearningModule>> {
        self.record(format!("modules_by_difficulty:{}", difficulty));
        Ok(self.modules.iter().filter(|m| m.difficulty == difficulty).cloned().collect())
    }

    async fn contents_by_module(&self, module_id: i64) -> PortResult<Vec<LearningContent>> {
        self.record(format!("contents:{}", module_id));
        Ok(self.contents.iter().filter(|c| c.module_id == module_id).cloned().collect())
    }

    async fn content_by_id(&self, id: i64) -> PortResult<LearningContent> {
        self.record(format!("content:{}", id));
        self.contents
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| PortError::Api(ApiError::new(404, "Content not found")))
    }

    async fn update_progress(
        &self,
        content_id: i64,
        update: ProgressUpdate,
    ) -> PortResult<LearningProgress> {
        self.toggle(format!(
            "progress:{}:{}:{}",
            content_id, update.completed, update.progress_percentage
        ))?;
        Ok(LearningProgress {
            content_id,
            user_id: Some(1),
            completed: update.completed,
            progress_percentage: update.progress_percentage,
            last_accessed_at: None,
        })
    }

    async fn like(&self, content_id: i64) -> PortResult<()> {
        self.toggle(format!("like:{}", content_id))
    }

    async fn unlike(&self, content_id: i64) -> PortResult<()> {
        self.toggle(format!("unlike:{}", content_id))
    }

    async fn bookmark(&self, content_id: i64) -> PortResult<()> {
        self.toggle(format!("bookmark:{}", content_id))
    }

    async fn remove_bookmark(&self, content_id: i64) -> PortResult<()> {
        self.toggle(format!("remove_bookmark:{}", content_id))
    }

    async fn stats(&self) -> PortResult<LearningStats> {
        self.record("stats".into());
        match &self.stats_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.stats.clone()),
        }
    }
}

#[derive(Default)]
pub struct FakeSubscriptions {
    pub plans: Vec<SubscriptionPlan>,
    pub current: Option<UserSubscription>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeSubscriptions {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn subscription_for(&self, plan_id: i64) -> PortResult<UserSubscription> {
        let plan = self
            .plans
            .iter()
            .find(|p| p.id == plan_id)
            .cloned()
            .ok_or_else(|| PortError::Api(ApiError::new(404, "Plan not found")))?;
        Ok(UserSubscription {
            id: 100 + plan_id,
            plan,
            status: "ACTIVE".into(),
            start_date: None,
            end_date: None,
            auto_renew: true,
            is_active: true,
        })
    }
}

#[async_trait]
impl SubscriptionService for FakeSubscriptions {
    async fn plans(&self) -> PortResult<Vec<SubscriptionPlan>> {
        self.record("plans".into());
        Ok(self.plans.clone())
    }

    async fn current(&self) -> PortResult<Option<UserSubscription>> {
        self.record("current".into());
        Ok(self.current.clone())
    }

    async fn history(&self) -> PortResult<Vec<UserSubscription>> {
        self.record("history".into());
        Ok(self.current.clone().into_iter().collect())
    }

    async fn subscribe(&self, request: &SubscriptionRequest) -> PortResult<UserSubscription> {
        self.record(format!("subscribe:{}", request.plan_id));
        self.subscription_for(request.plan_id)
    }

    async fn cancel(&self, reason: Option<&str>) -> PortResult<()> {
        self.record(format!("cancel:{}", reason.unwrap_or("-")));
        Ok(())
    }

    async fn usage_stats(
        &self,
        action_type: &str,
        session_id: Option<&str>,
    ) -> PortResult<UsageStats> {
        self.record(format!("usage:{}:{}", action_type, session_id.unwrap_or("-")));
        Ok(UsageStats {
            current_usage: 2,
            remaining_usage: 3,
            max_usage: 5,
            is_unlimited: false,
            action_type: action_type.into(),
        })
    }
}
