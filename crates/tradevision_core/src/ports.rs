//! crates/tradevision_core/src/ports.rs
//!
//! Defines the service contracts (traits) the client's session and page logic
//! depend on. Concrete HTTP, storage, notification and navigation adapters live
//! in the `client` service and are injected at startup.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::{
    AnalysisHistory, AuthResponse, ChartAnalysis, ChartUpload, Difficulty, LearningContent,
    LearningModule, LearningProgress, LearningStats, LoginRequest, ProgressUpdate, SignupRequest,
    SubscriptionPlan, SubscriptionRequest, TradingTechnique, UsageStats, User, UserSubscription,
};
use crate::route::Route;

//=========================================================================================
// Normalized Error, Port Error and Result Types
//=========================================================================================

/// Message used when the server does not provide one.
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred.";

/// The client's internal error shape, decoupled from the HTTP library's error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status,
            errors: None,
        }
    }

    /// Used when a request never produced a response.
    pub fn transport() -> Self {
        Self::new(500, FALLBACK_ERROR_MESSAGE)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (status {})", self.message, self.status)
    }
}

/// A generic error type for all port operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("API error: {0}")]
    Api(ApiError),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Request cancelled")]
    Cancelled,
}

impl PortError {
    /// The HTTP status for server errors, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            PortError::Api(err) => Some(err.status),
            _ => None,
        }
    }

    /// The text shown to the user in a notification.
    pub fn user_message(&self) -> String {
        match self {
            PortError::Api(err) => err.message.clone(),
            PortError::InvalidResponse(msg) | PortError::Storage(msg) => msg.clone(),
            PortError::Cancelled => "The request was cancelled.".to_string(),
        }
    }
}

impl From<ApiError> for PortError {
    fn from(err: ApiError) -> Self {
        PortError::Api(err)
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Environment Ports
//=========================================================================================

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key of the serialized user.
pub const USER_KEY: &str = "user";

/// Key/value persistence that survives restarts, playing the role of browser local storage.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> PortResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PortResult<()>;
    fn remove(&self, key: &str) -> PortResult<()>;

    /// Like `get`, but empty values and the `"undefined"`/`"null"` markers left
    /// by earlier buggy writes read as absent.
    fn get_present(&self, key: &str) -> PortResult<Option<String>> {
        Ok(self
            .get(key)?
            .filter(|v| !v.is_empty() && v != "undefined" && v != "null"))
    }

    /// Removes both session keys, attempting the second even if the first fails.
    fn clear_session(&self) -> PortResult<()> {
        let token = self.remove(TOKEN_KEY);
        let user = self.remove(USER_KEY);
        token.and(user)
    }
}

/// Transient user-facing notifications.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forced navigation between views.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Receives the event the HTTP client emits whenever the backend answers 401.
pub trait UnauthorizedListener: Send + Sync {
    fn on_unauthorized(&self);
}

//=========================================================================================
// Backend Service Ports
//=========================================================================================

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> PortResult<AuthResponse>;
    async fn signup(&self, request: &SignupRequest) -> PortResult<AuthResponse>;
    async fn current_user(&self) -> PortResult<User>;
}

#[async_trait]
pub trait ChartService: Send + Sync {
    /// Uploads a chart image; the returned record's id is the input to `analyze_chart`.
    async fn upload_chart(&self, upload: &ChartUpload) -> PortResult<ChartAnalysis>;
    async fn analyze_chart(&self, chart_id: i64) -> PortResult<ChartAnalysis>;
    async fn history(&self) -> PortResult<Vec<AnalysisHistory>>;
    async fn get_analysis(&self, id: i64) -> PortResult<ChartAnalysis>;
    async fn delete_analysis(&self, id: i64) -> PortResult<()>;
}

#[async_trait]
pub trait TechniqueService: Send + Sync {
    async fn all(&self) -> PortResult<Vec<TradingTechnique>>;
    async fn by_id(&self, id: i64) -> PortResult<TradingTechnique>;
    async fn by_category(&self, category: &str) -> PortResult<Vec<TradingTechnique>>;
    async fn by_difficulty(&self, difficulty: Difficulty) -> PortResult<Vec<TradingTechnique>>;
    async fn search(&self, keyword: &str) -> PortResult<Vec<TradingTechnique>>;
    async fn popular(&self) -> PortResult<Vec<TradingTechnique>>;
    async fn bookmark(&self, id: i64) -> PortResult<()>;
    async fn remove_bookmark(&self, id: i64) -> PortResult<()>;
}

#[async_trait]
pub trait LearningService: Send + Sync {
    async fn modules(&self) -> PortResult<Vec<LearningModule>>;
    async fn module_by_id(&self, id: i64) -> PortResult<LearningModule>;
    async fn modules_by_difficulty(&self, difficulty: Difficulty) -> PortResult<Vec<LearningModule>>;
    async fn contents_by_module(&self, module_id: i64) -> PortResult<Vec<LearningContent>>;
    async fn content_by_id(&self, id: i64) -> PortResult<LearningContent>;
    async fn update_progress(
        &self,
        content_id: i64,
        update: ProgressUpdate,
    ) -> PortResult<LearningProgress>;
    async fn like(&self, content_id: i64) -> PortResult<()>;
    async fn unlike(&self, content_id: i64) -> PortResult<()>;
    async fn bookmark(&self, content_id: i64) -> PortResult<()>;
    async fn remove_bookmark(&self, content_id: i64) -> PortResult<()>;
    async fn stats(&self) -> PortResult<LearningStats>;
}

#[async_trait]
pub trait SubscriptionService: Send + Sync {
    async fn plans(&self) -> PortResult<Vec<SubscriptionPlan>>;
    /// `None` when the user has no active subscription.
    async fn current(&self) -> PortResult<Option<UserSubscription>>;
    async fn history(&self) -> PortResult<Vec<UserSubscription>>;
    async fn subscribe(&self, request: &SubscriptionRequest) -> PortResult<UserSubscription>;
    async fn cancel(&self, reason: Option<&str>) -> PortResult<()>;
    async fn usage_stats(
        &self,
        action_type: &str,
        session_id: Option<&str>,
    ) -> PortResult<UsageStats>;
}
