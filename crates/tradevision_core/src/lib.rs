pub mod domain;
pub mod filter;
pub mod ports;
pub mod route;
pub mod validation;

pub use domain::{
    AnalysisHistory, AnalysisStatus, AuthResponse, ChartAnalysis, ChartUpload, ContentType,
    Difficulty, Envelope, LearningContent, LearningModule, LearningProgress, LearningStats,
    LoginRequest, ProgressUpdate, Session, SignupRequest, SubscriptionPlan, SubscriptionRequest,
    TradingTechnique, UsageStats, User, UserSubscription,
};
pub use filter::TechniqueFilter;
pub use ports::{
    ApiError, AuthService, ChartService, LearningService, Navigator, Notifier, PortError,
    PortResult, SessionStorage, SubscriptionService, TechniqueService, UnauthorizedListener,
};
pub use route::Route;
