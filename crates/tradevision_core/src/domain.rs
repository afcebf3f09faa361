//! crates/tradevision_core/src/domain.rs
//!
//! Defines the client-side representations of the TradeVision data model.
//! Authoritative state lives on the backend; these are snapshots of its JSON
//! responses, so every struct mirrors the backend's camelCase field names.

use bytes::Bytes;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Session and Authentication
//=========================================================================================

/// An identity snapshot. Replaced wholesale on every auth response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub nickname: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

/// Client-held authentication state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    /// Both the token and the user are required; either one alone is anonymous.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment_level: Option<Difficulty>,
}

/// The payload of a successful login or signup, found inside the response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

//=========================================================================================
// Shared Enumerations
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// The wire form used in paths and JSON bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "BEGINNER",
            Difficulty::Intermediate => "INTERMEDIATE",
            Difficulty::Advanced => "ADVANCED",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known difficulty names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty: {0}")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BEGINNER" => Ok(Difficulty::Beginner),
            "INTERMEDIATE" => Ok(Difficulty::Intermediate),
            "ADVANCED" => Ok(Difficulty::Advanced),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

//=========================================================================================
// Chart Analysis
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    Pending,
    Completed,
    Failed,
}

/// A single uploaded chart and its AI-generated analysis. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartAnalysis {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub image_path: String,
    #[serde(default)]
    pub analysis: Option<String>,
    pub status: AnalysisStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// One entry of the analysis history list. The list order is decided by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisHistory {
    pub id: i64,
    pub image_path: String,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// An image staged for upload as the multipart `file` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl ChartUpload {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

//=========================================================================================
// Trading Techniques
//=========================================================================================

/// The technique categories the catalog is known to use.
pub const TECHNIQUE_CATEGORIES: [&str; 4] = ["TREND_FOLLOWING", "REVERSAL", "BREAKOUT", "SCALPING"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingTechnique {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub bookmark_count: u64,
    #[serde(default)]
    pub is_bookmarked: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

//=========================================================================================
// Learning Content
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningModule {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub total_contents: u32,
    #[serde(default)]
    pub completed_contents: Option<u32>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Text,
    Video,
    Quiz,
}

/// A content item inside a module. The `is_*` flags are per-user overlays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningContent {
    pub id: i64,
    pub module_id: i64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub content_type: ContentType,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub estimated_minutes: u32,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_bookmarked: bool,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// Request body for `POST /api/learning/contents/{id}/progress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub completed: bool,
    pub progress_percentage: u8,
}

impl ProgressUpdate {
    pub fn completed() -> Self {
        Self {
            completed: true,
            progress_percentage: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgress {
    pub content_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub completed: bool,
    #[serde(default)]
    pub progress_percentage: u8,
    #[serde(default)]
    pub last_accessed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningStats {
    pub total_modules: u32,
    pub completed_modules: u32,
    pub total_contents: u32,
    pub completed_contents: u32,
    pub total_learning_minutes: u32,
    pub current_streak: u32,
    pub total_bookmarks: u32,
}

impl LearningStats {
    /// Completed contents as a rounded percentage; 0 when there is nothing to complete.
    pub fn completion_rate(&self) -> u32 {
        if self.total_contents == 0 {
            return 0;
        }
        let rate = f64::from(self.completed_contents) / f64::from(self.total_contents) * 100.0;
        rate.round() as u32
    }
}

//=========================================================================================
// Subscriptions
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub name_ko: Option<String>,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub billing_period: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub max_analyses_per_month: i32,
    #[serde(default)]
    pub is_active: bool,
}

impl SubscriptionPlan {
    pub fn is_free(&self) -> bool {
        self.name.eq_ignore_ascii_case("FREE")
    }
}

/// Binds one plan to the session's user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSubscription {
    pub id: i64,
    pub plan: SubscriptionPlan,
    pub status: String,
    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub end_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub auto_renew: bool,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub plan_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

/// A time-windowed usage counter for one action type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub current_usage: i64,
    pub remaining_usage: i64,
    pub max_usage: i64,
    #[serde(default)]
    pub is_unlimited: bool,
    pub action_type: String,
}

//=========================================================================================
// Response Envelope
//=========================================================================================

/// A response wrapper whose payload is nested under `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> T {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_requires_token_and_user() {
        let user = User {
            id: 1,
            username: None,
            nickname: "A".into(),
            email: "user@test.com".into(),
            created_at: None,
        };
        let token_only = Session {
            token: Some("tok".into()),
            user: None,
        };
        let user_only = Session {
            token: None,
            user: Some(user.clone()),
        };
        let both = Session {
            token: Some("tok".into()),
            user: Some(user),
        };
        assert!(!token_only.is_authenticated());
        assert!(!user_only.is_authenticated());
        assert!(both.is_authenticated());
        assert!(!Session::default().is_authenticated());
    }

    #[test]
    fn auth_envelope_decodes_from_backend_json() {
        let json = r#"{
            "success": true,
            "message": "ok",
            "data": {
                "accessToken": "tok123",
                "refreshToken": "ref",
                "tokenType": "Bearer",
                "user": { "id": 1, "nickname": "A", "email": "user@test.com", "createdAt": "2024-03-01T09:30:00" }
            }
        }"#;
        let envelope: Envelope<AuthResponse> = serde_json::from_str(json).unwrap();
        let auth = envelope.into_data();
        assert_eq!(auth.access_token, "tok123");
        assert_eq!(auth.user.nickname, "A");
        assert!(auth.user.created_at.is_some());
    }

    #[test]
    fn overlay_flags_default_to_false() {
        let json = r#"{
            "id": 7, "moduleId": 2, "title": "Candles", "contentType": "TEXT",
            "orderIndex": 1, "estimatedMinutes": 5, "likeCount": 3
        }"#;
        let content: LearningContent = serde_json::from_str(json).unwrap();
        assert!(!content.is_liked);
        assert!(!content.is_bookmarked);
        assert!(!content.is_completed);
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("beginner".parse::<Difficulty>().unwrap(), Difficulty::Beginner);
        assert_eq!(Difficulty::Advanced.to_string(), "ADVANCED");
        assert!("ALL".parse::<Difficulty>().is_err());
    }

    #[test]
    fn completion_rate_handles_empty_catalog() {
        let stats = LearningStats::default();
        assert_eq!(stats.completion_rate(), 0);

        let stats = LearningStats {
            total_contents: 3,
            completed_contents: 2,
            ..LearningStats::default()
        };
        assert_eq!(stats.completion_rate(), 67);
    }

    #[test]
    fn progress_request_uses_camel_case() {
        let body = serde_json::to_value(ProgressUpdate::completed()).unwrap();
        assert_eq!(body, serde_json::json!({ "completed": true, "progressPercentage": 100 }));
    }
}
