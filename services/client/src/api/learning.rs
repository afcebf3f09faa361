//! services/client/src/api/learning.rs
//!
//! Learning modules, their contents, and the per-user progress, like and
//! bookmark overlays.

use async_trait::async_trait;
use tradevision_core::domain::{
    Difficulty, LearningContent, LearningModule, LearningProgress, LearningStats, ProgressUpdate,
};
use tradevision_core::ports::{LearningService, PortResult};

use crate::http::{ApiClient, RequestOptions};

#[derive(Clone)]
pub struct LearningApi {
    client: ApiClient,
}

impl LearningApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LearningService for LearningApi {
    async fn modules(&self) -> PortResult<Vec<LearningModule>> {
        self.client.get("/api/learning/modules").await
    }

    async fn module_by_id(&self, id: i64) -> PortResult<LearningModule> {
        self.client
            .get(&format!("/api/learning/modules/{}", id))
            .await
    }

    async fn modules_by_difficulty(&self, difficulty: Difficulty) -> PortResult<Vec<LearningModule>> {
        self.client
            .get(&format!("/api/learning/modules/difficulty/{}", difficulty.as_str()))
            .await
    }

    async fn contents_by_module(&self, module_id: i64) -> PortResult<Vec<LearningContent>> {
        self.client
            .get(&format!("/api/learning/modules/{}/contents", module_id))
            .await
    }

    async fn content_by_id(&self, id: i64) -> PortResult<LearningContent> {
        self.client
            .get(&format!("/api/learning/contents/{}", id))
            .await
    }

    async fn update_progress(
        &self,
        content_id: i64,
        update: ProgressUpdate,
    ) -> PortResult<LearningProgress> {
        self.client
            .post_json(&format!("/api/learning/contents/{}/progress", content_id), &update)
            .await
    }

    async fn like(&self, content_id: i64) -> PortResult<()> {
        self.client
            .post_empty_with(
                &format!("/api/learning/contents/{}/like", content_id),
                RequestOptions::new(),
            )
            .await
    }

    async fn unlike(&self, content_id: i64) -> PortResult<()> {
        self.client
            .delete(&format!("/api/learning/contents/{}/like", content_id))
            .await
    }

    async fn bookmark(&self, content_id: i64) -> PortResult<()> {
        self.client
            .post_empty_with(
                &format!("/api/learning/contents/{}/bookmark", content_id),
                RequestOptions::new(),
            )
            .await
    }

    async fn remove_bookmark(&self, content_id: i64) -> PortResult<()> {
        self.client
            .delete(&format!("/api/learning/contents/{}/bookmark", content_id))
            .await
    }

    async fn stats(&self) -> PortResult<LearningStats> {
        self.client.get("/api/learning/progress/stats").await
    }
}
