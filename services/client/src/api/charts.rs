//! services/client/src/api/charts.rs
//!
//! Chart upload, analysis and history. Every endpoint returns a bare payload.

use async_trait::async_trait;
use tradevision_core::domain::{AnalysisHistory, ChartAnalysis, ChartUpload};
use tradevision_core::ports::{ChartService, PortResult};

use crate::http::{ApiClient, FilePart};

#[derive(Clone)]
pub struct ChartsApi {
    client: ApiClient,
}

impl ChartsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChartService for ChartsApi {
    /// Sends the image as the multipart `file` field. Size and type are the caller's concern.
    async fn upload_chart(&self, upload: &ChartUpload) -> PortResult<ChartAnalysis> {
        self.client
            .upload("/api/chart-analysis", FilePart::chart(upload))
            .await
    }

    async fn analyze_chart(&self, chart_id: i64) -> PortResult<ChartAnalysis> {
        self.client
            .post_empty(&format!("/api/chart-analysis/analyze/{}", chart_id))
            .await
    }

    async fn history(&self) -> PortResult<Vec<AnalysisHistory>> {
        self.client.get("/api/chart-analysis/history").await
    }

    async fn get_analysis(&self, id: i64) -> PortResult<ChartAnalysis> {
        self.client.get(&format!("/api/chart-analysis/{}", id)).await
    }

    async fn delete_analysis(&self, id: i64) -> PortResult<()> {
        self.client.delete(&format!("/api/chart-analysis/{}", id)).await
    }
}
