//! services/client/src/api/techniques.rs
//!
//! The trading technique catalog and its bookmark overlay.

use async_trait::async_trait;
use tradevision_core::domain::{Difficulty, TradingTechnique};
use tradevision_core::ports::{PortResult, TechniqueService};

use crate::http::{ApiClient, RequestOptions};

const BASE: &str = "/api/trading-techniques";

#[derive(Clone)]
pub struct TechniquesApi {
    client: ApiClient,
}

impl TechniquesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TechniqueService for TechniquesApi {
    async fn all(&self) -> PortResult<Vec<TradingTechnique>> {
        self.client.get(BASE).await
    }

    async fn by_id(&self, id: i64) -> PortResult<TradingTechnique> {
        self.client.get(&format!("{}/{}", BASE, id)).await
    }

    async fn by_category(&self, category: &str) -> PortResult<Vec<TradingTechnique>> {
        self.client
            .get(&format!("{}/category/{}", BASE, category))
            .await
    }

    async fn by_difficulty(&self, difficulty: Difficulty) -> PortResult<Vec<TradingTechnique>> {
        self.client
            .get(&format!("{}/difficulty/{}", BASE, difficulty.as_str()))
            .await
    }

    async fn search(&self, keyword: &str) -> PortResult<Vec<TradingTechnique>> {
        self.client
            .get_with(
                &format!("{}/search", BASE),
                RequestOptions::new().query("keyword", keyword),
            )
            .await
    }

    async fn popular(&self) -> PortResult<Vec<TradingTechnique>> {
        self.client.get(&format!("{}/popular", BASE)).await
    }

    async fn bookmark(&self, id: i64) -> PortResult<()> {
        self.client
            .post_empty_with(&format!("{}/{}/bookmark", BASE, id), RequestOptions::new())
            .await
    }

    async fn remove_bookmark(&self, id: i64) -> PortResult<()> {
        self.client.delete(&format!("{}/{}/bookmark", BASE, id)).await
    }
}
