//! services/client/src/api/subscription.rs
//!
//! Plans, the user's subscription and usage counters. Every endpoint here
//! answers with the `{ data: ... }` envelope.

use async_trait::async_trait;
use tradevision_core::domain::{
    Envelope, SubscriptionPlan, SubscriptionRequest, UsageStats, UserSubscription,
};
use tradevision_core::ports::{PortResult, SubscriptionService};

use crate::http::{ApiClient, RequestOptions};

#[derive(Clone)]
pub struct SubscriptionApi {
    client: ApiClient,
}

impl SubscriptionApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SubscriptionService for SubscriptionApi {
    async fn plans(&self) -> PortResult<Vec<SubscriptionPlan>> {
        let envelope: Envelope<Vec<SubscriptionPlan>> =
            self.client.get("/api/subscriptions/plans").await?;
        Ok(envelope.into_data())
    }

    async fn current(&self) -> PortResult<Option<UserSubscription>> {
        let envelope: Envelope<Option<UserSubscription>> =
            self.client.get("/api/subscriptions/current").await?;
        Ok(envelope.into_data())
    }

    async fn history(&self) -> PortResult<Vec<UserSubscription>> {
        let envelope: Envelope<Vec<UserSubscription>> =
            self.client.get("/api/subscriptions/history").await?;
        Ok(envelope.into_data())
    }

    async fn subscribe(&self, request: &SubscriptionRequest) -> PortResult<UserSubscription> {
        let envelope: Envelope<UserSubscription> = self
            .client
            .post_json("/api/subscriptions/subscribe", request)
            .await?;
        Ok(envelope.into_data())
    }

    async fn cancel(&self, reason: Option<&str>) -> PortResult<()> {
        self.client
            .post_empty_with(
                "/api/subscriptions/cancel",
                RequestOptions::new().query_opt("reason", reason),
            )
            .await
    }

    async fn usage_stats(
        &self,
        action_type: &str,
        session_id: Option<&str>,
    ) -> PortResult<UsageStats> {
        let envelope: Envelope<UsageStats> = self
            .client
            .get_with(
                &format!("/api/subscriptions/usage/{}", action_type),
                RequestOptions::new().query_opt("sessionId", session_id),
            )
            .await?;
        Ok(envelope.into_data())
    }
}
