//! services/client/src/pages/profile.rs
//!
//! The user's profile: identity, learning stats, subscription and usage.

use std::sync::Arc;
use tracing::{error, info};
use tradevision_core::domain::{
    LearningStats, SubscriptionRequest, UsageStats, User, UserSubscription,
};
use tradevision_core::ports::{LearningService, Notifier, PortError, SubscriptionService};

use crate::error::ClientError;
use crate::pages::state::{notify_failure, LoadState, PageScope};
use crate::session::SessionStore;

/// Usage counter shown on the profile.
pub const CHART_ANALYSIS_ACTION: &str = "CHART_ANALYSIS";

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileData {
    pub stats: LearningStats,
    pub subscription: Option<UserSubscription>,
    pub usage: UsageStats,
}

pub struct ProfilePage {
    store: Arc<SessionStore>,
    learning: Arc<dyn LearningService>,
    subscriptions: Arc<dyn SubscriptionService>,
    notifier: Arc<dyn Notifier>,
    scope: PageScope,
    data: LoadState<ProfileData>,
}

impl ProfilePage {
    pub fn new(
        store: Arc<SessionStore>,
        learning: Arc<dyn LearningService>,
        subscriptions: Arc<dyn SubscriptionService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            learning,
            subscriptions,
            notifier,
            scope: PageScope::new(),
            data: LoadState::Idle,
        }
    }

    /// The user as held by the session.
    pub fn user(&self) -> Option<User> {
        self.store.user()
    }

    pub fn data(&self) -> &LoadState<ProfileData> {
        &self.data
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.data = LoadState::Loading;
        let learning = self.learning.clone();
        let subscriptions = self.subscriptions.clone();
        let result = self
            .scope
            .run(async move {
                let (stats, subscription, usage) = futures::try_join!(
                    learning.stats(),
                    subscriptions.current(),
                    subscriptions.usage_stats(CHART_ANALYSIS_ACTION, None)
                )?;
                Ok::<_, PortError>(ProfileData {
                    stats,
                    subscription,
                    usage,
                })
            })
            .await;

        match result {
            Ok(data) => {
                self.data = LoadState::Loaded(data);
                Ok(())
            }
            Err(e) => {
                error!("Failed to load the profile: {}", e);
                self.data = LoadState::Failed(e.user_message());
                notify_failure(self.notifier.as_ref(), &e);
                Err(e.into())
            }
        }
    }

    pub async fn subscribe(&mut self, plan_id: i64) -> Result<UserSubscription, ClientError> {
        let request = SubscriptionRequest {
            plan_id,
            payment_method: None,
        };
        let subscription = self
            .scope
            .run(self.subscriptions.subscribe(&request))
            .await
            .map_err(|e| {
                notify_failure(self.notifier.as_ref(), &e);
                e
            })?;

        info!(plan = %subscription.plan.name, "Subscribed");
        if let Some(data) = self.data.loaded_mut() {
            data.subscription = Some(subscription.clone());
        }
        self.notifier.success("Subscription started.");
        Ok(subscription)
    }

    pub async fn cancel(&mut self, reason: Option<&str>) -> Result<(), ClientError> {
        self.scope
            .run(self.subscriptions.cancel(reason))
            .await
            .map_err(|e| {
                notify_failure(self.notifier.as_ref(), &e);
                e
            })?;

        if let Some(data) = self.data.loaded_mut() {
            data.subscription = None;
        }
        self.notifier.success("Subscription cancelled.");
        Ok(())
    }
}
