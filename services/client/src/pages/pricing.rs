//! services/client/src/pages/pricing.rs
//!
//! The public plan list. Choosing a plan starts the signup or login flow.

use std::sync::Arc;
use tracing::error;
use tradevision_core::domain::SubscriptionPlan;
use tradevision_core::ports::{Navigator, Notifier, SubscriptionService};
use tradevision_core::route::Route;

use crate::error::ClientError;
use crate::pages::state::{notify_failure, LoadState, PageScope};

/// The plan highlighted on the pricing page.
pub const RECOMMENDED_PLAN: &str = "PRO";

pub struct PricingPage {
    subscriptions: Arc<dyn SubscriptionService>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    scope: PageScope,
    plans: LoadState<Vec<SubscriptionPlan>>,
}

impl PricingPage {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionService>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            subscriptions,
            navigator,
            notifier,
            scope: PageScope::new(),
            plans: LoadState::Idle,
        }
    }

    pub fn plans(&self) -> &LoadState<Vec<SubscriptionPlan>> {
        &self.plans
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.plans = LoadState::Loading;
        match self.scope.run(self.subscriptions.plans()).await {
            Ok(plans) => {
                self.plans = LoadState::Loaded(plans);
                Ok(())
            }
            Err(e) => {
                error!("Failed to load plans: {}", e);
                self.plans = LoadState::Failed(e.user_message());
                notify_failure(self.notifier.as_ref(), &e);
                Err(e.into())
            }
        }
    }

    pub fn is_recommended(plan: &SubscriptionPlan) -> bool {
        plan.name.eq_ignore_ascii_case(RECOMMENDED_PLAN)
    }

    /// Free plans go straight to signup; paid plans go to login carrying the plan id.
    pub fn select_plan(&self, plan: &SubscriptionPlan) -> Route {
        let route = if plan.is_free() {
            Route::Signup
        } else {
            Route::Login {
                from: None,
                selected_plan: Some(plan.id),
            }
        };
        self.navigator.navigate(route.clone());
        route
    }
}
