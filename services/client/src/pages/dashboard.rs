//! services/client/src/pages/dashboard.rs
//!
//! The landing view after login: learning progress and the most recent analyses.

use std::sync::Arc;
use tracing::error;
use tradevision_core::domain::{AnalysisHistory, LearningStats};
use tradevision_core::ports::{ChartService, LearningService, Notifier, PortError};

use crate::error::ClientError;
use crate::pages::state::{notify_failure, LoadState, PageScope};

/// How many analyses the dashboard lists.
pub const RECENT_ANALYSES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub stats: LearningStats,
    pub recent_analyses: Vec<AnalysisHistory>,
    /// Percentage of completed contents, 0 when there are none.
    pub completion_rate: u32,
}

pub struct DashboardPage {
    learning: Arc<dyn LearningService>,
    charts: Arc<dyn ChartService>,
    notifier: Arc<dyn Notifier>,
    scope: PageScope,
    data: LoadState<DashboardData>,
}

impl DashboardPage {
    pub fn new(
        learning: Arc<dyn LearningService>,
        charts: Arc<dyn ChartService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            learning,
            charts,
            notifier,
            scope: PageScope::new(),
            data: LoadState::Idle,
        }
    }

    pub fn data(&self) -> &LoadState<DashboardData> {
        &self.data
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.data = LoadState::Loading;
        let learning = self.learning.clone();
        let charts = self.charts.clone();
        let result = self
            .scope
            .run(async move {
                let (stats, history) = futures::try_join!(learning.stats(), charts.history())?;
                Ok::<_, PortError>((stats, history))
            })
            .await;

        match result {
            Ok((stats, history)) => {
                let completion_rate = stats.completion_rate();
                let recent_analyses = history.into_iter().take(RECENT_ANALYSES).collect();
                self.data = LoadState::Loaded(DashboardData {
                    stats,
                    recent_analyses,
                    completion_rate,
                });
                Ok(())
            }
            Err(e) => {
                error!("Failed to load the dashboard: {}", e);
                self.data = LoadState::Failed(e.user_message());
                notify_failure(self.notifier.as_ref(), &e);
                Err(e.into())
            }
        }
    }
}
