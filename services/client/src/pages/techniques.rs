//! services/client/src/pages/techniques.rs
//!
//! The technique catalog. The full collection is fetched once and every
//! filter change recomputes the visible subset locally.

use std::sync::Arc;
use tracing::error;
use tradevision_core::domain::{Difficulty, TradingTechnique, UnknownDifficulty};
use tradevision_core::filter::{TechniqueFilter, ALL};
use tradevision_core::ports::{Notifier, TechniqueService};

use crate::error::ClientError;
use crate::pages::state::{notify_failure, LoadState, PageScope};

pub struct TechniquesPage {
    techniques: Arc<dyn TechniqueService>,
    notifier: Arc<dyn Notifier>,
    scope: PageScope,
    catalog: LoadState<Vec<TradingTechnique>>,
    filter: TechniqueFilter,
    visible: Vec<TradingTechnique>,
    selected: Option<TradingTechnique>,
}

impl TechniquesPage {
    pub fn new(techniques: Arc<dyn TechniqueService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            techniques,
            notifier,
            scope: PageScope::new(),
            catalog: LoadState::Idle,
            filter: TechniqueFilter::default(),
            visible: Vec::new(),
            selected: None,
        }
    }

    pub fn catalog(&self) -> &LoadState<Vec<TradingTechnique>> {
        &self.catalog
    }

    pub fn filter(&self) -> &TechniqueFilter {
        &self.filter
    }

    /// The techniques matching the current filter, in catalog order.
    pub fn visible(&self) -> &[TradingTechnique] {
        &self.visible
    }

    pub fn selected(&self) -> Option<&TradingTechnique> {
        self.selected.as_ref()
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.catalog = LoadState::Loading;
        let result = self.scope.run(self.techniques.all()).await;
        match result {
            Ok(all) => {
                self.catalog = LoadState::Loaded(all);
                self.recompute();
                Ok(())
            }
            Err(e) => {
                error!("Failed to load techniques: {}", e);
                self.catalog = LoadState::Failed(e.user_message());
                notify_failure(self.notifier.as_ref(), &e);
                Err(e.into())
            }
        }
    }

    fn recompute(&mut self) {
        self.visible = match self.catalog.loaded() {
            Some(all) => self.filter.apply(all),
            None => Vec::new(),
        };
    }

    //-------------------------------------------------------------------------------------
    // Filter Controls
    //-------------------------------------------------------------------------------------

    pub fn set_category(&mut self, label: &str) {
        self.filter.category = TechniqueFilter::category_from_label(label);
        self.recompute();
    }

    /// Accepts a difficulty name or `"ALL"`.
    pub fn set_difficulty(&mut self, label: &str) -> Result<(), UnknownDifficulty> {
        self.filter.difficulty = if label.eq_ignore_ascii_case(ALL) {
            None
        } else {
            Some(label.parse::<Difficulty>()?)
        };
        self.recompute();
        Ok(())
    }

    pub fn set_keyword(&mut self, keyword: &str) {
        self.filter.keyword = keyword.to_string();
        self.recompute();
    }

    //-------------------------------------------------------------------------------------
    // Detail and Bookmarks
    //-------------------------------------------------------------------------------------

    /// Opens the detail view, fetching the technique if it is not in the catalog.
    pub async fn open(&mut self, id: i64) -> Result<(), ClientError> {
        let cached = self
            .catalog
            .loaded()
            .and_then(|all| all.iter().find(|t| t.id == id).cloned());
        let technique = match cached {
            Some(technique) => technique,
            None => self.scope.run(self.techniques.by_id(id)).await.map_err(|e| {
                notify_failure(self.notifier.as_ref(), &e);
                e
            })?,
        };
        self.selected = Some(technique);
        Ok(())
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Adds or removes the bookmark and flips the local flag without re-fetching.
    pub async fn toggle_bookmark(&mut self, id: i64) -> Result<bool, ClientError> {
        let currently = self
            .catalog
            .loaded()
            .and_then(|all| all.iter().find(|t| t.id == id))
            .or(self.selected.as_ref().filter(|t| t.id == id))
            .map(|t| t.is_bookmarked)
            .ok_or_else(|| ClientError::Internal(format!("technique {} is not loaded", id)))?;

        let result = if currently {
            self.scope.run(self.techniques.remove_bookmark(id)).await
        } else {
            self.scope.run(self.techniques.bookmark(id)).await
        };
        if let Err(e) = result {
            notify_failure(self.notifier.as_ref(), &e);
            return Err(e.into());
        }

        let now = !currently;
        if let Some(all) = self.catalog.loaded_mut() {
            for technique in all.iter_mut().filter(|t| t.id == id) {
                technique.is_bookmarked = now;
            }
        }
        if let Some(technique) = self.selected.as_mut().filter(|t| t.id == id) {
            technique.is_bookmarked = now;
        }
        self.recompute();
        self.notifier.success(if now {
            "Bookmark added."
        } else {
            "Bookmark removed."
        });
        Ok(now)
    }
}
