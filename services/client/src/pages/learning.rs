//! services/client/src/pages/learning.rs
//!
//! The learning section: the module list, the contents of one module and the
//! content viewer.
//!
//! Unlike the technique catalog, the module list is filtered on the server:
//! changing the difficulty re-fetches from the difficulty-scoped endpoint.

use std::sync::Arc;
use tracing::{debug, error};
use tradevision_core::domain::{
    Difficulty, LearningContent, LearningModule, ProgressUpdate, UnknownDifficulty,
};
use tradevision_core::filter::ALL;
use tradevision_core::ports::{LearningService, Notifier, PortError, PortResult};
use tradevision_core::route::Route;

use crate::error::ClientError;
use crate::pages::state::{notify_failure, LoadState, PageScope};

/// Stores a load result, reporting a failure once.
fn settle<T>(state: &mut LoadState<T>, notifier: &dyn Notifier, result: PortResult<T>) -> Result<(), ClientError> {
    match result {
        Ok(value) => {
            *state = LoadState::Loaded(value);
            Ok(())
        }
        Err(e) => {
            error!("Failed to load learning data: {}", e);
            *state = LoadState::Failed(e.user_message());
            notify_failure(notifier, &e);
            Err(e.into())
        }
    }
}

//=========================================================================================
// Module List
//=========================================================================================

pub struct LearningModulesPage {
    learning: Arc<dyn LearningService>,
    notifier: Arc<dyn Notifier>,
    scope: PageScope,
    difficulty: Option<Difficulty>,
    modules: LoadState<Vec<LearningModule>>,
}

impl LearningModulesPage {
    pub fn new(learning: Arc<dyn LearningService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            learning,
            notifier,
            scope: PageScope::new(),
            difficulty: None,
            modules: LoadState::Idle,
        }
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn modules(&self) -> &LoadState<Vec<LearningModule>> {
        &self.modules
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.modules = LoadState::Loading;
        let result = match self.difficulty {
            Some(difficulty) => {
                self.scope
                    .run(self.learning.modules_by_difficulty(difficulty))
                    .await
            }
            None => self.scope.run(self.learning.modules()).await,
        };
        settle(&mut self.modules, self.notifier.as_ref(), result)
    }

    /// Changes the difficulty (`"ALL"` for every module) and re-fetches.
    pub async fn set_difficulty(&mut self, label: &str) -> Result<(), ClientError> {
        let difficulty = if label.eq_ignore_ascii_case(ALL) {
            None
        } else {
            Some(
                label
                    .parse::<Difficulty>()
                    .map_err(|e: UnknownDifficulty| ClientError::Internal(e.to_string()))?,
            )
        };
        debug!(?difficulty, "Module difficulty changed");
        self.difficulty = difficulty;
        self.load().await
    }
}

//=========================================================================================
// Module Contents
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleView {
    pub module: LearningModule,
    /// In the order the backend returned them.
    pub contents: Vec<LearningContent>,
}

pub struct ModuleContentsPage {
    learning: Arc<dyn LearningService>,
    notifier: Arc<dyn Notifier>,
    scope: PageScope,
    module_id: i64,
    view: LoadState<ModuleView>,
}

impl ModuleContentsPage {
    pub fn new(learning: Arc<dyn LearningService>, notifier: Arc<dyn Notifier>, module_id: i64) -> Self {
        Self {
            learning,
            notifier,
            scope: PageScope::new(),
            module_id,
            view: LoadState::Idle,
        }
    }

    pub fn view(&self) -> &LoadState<ModuleView> {
        &self.view
    }

    /// Loads the module and its contents concurrently. Both keep the server's order.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.view = LoadState::Loading;
        let learning = self.learning.clone();
        let id = self.module_id;
        let result = self
            .scope
            .run(async move {
                let (module, contents) = futures::try_join!(
                    learning.module_by_id(id),
                    learning.contents_by_module(id)
                )?;
                Ok::<_, PortError>(ModuleView { module, contents })
            })
            .await;
        settle(&mut self.view, self.notifier.as_ref(), result)
    }

    pub fn open_content(&self, content_id: i64) -> Route {
        Route::ContentViewer(content_id)
    }
}

//=========================================================================================
// Content Viewer
//=========================================================================================

pub struct ContentViewerPage {
    learning: Arc<dyn LearningService>,
    notifier: Arc<dyn Notifier>,
    scope: PageScope,
    content_id: i64,
    content: LoadState<LearningContent>,
}

impl ContentViewerPage {
    pub fn new(learning: Arc<dyn LearningService>, notifier: Arc<dyn Notifier>, content_id: i64) -> Self {
        Self {
            learning,
            notifier,
            scope: PageScope::new(),
            content_id,
            content: LoadState::Idle,
        }
    }

    pub fn content(&self) -> &LoadState<LearningContent> {
        &self.content
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.content = LoadState::Loading;
        let result = self.scope.run(self.learning.content_by_id(self.content_id)).await;
        settle(&mut self.content, self.notifier.as_ref(), result)
    }

    /// The module page once the content is known, else the module list.
    pub fn back_target(&self) -> Route {
        match self.content.loaded() {
            Some(content) => Route::ModuleContents(content.module_id),
            None => Route::Learning,
        }
    }

    fn current(&self) -> Result<&LearningContent, ClientError> {
        self.content
            .loaded()
            .ok_or_else(|| ClientError::Internal(format!("content {} is not loaded", self.content_id)))
    }

    fn report(&self, result: PortResult<()>) -> Result<(), ClientError> {
        result.map_err(|e| {
            notify_failure(self.notifier.as_ref(), &e);
            ClientError::from(e)
        })
    }

    /// Likes or unlikes, moving `like_count` by one in the same direction.
    pub async fn toggle_like(&mut self) -> Result<bool, ClientError> {
        let liked = self.current()?.is_liked;
        let result = if liked {
            self.scope.run(self.learning.unlike(self.content_id)).await
        } else {
            self.scope.run(self.learning.like(self.content_id)).await
        };
        self.report(result)?;

        if let Some(content) = self.content.loaded_mut() {
            content.is_liked = !liked;
            content.like_count = if liked {
                content.like_count.saturating_sub(1)
            } else {
                content.like_count + 1
            };
        }
        self.notifier.success(if liked { "Like removed." } else { "Liked!" });
        Ok(!liked)
    }

    pub async fn toggle_bookmark(&mut self) -> Result<bool, ClientError> {
        let bookmarked = self.current()?.is_bookmarked;
        let result = if bookmarked {
            self.scope.run(self.learning.remove_bookmark(self.content_id)).await
        } else {
            self.scope.run(self.learning.bookmark(self.content_id)).await
        };
        self.report(result)?;

        if let Some(content) = self.content.loaded_mut() {
            content.is_bookmarked = !bookmarked;
        }
        self.notifier.success(if bookmarked {
            "Bookmark removed."
        } else {
            "Bookmark added."
        });
        Ok(!bookmarked)
    }

    pub async fn mark_complete(&mut self) -> Result<(), ClientError> {
        if self.current()?.is_completed {
            return Ok(());
        }
        let result = self
            .scope
            .run(self.learning.update_progress(self.content_id, ProgressUpdate::completed()))
            .await
            .map(|_| ());
        self.report(result)?;

        if let Some(content) = self.content.loaded_mut() {
            content.is_completed = true;
        }
        self.notifier.success("Marked as complete!");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{content, module, FakeLearning, Note, RecordingNotifier};
    use tradevision_core::ports::ApiError;

    fn fake() -> FakeLearning {
        FakeLearning {
            modules: vec![
                module(2, Difficulty::Intermediate),
                module(1, Difficulty::Beginner),
            ],
            contents: vec![content(11, 1), content(10, 1), content(20, 2)],
            ..FakeLearning::default()
        }
    }

    #[tokio::test]
    async fn difficulty_change_refetches_from_the_server() {
        let fake = Arc::new(fake());
        let mut page = LearningModulesPage::new(fake.clone(), Arc::new(RecordingNotifier::default()));

        page.load().await.unwrap();
        let ids: Vec<i64> = page.modules().loaded().unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1]);

        page.set_difficulty("BEGINNER").await.unwrap();
        assert_eq!(page.modules().loaded().unwrap().len(), 1);

        page.set_difficulty("ALL").await.unwrap();
        assert_eq!(
            fake.calls(),
            vec!["modules", "modules_by_difficulty:BEGINNER", "modules"]
        );
    }

    #[tokio::test]
    async fn module_page_loads_module_and_contents_in_server_order() {
        let fake = Arc::new(fake());
        let mut page = ModuleContentsPage::new(fake.clone(), Arc::new(RecordingNotifier::default()), 1);

        page.load().await.unwrap();

        let view = page.view().loaded().unwrap();
        assert_eq!(view.module.id, 1);
        let ids: Vec<i64> = view.contents.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![11, 10]);
        let mut calls = fake.calls();
        calls.sort();
        assert_eq!(calls, vec!["contents:1", "module:1"]);
    }

    #[tokio::test]
    async fn missing_module_fails_the_whole_page() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut page = ModuleContentsPage::new(Arc::new(fake()), notifier.clone(), 99);

        assert!(page.load().await.is_err());
        assert_eq!(page.view().error(), Some("Module not found"));
        assert_eq!(notifier.notes(), vec![Note::Error("Module not found".into())]);
    }

    #[tokio::test]
    async fn like_toggle_adjusts_count() {
        let fake = Arc::new(fake());
        let notifier = Arc::new(RecordingNotifier::default());
        let mut page = ContentViewerPage::new(fake.clone(), notifier.clone(), 10);
        page.load().await.unwrap();

        assert!(page.toggle_like().await.unwrap());
        assert_eq!(page.content().loaded().unwrap().like_count, 4);
        assert!(!page.toggle_like().await.unwrap());
        assert_eq!(page.content().loaded().unwrap().like_count, 3);
        assert_eq!(fake.calls(), vec!["content:10", "like:10", "unlike:10"]);
        assert_eq!(
            notifier.notes(),
            vec![Note::Success("Liked!".into()), Note::Success("Like removed.".into())]
        );
    }

    #[tokio::test]
    async fn mark_complete_sends_full_progress() {
        let fake = Arc::new(fake());
        let notifier = Arc::new(RecordingNotifier::default());
        let mut page = ContentViewerPage::new(fake.clone(), notifier.clone(), 10);
        page.load().await.unwrap();

        page.mark_complete().await.unwrap();
        page.mark_complete().await.unwrap();

        assert!(page.content().loaded().unwrap().is_completed);
        assert_eq!(fake.calls(), vec!["content:10", "progress:10:true:100"]);
        assert_eq!(notifier.notes(), vec![Note::Success("Marked as complete!".into())]);
    }

    #[tokio::test]
    async fn toggles_on_a_cancelled_page_are_silent() {
        let fake = Arc::new(fake());
        let notifier = Arc::new(RecordingNotifier::default());
        let mut page = ContentViewerPage::new(fake.clone(), notifier.clone(), 10);
        page.load().await.unwrap();

        page.scope.cancel();

        assert!(page.toggle_like().await.is_err());
        assert!(page.toggle_bookmark().await.is_err());
        let content = page.content().loaded().unwrap();
        assert!(!content.is_liked);
        assert!(!content.is_bookmarked);
        assert_eq!(fake.calls(), vec!["content:10"]);
        assert!(notifier.notes().is_empty());
    }

    #[tokio::test]
    async fn failed_bookmark_leaves_flag() {
        let fake = FakeLearning {
            toggle_error: Some(PortError::Api(ApiError::new(500, "boom"))),
            ..fake()
        };
        let mut page = ContentViewerPage::new(Arc::new(fake), Arc::new(RecordingNotifier::default()), 20);
        page.load().await.unwrap();

        assert!(page.toggle_bookmark().await.is_err());
        assert!(!page.content().loaded().unwrap().is_bookmarked);
    }

    #[tokio::test]
    async fn back_target_follows_the_loaded_module() {
        let mut page = ContentViewerPage::new(Arc::new(fake()), Arc::new(RecordingNotifier::default()), 20);
        assert_eq!(page.back_target(), Route::Learning);
        page.load().await.unwrap();
        assert_eq!(page.back_target(), Route::ModuleContents(2));
    }
}
