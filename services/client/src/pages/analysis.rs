//! services/client/src/pages/analysis.rs
//!
//! The chart-analysis workflow: stage an image, upload it, request the
//! analysis, and show the result next to the user's history.
//!
//! The workflow stage is published on a watch channel so a view can follow
//! the progress of `upload_and_analyze` while it runs.

use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tradevision_core::domain::{AnalysisHistory, ChartAnalysis, ChartUpload};
use tradevision_core::ports::{ChartService, Notifier, PortError};
use tradevision_core::validation::{validate_chart_file, FileRejection};

use crate::error::ClientError;
use crate::pages::state::{notify_failure, LoadState, PageScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisStage {
    #[default]
    Empty,
    /// A valid image is selected and ready to upload.
    Staged,
    Uploading,
    Analyzing,
    Complete,
}

/// An image picked by the user, with its detected MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub upload: ChartUpload,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            upload: ChartUpload {
                file_name: file_name.into(),
                mime_type: mime_type.into(),
                bytes,
            },
        }
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    /// Files the upload gate would refuse are rejected before being read.
    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let size = tokio::fs::metadata(path).await?.len();
        validate_chart_file(&mime_type, size)?;
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "chart".to_string());
        Ok(Self::new(file_name, mime_type, Bytes::from(bytes)))
    }
}

pub struct AnalysisPage {
    charts: Arc<dyn ChartService>,
    notifier: Arc<dyn Notifier>,
    scope: PageScope,
    stage: watch::Sender<AnalysisStage>,
    selected: Option<SelectedFile>,
    result: Option<ChartAnalysis>,
    history: LoadState<Vec<AnalysisHistory>>,
}

impl AnalysisPage {
    pub fn new(charts: Arc<dyn ChartService>, notifier: Arc<dyn Notifier>) -> Self {
        let (stage, _) = watch::channel(AnalysisStage::Empty);
        Self {
            charts,
            notifier,
            scope: PageScope::new(),
            stage,
            selected: None,
            result: None,
            history: LoadState::Idle,
        }
    }

    pub fn stage(&self) -> AnalysisStage {
        *self.stage.borrow()
    }

    pub fn subscribe_stage(&self) -> watch::Receiver<AnalysisStage> {
        self.stage.subscribe()
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn result(&self) -> Option<&ChartAnalysis> {
        self.result.as_ref()
    }

    pub fn history(&self) -> &LoadState<Vec<AnalysisHistory>> {
        &self.history
    }

    fn set_stage(&self, stage: AnalysisStage) {
        self.stage.send_replace(stage);
    }

    //-------------------------------------------------------------------------------------
    // Staging
    //-------------------------------------------------------------------------------------

    /// Stages `file` if it is an image of at most 10 MB. A rejected file is
    /// reported and leaves the current stage untouched.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), FileRejection> {
        if let Err(rejection) = validate_chart_file(&file.upload.mime_type, file.upload.size()) {
            warn!(file = %file.upload.file_name, "Chart file rejected: {}", rejection);
            self.notifier.error(&rejection.to_string());
            return Err(rejection);
        }
        self.selected = Some(file);
        self.result = None;
        self.set_stage(AnalysisStage::Staged);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.selected = None;
        self.result = None;
        self.set_stage(AnalysisStage::Empty);
    }

    //-------------------------------------------------------------------------------------
    // Upload and Analysis
    //-------------------------------------------------------------------------------------

    pub async fn upload_and_analyze(&mut self) -> Result<ChartAnalysis, ClientError> {
        let Some(file) = self.selected.clone() else {
            self.notifier.error("Please select a chart image first.");
            return Err(ClientError::Internal("no chart image is staged".to_string()));
        };

        // 1. Upload the image.
        self.set_stage(AnalysisStage::Uploading);
        let uploaded = match self.scope.run(self.charts.upload_chart(&file.upload)).await {
            Ok(chart) => chart,
            Err(e) => return Err(self.fail(e)),
        };
        info!(chart_id = uploaded.id, "Chart uploaded");

        // 2. Request the analysis of the uploaded chart.
        self.set_stage(AnalysisStage::Analyzing);
        let analyzed = match self.scope.run(self.charts.analyze_chart(uploaded.id)).await {
            Ok(chart) => chart,
            Err(e) => return Err(self.fail(e)),
        };

        // 3. Show the result and refresh the history.
        self.result = Some(analyzed.clone());
        self.set_stage(AnalysisStage::Complete);
        self.notifier.success("Chart analysis completed!");
        if let Err(e) = self.load_history().await {
            warn!("History refresh after analysis failed: {}", e);
        }
        Ok(analyzed)
    }

    /// Returns to `Staged` with the same file so the user can retry.
    fn fail(&self, e: PortError) -> ClientError {
        self.set_stage(AnalysisStage::Staged);
        if e != PortError::Cancelled {
            error!("Chart analysis failed: {}", e);
            self.notifier.error(&e.user_message());
        }
        ClientError::Port(e)
    }

    //-------------------------------------------------------------------------------------
    // History
    //-------------------------------------------------------------------------------------

    pub async fn load_history(&mut self) -> Result<(), ClientError> {
        self.history = LoadState::Loading;
        match self.scope.run(self.charts.history()).await {
            Ok(entries) => {
                self.history = LoadState::Loaded(entries);
                Ok(())
            }
            Err(e) => {
                self.history = LoadState::Failed(e.user_message());
                notify_failure(self.notifier.as_ref(), &e);
                Err(e.into())
            }
        }
    }

    /// Removes the entry locally first; a failed delete puts the list back.
    pub async fn delete_analysis(&mut self, id: i64) -> Result<(), ClientError> {
        let previous = self.history.loaded().cloned();
        if let Some(entries) = self.history.loaded_mut() {
            entries.retain(|entry| entry.id != id);
        }

        match self.scope.run(self.charts.delete_analysis(id)).await {
            Ok(()) => {
                self.notifier.success("Analysis deleted.");
                Ok(())
            }
            Err(e) => {
                if let Some(entries) = previous {
                    self.history = LoadState::Loaded(entries);
                }
                notify_failure(self.notifier.as_ref(), &e);
                Err(e.into())
            }
        }
    }
}
