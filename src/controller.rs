//! The application controller.
//!
//! Owns the session, runs detection on a worker thread and turns worker
//! outcomes, lookups and navigation into state the window renders. It knows
//! nothing about the UI toolkit: the window calls [`AppController::poll`] once
//! per frame and shows whatever [`AppController::notice`] holds as a blocking
//! dialog.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;

use crate::detection::{DetectionResult, Detector};
use crate::error::{FoodeeError, Result};
use crate::messages::{MessageId, Messages};
use crate::recipes::{Recipe, RecipeRepository};
use crate::session::{AnalysisFailure, AnalysisStatus, RecipeList, SessionState};

/// Process-wide collaborators, built once at startup and handed to the controller.
#[derive(Clone)]
pub struct AppContext {
    pub detector: Arc<dyn Detector>,
    pub repository: RecipeRepository,
    pub messages: Messages,
}

/// What an analysis worker reports back. Exactly one per dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Label(String),
    NotFound,
    Error(String),
}

impl From<Result<DetectionResult>> for AnalysisOutcome {
    fn from(result: Result<DetectionResult>) -> Self {
        match result {
            Ok(DetectionResult::Label(name)) => AnalysisOutcome::Label(name),
            Ok(DetectionResult::NotFound) => AnalysisOutcome::NotFound,
            Err(e) => AnalysisOutcome::Error(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Warning,
    Failure,
}

/// A message the user has to acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: MessageId,
    pub detail: Option<String>,
}

impl Notice {
    fn warning(message: MessageId) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message,
            detail: None,
        }
    }

    fn failure(message: MessageId, detail: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            message,
            detail: Some(detail.into()),
        }
    }

    /// The dialog shown for an error reaching the controller boundary
    pub fn from_error(err: &FoodeeError) -> Self {
        match err {
            FoodeeError::NoFileSelected | FoodeeError::NoObjectDetected => {
                Self::warning(MessageId::WarningBody)
            }
            FoodeeError::Inference(detail) => Self::failure(MessageId::InferenceFailedBody, detail),
            FoodeeError::Repository(detail) => {
                Self::failure(MessageId::RepositoryFailedBody, detail)
            }
        }
    }

    pub fn title(&self) -> MessageId {
        match self.kind {
            NoticeKind::Warning => MessageId::WarningTitle,
            NoticeKind::Failure => MessageId::FailureTitle,
        }
    }
}

pub struct AppController {
    context: AppContext,
    session: SessionState,
    status: AnalysisStatus,
    notice: Option<Notice>,
    outcome_receiver: Option<Receiver<AnalysisOutcome>>,
}

impl AppController {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            session: SessionState::default(),
            status: AnalysisStatus::Idle,
            notice: None,
            outcome_receiver: None,
        }
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        tracing::debug!(path = %path.display(), "image selected");
        self.session.selected_file = Some(path);
    }

    pub fn selected_file(&self) -> Option<&PathBuf> {
        self.session.selected_file.as_ref()
    }

    /// Start analysing the selected file on a worker thread.
    ///
    /// Returns whether a worker was dispatched. Without a selection the
    /// detector is not touched and a warning is raised instead. While a
    /// worker is still running further requests are ignored.
    pub fn analyze(&mut self) -> bool {
        if self.status.is_running() {
            tracing::debug!("analysis already running, ignoring request");
            return false;
        }

        let Some(path) = self.session.selected_file.clone() else {
            tracing::info!("analysis requested without a selected file");
            self.raise(&FoodeeError::NoFileSelected);
            return false;
        };

        let (tx, rx) = channel();
        let detector = Arc::clone(&self.context.detector);
        let worker_path = path.clone();

        let spawned = std::thread::Builder::new()
            .name("analysis".to_string())
            .spawn(move || {
                let outcome = AnalysisOutcome::from(detector.detect(&worker_path));
                // The window may have closed in the meantime
                let _ = tx.send(outcome);
            });

        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to spawn analysis worker");
            self.apply_outcome(AnalysisOutcome::Error(e.to_string()));
            return false;
        }

        tracing::info!(path = %path.display(), "analysis started");
        self.status = AnalysisStatus::Running;
        self.outcome_receiver = Some(rx);
        true
    }

    /// Consume the worker's outcome if it has arrived. Returns true when state changed.
    pub fn poll(&mut self) -> bool {
        let Some(receiver) = &self.outcome_receiver else {
            return false;
        };

        let outcome = match receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                AnalysisOutcome::Error("analysis worker stopped without a result".to_string())
            }
        };

        self.outcome_receiver = None;
        self.apply_outcome(outcome);
        true
    }

    fn apply_outcome(&mut self, outcome: AnalysisOutcome) {
        match outcome {
            AnalysisOutcome::Label(name) => {
                tracing::info!(label = %name, "ingredient detected");
                self.session.recipes.clear();
                self.session.detection = Some(DetectionResult::Label(name.clone()));
                self.status = AnalysisStatus::Succeeded(name);
            }
            AnalysisOutcome::NotFound => {
                tracing::info!("no ingredient detected");
                self.session.detection = None;
                self.status = AnalysisStatus::Failed(AnalysisFailure::NotFound);
                self.raise(&FoodeeError::NoObjectDetected);
            }
            AnalysisOutcome::Error(message) => {
                tracing::error!(error = %message, "analysis failed");
                self.session.detection = None;
                self.raise(&FoodeeError::Inference(message.clone()));
                self.status = AnalysisStatus::Failed(AnalysisFailure::Inference(message));
            }
        }
    }

    /// Look up recipes for the detected ingredient and show the first one.
    pub fn show_recipes(&mut self) {
        if !self.can_show_recipes() {
            return;
        }
        let Some(label) = self.session.detected_label().map(str::to_owned) else {
            return;
        };

        self.session.recipes.clear();
        match self.context.repository.find_by_ingredient(&label) {
            Ok(recipes) if recipes.is_empty() => {
                self.notice = Some(Notice::warning(MessageId::NoRecipesBody));
            }
            Ok(recipes) => {
                self.session.recipes = RecipeList::new(recipes);
            }
            Err(e) => {
                tracing::error!(error = %e, ingredient = %label, "recipe lookup failed");
                self.raise(&e);
            }
        }
    }

    fn raise(&mut self, err: &FoodeeError) {
        self.notice = Some(Notice::from_error(err));
    }

    pub fn show_previous(&mut self) {
        self.session.recipes.show_previous();
    }

    pub fn show_next(&mut self) {
        self.session.recipes.show_next();
    }

    pub fn next_tip(&mut self) {
        self.session.tips.advance();
    }

    pub fn current_tip(&self) -> &str {
        self.context.messages.tip(self.session.tips.index())
    }

    pub fn current_recipe(&self) -> Option<&Recipe> {
        self.session.recipes.current()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_running()
    }

    pub fn can_analyze(&self) -> bool {
        !self.status.is_running()
    }

    pub fn can_show_recipes(&self) -> bool {
        !self.status.is_running() && self.session.detected_label().is_some()
    }

    pub fn can_navigate_previous(&self) -> bool {
        self.session.recipes.has_previous()
    }

    pub fn can_navigate_next(&self) -> bool {
        self.session.recipes.has_next()
    }

    pub fn status(&self) -> &AnalysisStatus {
        &self.status
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn messages(&self) -> &Messages {
        &self.context.messages
    }
}
