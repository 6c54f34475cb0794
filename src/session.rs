//! Per-window session state: what is selected, what was detected and which
//! recipe is on screen. Nothing here is persisted.

use std::path::PathBuf;

use crate::detection::DetectionResult;
use crate::messages::TIPS;
use crate::recipes::Recipe;

/// Recipes from the last lookup plus the one being shown.
#[derive(Debug, Clone, Default)]
pub struct RecipeList {
    recipes: Vec<Recipe>,
    cursor: usize,
}

impl RecipeList {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Position of the shown recipe, `None` when the list is empty
    pub fn cursor(&self) -> Option<usize> {
        (!self.recipes.is_empty()).then_some(self.cursor)
    }

    pub fn current(&self) -> Option<&Recipe> {
        self.recipes.get(self.cursor)
    }

    pub fn has_previous(&self) -> bool {
        !self.recipes.is_empty() && self.cursor > 0
    }

    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.recipes.len()
    }

    /// Step back one recipe; stays put at the first one.
    pub fn show_previous(&mut self) -> bool {
        if self.has_previous() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward one recipe; stays put at the last one.
    pub fn show_next(&mut self) -> bool {
        if self.has_next() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.recipes.clear();
        self.cursor = 0;
    }
}

/// Cyclic index into the fixed tip list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TipRotation {
    index: usize,
}

impl TipRotation {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % TIPS.len();
        self.index
    }
}

/// Why the last analysis did not produce a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisFailure {
    NotFound,
    Inference(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Running,
    Succeeded(String),
    Failed(AnalysisFailure),
}

impl AnalysisStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, AnalysisStatus::Running)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub selected_file: Option<PathBuf>,
    pub detection: Option<DetectionResult>,
    pub recipes: RecipeList,
    pub tips: TipRotation,
}

impl SessionState {
    /// Label of the last successful analysis
    pub fn detected_label(&self) -> Option<&str> {
        self.detection.as_ref().and_then(DetectionResult::label)
    }
}
