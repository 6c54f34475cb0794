// Library exports for reuse by the GUI and the CLI
pub mod cli;
pub mod config_file;
pub mod controller;
pub mod detection;
pub mod error;
pub mod logging;
pub mod messages;
pub mod recipes;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config_file::AppConfig;
pub use controller::{AnalysisOutcome, AppContext, AppController, Notice, NoticeKind};
pub use detection::{DetectionResult, Detector, RawDetection, CONFIDENCE_THRESHOLD};
pub use error::{FoodeeError, Result};
pub use messages::{MessageId, Messages};
pub use recipes::{Recipe, RecipeRepository};
pub use session::{AnalysisFailure, AnalysisStatus, RecipeList, SessionState};

/// Build the shared application context from a loaded config.
pub fn build_context(config: &AppConfig) -> Result<AppContext> {
    Ok(AppContext {
        detector: detection::create_default_detector(config)?,
        repository: RecipeRepository::new(config.database_path()),
        messages: config.messages(),
    })
}
