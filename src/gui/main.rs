// GUI entry point for foodee
// This binary provides the desktop window for ingredient analysis and recipe browsing

use std::sync::Arc;

use eframe::egui;
use foodee::detection::detection_stub::UnavailableDetector;
use foodee::{AppConfig, AppContext, MessageId, RecipeRepository};

mod app;
use app::FoodeeApp;

fn main() -> Result<(), eframe::Error> {
    let config = match AppConfig::load(None) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Ignoring unreadable config: {:#}", e);
            AppConfig::default()
        }
    };

    // Dropping the guard flushes buffered log lines, so it lives until exit
    let _log_guard = match foodee::logging::init_file_logging(&config.log_dir()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {:#}", e);
            None
        }
    };

    let context = match foodee::build_context(&config) {
        Ok(context) => context,
        Err(e) => {
            // Keep the window usable; every analysis will report why it cannot run
            tracing::error!(error = %e, "detector unavailable");
            AppContext {
                detector: Arc::new(UnavailableDetector::new(e.to_string())),
                repository: RecipeRepository::new(config.database_path()),
                messages: config.messages(),
            }
        }
    };

    let title = context.messages.get(MessageId::AppTitle).to_string();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([901.0, 600.0])
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(FoodeeApp::new(cc, config, context)))),
    )
}
