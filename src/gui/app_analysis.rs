// Window actions that leave the UI thread or touch the config
// The detector itself runs on the controller's worker thread

use super::FoodeeApp;
use foodee::utils::IMAGE_EXTENSIONS;

impl FoodeeApp {
    pub fn browse_files(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("Images", IMAGE_EXTENSIONS);
        if let Some(dir) = self.config.last_browse_dir.as_ref().filter(|d| d.is_dir()) {
            dialog = dialog.set_directory(dir);
        } else if let Some(dir) = dirs::picture_dir() {
            dialog = dialog.set_directory(dir);
        }

        let Some(path) = dialog.pick_file() else {
            return;
        };

        // Remember where the photos are for the next dialog
        self.config.last_browse_dir = path.parent().map(|p| p.to_path_buf());
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "could not save config");
        }

        self.controller.select_file(path);
    }

    pub fn start_analysis(&mut self) {
        self.controller.analyze();
    }

    /// Check for the outcome from the background thread
    pub fn check_analysis(&mut self) {
        if self.controller.poll() {
            tracing::debug!(status = ?self.controller.status(), "analysis finished");
        }
    }
}
