use std::path::PathBuf;
use std::sync::Arc;

use roster_core::{ConvertSettings, RosterBackend};

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub backend: Arc<dyn RosterBackend>,
    pub settings: ConvertSettings,
    /// Where uploads are staged while being converted.
    pub uploads_dir: PathBuf,
    /// Where converted CSV files are saved.
    pub output_dir: PathBuf,
}
