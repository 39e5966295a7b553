//! Server application state.

use crate::config::ServerConfig;
use manager::FileManager;

/// Shared state handed to every handler.
pub struct AppState {
    pub manager: FileManager,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(manager: FileManager, config: ServerConfig) -> Self {
        Self { manager, config }
    }
}
