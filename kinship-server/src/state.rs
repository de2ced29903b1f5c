//! Application state management

use kinship::friends::FriendshipManager;

use crate::config::ServerConfig;

/// Application state shared across all handlers
#[derive(Debug)]
pub struct AppState {
    /// Kinship friendship manager
    pub manager: FriendshipManager,

    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    /// Create new application state
    pub fn new(manager: FriendshipManager, config: ServerConfig) -> Self {
        Self { manager, config }
    }
}
