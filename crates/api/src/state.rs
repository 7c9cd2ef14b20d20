//! Application state

use std::sync::Arc;

use common::{ActivityReader, Config};
use processor::{BadgeService, LeaderboardService};

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub badges: BadgeService,
    pub leaderboards: LeaderboardService,
}

impl AppState {
    pub fn new(config: Config, reader: Arc<dyn ActivityReader>) -> Self {
        Self {
            config,
            badges: BadgeService::new(reader.clone()),
            leaderboards: LeaderboardService::new(reader),
        }
    }
}
