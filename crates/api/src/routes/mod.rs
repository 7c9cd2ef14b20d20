//! API routes

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::state::AppState;

pub mod badges;
pub mod health;
pub mod leaderboard;
pub mod users;

/// All API routes bound to shared state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/badges", get(badges::list))
        .route(
            "/api/badges/leaderboard/:metric",
            get(badges::leaderboard),
        )
        .route("/api/users/:id/badges", get(users::badges))
        .route("/api/users/:id/progress", get(users::progress))
        .route("/api/users/:id/next-tier", get(users::next_tier))
        .route("/api/users/:id/evolving", get(users::evolving))
        .route("/api/leaderboard/:metric", get(leaderboard::get))
        .with_state(state)
}
