//! Leaderboard routes

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;
use common::models::LeaderboardEntry;
use processor::LeaderboardMetric;

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    /// Clamped to the configured maximum
    limit: Option<usize>,
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(metric): Path<String>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    let metric: LeaderboardMetric = metric.parse()?;
    let limit = state.config.clamp_limit(query.limit);

    let leaderboard = state.leaderboards.leaderboard(metric, limit).await?;

    Ok(Json(leaderboard))
}
