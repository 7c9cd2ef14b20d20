//! Badge catalog routes

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;
use common::models::{BadgeCategory, BadgeDefinition, BadgeLeaderboardEntry, Rarity, Tier};
use processor::{BadgeFilters, BadgeLeaderboardMetric};

pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<BadgeDefinition>>> {
    Ok(Json(state.badges.all_badges().await?))
}

#[derive(Deserialize)]
pub struct BadgeLeaderboardQuery {
    category: Option<BadgeCategory>,
    rarity: Option<Rarity>,
    tier: Option<Tier>,
    limit: Option<usize>,
}

pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Path(metric): Path<String>,
    Query(query): Query<BadgeLeaderboardQuery>,
) -> ApiResult<Json<Vec<BadgeLeaderboardEntry>>> {
    let metric: BadgeLeaderboardMetric = metric.parse()?;
    let filters = BadgeFilters {
        category: query.category,
        rarity: query.rarity,
        tier: query.tier,
    };
    let limit = state.config.clamp_limit(query.limit);

    let entries = state
        .leaderboards
        .badge_leaderboard(metric, &filters, limit)
        .await?;

    Ok(Json(entries))
}
