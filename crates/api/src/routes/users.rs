//! Per-user badge routes

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::state::AppState;
use common::models::EarnedBadge;
use processor::{BadgeFilter, BadgeProgress, EvolvingBadge, NextTierView};

pub async fn badges(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<EarnedBadge>>> {
    Ok(Json(state.badges.user_badges(id).await?))
}

/// Progress toward every active badge, narrowed by the query filter
pub async fn progress(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(filter): Query<BadgeFilter>,
) -> ApiResult<Json<Vec<BadgeProgress>>> {
    Ok(Json(state.badges.filtered_progress(id, &filter).await?))
}

pub async fn next_tier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<NextTierView>> {
    Ok(Json(state.badges.next_tier_badges(id).await?))
}

pub async fn evolving(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<EvolvingBadge>>> {
    Ok(Json(state.badges.evolving_badges(id).await?))
}
