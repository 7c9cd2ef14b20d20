//! Read operations for badge and leaderboard views
//!
//! Each call reads fresh records through the activity reader and hands them to the pure
//! evaluation and ranking functions. Nothing is cached between calls.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use common::models::{
    BadgeDefinition, BadgeLeaderboardEntry, EarnedBadge, LeaderboardEntry, UserBadge,
};
use common::{ActivityReader, Error, Result};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::badge_leaderboard::{self, BadgeFilters, BadgeLeaderboardMetric};
use crate::filter::{self, BadgeFilter};
use crate::leaderboard::{self, LeaderboardMetric};
use crate::progress::{self, BadgeProgress};
use crate::tiers::{self, EvolvingBadge, NextTierView};

fn earned_ids(awards: &[UserBadge]) -> HashSet<String> {
    awards.iter().filter_map(|a| a.badge_id.clone()).collect()
}

fn active(definitions: Vec<BadgeDefinition>) -> Vec<BadgeDefinition> {
    definitions.into_iter().filter(|b| b.is_active).collect()
}

/// Per-user badge views
#[derive(Clone)]
pub struct BadgeService {
    reader: Arc<dyn ActivityReader>,
}

impl BadgeService {
    pub fn new(reader: Arc<dyn ActivityReader>) -> Self {
        Self { reader }
    }

    /// Active catalog
    pub async fn all_badges(&self) -> Result<Vec<BadgeDefinition>> {
        let definitions = self.reader.list_badge_definitions().await?;
        Ok(active(definitions))
    }

    /// Earned badges joined to their definitions, most recent first
    pub async fn user_badges(&self, user_id: Uuid) -> Result<Vec<EarnedBadge>> {
        let (definitions, mut awards) = tokio::try_join!(
            self.reader.list_badge_definitions(),
            self.reader.list_earned_badges(user_id),
        )?;

        let by_id: HashMap<&str, &BadgeDefinition> =
            definitions.iter().map(|d| (d.id.as_str(), d)).collect();

        // Newest first, so a duplicate award keeps its latest timestamp
        awards.sort_by(|a, b| b.earned_at.cmp(&a.earned_at));

        let mut seen = HashSet::new();
        let mut earned: Vec<EarnedBadge> = Vec::with_capacity(awards.len());
        for award in &awards {
            let Some(badge) = award
                .badge_id
                .as_deref()
                .and_then(|id| by_id.get(id).copied())
            else {
                warn!(
                    "Skipping award {:?} for user {}: badge not in catalog",
                    award.badge_id, user_id
                );
                continue;
            };
            if seen.insert(badge.id.as_str()) {
                earned.push(EarnedBadge {
                    badge: badge.clone(),
                    earned_at: award.earned_at,
                });
            }
        }

        Ok(earned)
    }

    /// Progress toward every active badge
    pub async fn badge_progress(&self, user_id: Uuid) -> Result<Vec<BadgeProgress>> {
        let (definitions, snapshot, awards) = tokio::try_join!(
            self.reader.list_badge_definitions(),
            self.reader.user_activity_snapshot(user_id),
            self.reader.list_earned_badges(user_id),
        )?;

        let badges = active(definitions);
        let evaluated = progress::evaluate_all(&snapshot, &badges, &earned_ids(&awards));

        info!(
            "Evaluated {} badges for user {} ({} earned)",
            evaluated.len(),
            user_id,
            evaluated.iter().filter(|b| b.earned).count()
        );

        Ok(evaluated)
    }

    /// Progress narrowed by a filter
    pub async fn filtered_progress(
        &self,
        user_id: Uuid,
        criteria: &BadgeFilter,
    ) -> Result<Vec<BadgeProgress>> {
        let evaluated = self.badge_progress(user_id).await?;
        Ok(filter::filter(evaluated, criteria))
    }

    /// Badges left to earn in the user's active tier
    pub async fn next_tier_badges(&self, user_id: Uuid) -> Result<NextTierView> {
        let evaluated = self.badge_progress(user_id).await?;
        Ok(tiers::next_tier_badges(&evaluated))
    }

    /// Every active badge as a stage of its category's evolving badge
    pub async fn evolving_badges(&self, user_id: Uuid) -> Result<Vec<EvolvingBadge>> {
        let evaluated = self.badge_progress(user_id).await?;

        let badges: Vec<BadgeDefinition> = evaluated.iter().map(|e| e.badge.clone()).collect();
        let earned: HashSet<String> = evaluated
            .iter()
            .filter(|e| e.earned)
            .map(|e| e.badge.id.clone())
            .collect();
        let records: Vec<_> = evaluated.into_iter().map(|e| e.progress).collect();

        Ok(tiers::build_evolving_view(&badges, &earned, &records))
    }
}

/// Population-wide rankings.
///
/// Source reads fan out concurrently. If any of them fails the whole ranking fails with an
/// error naming the source; partial results are never returned.
#[derive(Clone)]
pub struct LeaderboardService {
    reader: Arc<dyn ActivityReader>,
}

impl LeaderboardService {
    pub fn new(reader: Arc<dyn ActivityReader>) -> Self {
        Self { reader }
    }

    pub async fn leaderboard(
        &self,
        metric: LeaderboardMetric,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>> {
        info!("Building {} leaderboard (limit {})", metric, limit);
        let name = metric.as_str();

        let users = async {
            self.reader
                .list_all_users()
                .await
                .map_err(|e| Error::source_failed("users", name, e))
        };
        let startups = async {
            if !metric.needs_startups() {
                return Ok(Vec::new());
            }
            self.reader
                .list_startups()
                .await
                .map_err(|e| Error::source_failed("startups", name, e))
        };
        let comments = async {
            if !metric.needs_comments() {
                return Ok(Vec::new());
            }
            self.reader
                .list_comments()
                .await
                .map_err(|e| Error::source_failed("comments", name, e))
        };

        let (users, startups, comments) =
            tokio::try_join!(users, startups, comments).map_err(|e| {
                error!("Leaderboard {} aborted: {}", metric, e);
                e
            })?;

        Ok(leaderboard::rank(metric, &users, &startups, &comments, limit))
    }

    pub async fn badge_leaderboard(
        &self,
        metric: BadgeLeaderboardMetric,
        filters: &BadgeFilters,
        limit: usize,
    ) -> Result<Vec<BadgeLeaderboardEntry>> {
        info!(
            "Building {} badge leaderboard (limit {}, filters {:?})",
            metric, limit, filters
        );
        let name = metric.as_str();

        let users = async {
            self.reader
                .list_all_users()
                .await
                .map_err(|e| Error::source_failed("users", name, e))
        };
        let definitions = async {
            self.reader
                .list_badge_definitions()
                .await
                .map_err(|e| Error::source_failed("badges", name, e))
        };
        let awards = async {
            self.reader
                .list_all_earned_badges()
                .await
                .map_err(|e| Error::source_failed("user_badges", name, e))
        };

        let (users, definitions, awards) = tokio::try_join!(users, definitions, awards)
            .map_err(|e| {
                error!("Badge leaderboard {} aborted: {}", metric, e);
                e
            })?;

        Ok(badge_leaderboard::rank_by_badges(
            metric,
            filters,
            limit,
            &users,
            &definitions,
            &awards,
        ))
    }
}
