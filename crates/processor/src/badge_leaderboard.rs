//! Badge leaderboards

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use common::models::{
    BadgeCategory, BadgeDefinition, BadgeLeaderboardEntry, CategoryStats, Rarity, Tier, User,
    UserBadge,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeLeaderboardMetric {
    TotalBadges,
    HighestTier,
    Category,
    Rarity,
}

impl BadgeLeaderboardMetric {
    pub const ALL: [BadgeLeaderboardMetric; 4] = [
        BadgeLeaderboardMetric::TotalBadges,
        BadgeLeaderboardMetric::HighestTier,
        BadgeLeaderboardMetric::Category,
        BadgeLeaderboardMetric::Rarity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalBadges => "total_badges",
            Self::HighestTier => "highest_tier",
            Self::Category => "category",
            Self::Rarity => "rarity",
        }
    }
}

impl FromStr for BadgeLeaderboardMetric {
    type Err = common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|m| m.as_str() == s).ok_or_else(|| {
            common::Error::InvalidInput(format!("unknown badge leaderboard metric '{}'", s))
        })
    }
}

impl fmt::Display for BadgeLeaderboardMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restricts which users are ranked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeFilters {
    /// User holds at least one badge of this category
    pub category: Option<BadgeCategory>,
    /// User holds at least one badge of this rarity
    pub rarity: Option<Rarity>,
    /// User's highest tier is exactly this tier
    pub tier: Option<Tier>,
}

/// Badge tallies of one user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserBadgeStats {
    pub total_badges: u32,
    pub highest_tier: Tier,
    pub highest_tier_count: u32,
    pub category_breakdown: BTreeMap<BadgeCategory, CategoryStats>,
    pub rarity_breakdown: BTreeMap<Rarity, u32>,
}

impl UserBadgeStats {
    /// Tally a user's earned badges. With no badges the highest tier is bronze.
    pub fn from_badges(badges: &[&BadgeDefinition]) -> Self {
        let highest_tier = badges.iter().map(|b| b.tier).max().unwrap_or_default();
        let highest_tier_count = badges.iter().filter(|b| b.tier == highest_tier).count() as u32;

        let mut category_breakdown: BTreeMap<BadgeCategory, CategoryStats> = BTreeMap::new();
        let mut rarity_breakdown: BTreeMap<Rarity, u32> = BTreeMap::new();
        for badge in badges {
            let stats = category_breakdown
                .entry(badge.category)
                .or_insert(CategoryStats {
                    total: 0,
                    highest_tier: badge.tier,
                });
            stats.total += 1;
            stats.highest_tier = stats.highest_tier.max(badge.tier);

            *rarity_breakdown.entry(badge.rarity).or_insert(0) += 1;
        }

        Self {
            total_badges: badges.len() as u32,
            highest_tier,
            highest_tier_count,
            category_breakdown,
            rarity_breakdown,
        }
    }

    fn passes(&self, filters: &BadgeFilters) -> bool {
        filters
            .category
            .map_or(true, |c| self.category_breakdown.contains_key(&c))
            && filters
                .rarity
                .map_or(true, |r| self.rarity_breakdown.contains_key(&r))
            && filters.tier.map_or(true, |t| self.highest_tier == t)
    }

    fn category_total(&self, category: Option<BadgeCategory>) -> u32 {
        match category {
            Some(c) => self.category_breakdown.get(&c).map_or(0, |s| s.total),
            None => self.total_badges,
        }
    }

    fn rarity_total(&self, rarity: Option<Rarity>) -> u32 {
        match rarity {
            Some(r) => self.rarity_breakdown.get(&r).copied().unwrap_or(0),
            None => self.total_badges,
        }
    }
}

/// Group award records into each user's earned definitions.
///
/// Records with a missing or dangling user or badge are skipped, and a badge awarded twice to
/// the same user counts once.
pub fn earned_by_user<'a>(
    users: &[User],
    definitions: &'a [BadgeDefinition],
    awards: &[UserBadge],
) -> HashMap<Uuid, Vec<&'a BadgeDefinition>> {
    let known_users: HashSet<Uuid> = users.iter().map(|u| u.id).collect();
    let by_id: HashMap<&str, &BadgeDefinition> =
        definitions.iter().map(|d| (d.id.as_str(), d)).collect();

    let mut seen: HashSet<(Uuid, &str)> = HashSet::new();
    let mut earned: HashMap<Uuid, Vec<&BadgeDefinition>> = HashMap::new();
    let mut skipped = 0usize;

    for award in awards {
        let user_id = award.user_id.filter(|id| known_users.contains(id));
        let badge = award
            .badge_id
            .as_deref()
            .and_then(|id| by_id.get(id).copied());

        let (Some(user_id), Some(badge)) = (user_id, badge) else {
            skipped += 1;
            continue;
        };

        if seen.insert((user_id, badge.id.as_str())) {
            earned.entry(user_id).or_default().push(badge);
        }
    }

    if skipped > 0 {
        warn!("Skipped {} award records with dangling references", skipped);
    }

    earned
}

/// Rank users holding at least one badge. Equal keys keep population order.
pub fn rank_by_badges(
    metric: BadgeLeaderboardMetric,
    filters: &BadgeFilters,
    limit: usize,
    users: &[User],
    definitions: &[BadgeDefinition],
    awards: &[UserBadge],
) -> Vec<BadgeLeaderboardEntry> {
    let earned = earned_by_user(users, definitions, awards);

    let mut ranked: Vec<(&User, UserBadgeStats)> = users
        .iter()
        .filter_map(|user| {
            let badges = earned.get(&user.id)?;
            Some((user, UserBadgeStats::from_badges(badges)))
        })
        .filter(|(_, stats)| stats.passes(filters))
        .collect();

    match metric {
        BadgeLeaderboardMetric::TotalBadges => {
            ranked.sort_by(|a, b| b.1.total_badges.cmp(&a.1.total_badges));
        }
        BadgeLeaderboardMetric::HighestTier => {
            ranked.sort_by(|a, b| {
                b.1.highest_tier
                    .cmp(&a.1.highest_tier)
                    .then(b.1.highest_tier_count.cmp(&a.1.highest_tier_count))
            });
        }
        BadgeLeaderboardMetric::Category => {
            ranked.sort_by(|a, b| {
                b.1.category_total(filters.category)
                    .cmp(&a.1.category_total(filters.category))
            });
        }
        BadgeLeaderboardMetric::Rarity => {
            ranked.sort_by(|a, b| {
                b.1.rarity_total(filters.rarity)
                    .cmp(&a.1.rarity_total(filters.rarity))
            });
        }
    }
    ranked.truncate(limit);

    debug!(
        "Ranked {} badge holders by {} ({} returned)",
        earned.len(),
        metric,
        ranked.len()
    );

    ranked
        .into_iter()
        .enumerate()
        .map(|(idx, (user, stats))| BadgeLeaderboardEntry {
            rank: (idx + 1) as u32,
            user_id: user.id,
            name: user.display_name(),
            username: user.handle(),
            image: user.image.clone(),
            total_badges: stats.total_badges,
            highest_tier: stats.highest_tier,
            highest_tier_count: stats.highest_tier_count,
            category_breakdown: stats.category_breakdown,
            rarity_breakdown: stats.rarity_breakdown,
        })
        .collect()
}
