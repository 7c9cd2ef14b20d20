//! Domain models
//!
//! Stored records are deserialized leniently: missing or unrecognized enum values resolve to
//! their defaults here, once, so the engine never repeats `tier || bronze` style fallbacks.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Activity metric names emitted by the activity reader
pub mod metrics {
    pub const STARTUPS_CREATED: &str = "startups_created";
    pub const COMMENTS_POSTED: &str = "comments_posted";
    pub const FOLLOWERS_GAINED: &str = "followers_gained";
    pub const USERS_FOLLOWED: &str = "users_followed";
    pub const TOTAL_LIKES: &str = "totalLikes";
    pub const TOTAL_VIEWS: &str = "totalViews";
    pub const REPORTS: &str = "reports";
    pub const DAYS_ACTIVE: &str = "daysActive";
    pub const WEEKEND_POSTS: &str = "weekendPosts";
    pub const NIGHT_POSTS: &str = "nightPosts";
    pub const EARLY_POSTS: &str = "earlyPosts";
    pub const WEEKLY_STREAK: &str = "weeklyStreak";
}

/// Returned when a string names no variant of a model enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

/// Deserialize an optional string field, resolving absent or unknown values to the default
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
}

fn default_true() -> bool {
    true
}

/// Badge tier. Declaration order is the progression order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Diamond,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "bronze",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
            Self::Diamond => "diamond",
        }
    }
}

impl FromStr for Tier {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Badge rarity, a display weight independent of tier
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythical,
}

impl Rarity {
    pub const ALL: [Rarity; 6] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
            Self::Mythical => "mythical",
        }
    }
}

impl FromStr for Rarity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Badge family. Badges sharing a category form an evolving badge across tiers.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Creator,
    Community,
    Social,
    #[default]
    Achievement,
    Special,
}

impl BadgeCategory {
    pub const ALL: [BadgeCategory; 5] = [
        BadgeCategory::Creator,
        BadgeCategory::Community,
        BadgeCategory::Social,
        BadgeCategory::Achievement,
        BadgeCategory::Special,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creator => "creator",
            Self::Community => "community",
            Self::Social => "social",
            Self::Achievement => "achievement",
            Self::Special => "special",
        }
    }
}

impl FromStr for BadgeCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl fmt::Display for BadgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Window a criteria counter is measured over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    #[default]
    AllTime,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl FromStr for Timeframe {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all_time" | "alltime" | "all" => Ok(Self::AllTime),
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" => Ok(Self::Yearly),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// How a sub-requirement joins the other requirements of a combination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    #[default]
    And,
    Or,
}

impl FromStr for Operator {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// A single metric threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub metric: String,
    #[serde(default)]
    pub target: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub timeframe: Timeframe,
}

/// One leg of a combination criteria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubRequirement {
    pub metric: String,
    #[serde(default)]
    pub target: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub timeframe: Timeframe,
    #[serde(default, deserialize_with = "lenient")]
    pub operator: Operator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    #[serde(default)]
    pub metric: String,
    #[serde(default)]
    pub target: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub timeframe: Timeframe,
    #[serde(default)]
    pub requirements: Vec<SubRequirement>,
}

/// The rule deciding how progress is measured for a badge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Criteria {
    /// Current is the counter value
    Count(Threshold),
    /// Current is a consecutive-period counter
    Streak(Threshold),
    /// Current is a precomputed quality score
    Quality(Threshold),
    /// Condition met or not
    Date(Threshold),
    /// Condition met or not
    Time(Threshold),
    Combination(Combination),
    /// Opaque flag supplied by the activity reader
    Special(Threshold),
}

impl Criteria {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Count(_) => "count",
            Self::Streak(_) => "streak",
            Self::Quality(_) => "quality",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::Combination(_) => "combination",
            Self::Special(_) => "special",
        }
    }

    pub fn metric(&self) -> &str {
        match self {
            Self::Count(t)
            | Self::Streak(t)
            | Self::Quality(t)
            | Self::Date(t)
            | Self::Time(t)
            | Self::Special(t) => &t.metric,
            Self::Combination(c) => &c.metric,
        }
    }
}

/// A badge definition from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient")]
    pub category: BadgeCategory,
    #[serde(default, deserialize_with = "lenient")]
    pub tier: Tier,
    #[serde(default, deserialize_with = "lenient")]
    pub rarity: Rarity,
    #[serde(default = "default_true", alias = "isActive")]
    pub is_active: bool,
    pub criteria: Criteria,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A badge award record. References may dangle when the user or badge was deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBadge {
    #[serde(default, alias = "user")]
    pub user_id: Option<Uuid>,
    #[serde(default, alias = "badge")]
    pub badge_id: Option<String>,
    pub earned_at: DateTime<Utc>,
}

/// A platform user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub followers: Vec<Uuid>,
    #[serde(default)]
    pub following: Vec<Uuid>,
}

impl User {
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("Unknown User")
            .to_string()
    }

    pub fn handle(&self) -> String {
        self.username
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("unknown")
            .to_string()
    }
}

/// A showcased startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Startup {
    pub id: Uuid,
    #[serde(default, alias = "author")]
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub views: u64,
    pub created_at: DateTime<Utc>,
}

/// A comment on a startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    #[serde(default, alias = "author")]
    pub author_id: Option<Uuid>,
    #[serde(default, alias = "startup")]
    pub startup_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Per-user activity counters keyed by metric name. Unknown metrics read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivitySnapshot(BTreeMap<String, f64>);

impl ActivitySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: &str) -> f64 {
        self.0.get(metric).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, metric: impl Into<String>, value: f64) {
        self.0.insert(metric.into(), value);
    }

    pub fn with(mut self, metric: impl Into<String>, value: f64) -> Self {
        self.set(metric, value);
        self
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ActivitySnapshot {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Derived progress toward one badge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub badge_id: String,
    pub current: f64,
    pub target: f64,
    /// Always within 0..=100
    pub percentage: u8,
}

/// An earned badge joined to its definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarnedBadge {
    pub badge: BadgeDefinition,
    pub earned_at: DateTime<Utc>,
}

/// Leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: Uuid,
    pub name: String,
    pub username: String,
    pub image: Option<String>,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

/// Per-category badge tally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total: u32,
    pub highest_tier: Tier,
}

/// Badge leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeLeaderboardEntry {
    pub rank: u32,
    pub user_id: Uuid,
    pub name: String,
    pub username: String,
    pub image: Option<String>,
    pub total_badges: u32,
    pub highest_tier: Tier,
    pub highest_tier_count: u32,
    pub category_breakdown: BTreeMap<BadgeCategory, CategoryStats>,
    pub rarity_breakdown: BTreeMap<Rarity, u32>,
}
