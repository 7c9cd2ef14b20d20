//! Badge evaluation and leaderboard aggregation

pub mod badge_leaderboard;
pub mod filter;
pub mod leaderboard;
pub mod progress;
pub mod service;
pub mod tiers;

#[cfg(test)]
mod leaderboard_test;

pub use badge_leaderboard::{BadgeFilters, BadgeLeaderboardMetric};
pub use filter::{BadgeFilter, BadgeStatus};
pub use leaderboard::LeaderboardMetric;
pub use progress::BadgeProgress;
pub use service::{BadgeService, LeaderboardService};
pub use tiers::{EvolvingBadge, NextTierView};
