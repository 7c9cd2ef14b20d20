//! Badge filtering for catalog and progress views

use common::models::{BadgeCategory, Rarity, Tier};
use serde::{Deserialize, Serialize};

use crate::progress::BadgeProgress;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeStatus {
    #[default]
    All,
    Earned,
    Unearned,
    /// Unearned with some progress
    InProgress,
}

/// Every set field must match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeFilter {
    pub category: Option<BadgeCategory>,
    pub rarity: Option<Rarity>,
    pub tier: Option<Tier>,
    #[serde(default)]
    pub status: BadgeStatus,
    /// Case-insensitive match on name or description
    pub search: Option<String>,
}

impl BadgeFilter {
    pub fn matches(&self, entry: &BadgeProgress) -> bool {
        let badge = &entry.badge;

        if self.category.is_some_and(|c| c != badge.category)
            || self.rarity.is_some_and(|r| r != badge.rarity)
            || self.tier.is_some_and(|t| t != badge.tier)
        {
            return false;
        }

        let status_ok = match self.status {
            BadgeStatus::All => true,
            BadgeStatus::Earned => entry.earned,
            BadgeStatus::Unearned => !entry.earned,
            BadgeStatus::InProgress => {
                !entry.earned && entry.progress.percentage > 0 && entry.progress.percentage < 100
            }
        };
        if !status_ok {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                badge.name.to_lowercase().contains(&needle)
                    || badge.description.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

pub fn filter(badges: Vec<BadgeProgress>, criteria: &BadgeFilter) -> Vec<BadgeProgress> {
    badges.into_iter().filter(|b| criteria.matches(b)).collect()
}
