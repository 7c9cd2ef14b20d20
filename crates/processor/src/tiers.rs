//! Tier progression
//!
//! Picks the tier the UI should emphasize and presents badge families (badges sharing a
//! category) as one evolving badge across tiers.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::ops::Bound::{Excluded, Unbounded};

use common::models::{BadgeCategory, BadgeDefinition, ProgressRecord, Tier};
use serde::Serialize;

use crate::progress::BadgeProgress;

/// Earned/total tally of one tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierCompletion {
    pub tier: Tier,
    pub earned: usize,
    pub total: usize,
    /// 0..=100, zero for an empty tier
    pub completion: f64,
}

impl TierCompletion {
    pub fn unearned(&self) -> usize {
        self.total - self.earned
    }
}

/// Completion of every tier in progression order
pub fn tier_completion(
    badges: &[BadgeDefinition],
    earned_ids: &HashSet<String>,
) -> Vec<TierCompletion> {
    Tier::ALL
        .into_iter()
        .map(|tier| {
            let in_tier = badges.iter().filter(|b| b.tier == tier);
            let total = in_tier.clone().count();
            let earned = in_tier.filter(|b| earned_ids.contains(&b.id)).count();
            let completion = if total > 0 {
                earned as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            TierCompletion {
                tier,
                earned,
                total,
                completion,
            }
        })
        .collect()
}

/// The tier currently "in motion", or the next one to start.
///
/// Deterministic for identical inputs. `None` only when there are no badges at all.
pub fn select_active_tier(
    badges: &[BadgeDefinition],
    earned_ids: &HashSet<String>,
) -> Option<Tier> {
    let tiers = tier_completion(badges, earned_ids);

    // Partially earned
    if let Some(t) = tiers
        .iter()
        .find(|t| t.completion > 0.0 && t.completion < 100.0 && t.unearned() > 0)
    {
        return Some(t.tier);
    }

    // Not started yet
    if let Some(t) = tiers
        .iter()
        .find(|t| t.completion == 0.0 && t.unearned() > 0)
    {
        return Some(t.tier);
    }

    let highest_unearned = badges
        .iter()
        .filter(|b| !earned_ids.contains(&b.id))
        .map(|b| b.tier)
        .max();

    highest_unearned.or_else(|| {
        badges
            .iter()
            .filter(|b| earned_ids.contains(&b.id))
            .map(|b| b.tier)
            .max()
    })
}

/// One badge presented as a stage of its category's evolving badge
#[derive(Debug, Clone, Serialize)]
pub struct EvolvingBadge {
    pub badge: BadgeDefinition,
    pub progress: ProgressRecord,
    pub earned: bool,
    /// Earned badges in the same category and tier
    pub progress_in_category: usize,
    /// All badges in the same category and tier
    pub total_in_category: usize,
    /// Closest lower tier of this category with an earned badge
    pub previous_tier: Option<Tier>,
    /// Closest higher tier of this category
    pub next_tier: Option<Tier>,
    pub is_max_tier: bool,
}

/// Build the evolving view for every badge, in input order
pub fn build_evolving_view(
    badges: &[BadgeDefinition],
    earned_ids: &HashSet<String>,
    progress: &[ProgressRecord],
) -> Vec<EvolvingBadge> {
    let progress_by_id: HashMap<&str, &ProgressRecord> =
        progress.iter().map(|p| (p.badge_id.as_str(), p)).collect();

    let mut groups: HashMap<(BadgeCategory, Tier), (usize, usize)> = HashMap::new();
    let mut tiers_in_category: BTreeMap<BadgeCategory, BTreeSet<Tier>> = BTreeMap::new();
    let mut earned_tiers: BTreeMap<BadgeCategory, BTreeSet<Tier>> = BTreeMap::new();

    for badge in badges {
        let earned = earned_ids.contains(&badge.id);
        let group = groups.entry((badge.category, badge.tier)).or_default();
        group.1 += 1;
        if earned {
            group.0 += 1;
            earned_tiers
                .entry(badge.category)
                .or_default()
                .insert(badge.tier);
        }
        tiers_in_category
            .entry(badge.category)
            .or_default()
            .insert(badge.tier);
    }

    badges
        .iter()
        .map(|badge| {
            let (progress_in_category, total_in_category) = groups
                .get(&(badge.category, badge.tier))
                .copied()
                .unwrap_or_default();

            let previous_tier = earned_tiers
                .get(&badge.category)
                .and_then(|tiers| tiers.range(..badge.tier).next_back().copied());

            let next_tier = tiers_in_category
                .get(&badge.category)
                .and_then(|tiers| {
                    tiers
                        .range((Excluded(badge.tier), Unbounded))
                        .next()
                        .copied()
                });

            let progress = progress_by_id
                .get(badge.id.as_str())
                .map(|p| (*p).clone())
                .unwrap_or_else(|| ProgressRecord {
                    badge_id: badge.id.clone(),
                    current: 0.0,
                    target: 0.0,
                    percentage: 0,
                });

            EvolvingBadge {
                badge: badge.clone(),
                progress,
                earned: earned_ids.contains(&badge.id),
                progress_in_category,
                total_in_category,
                previous_tier,
                next_tier,
                is_max_tier: next_tier.is_none(),
            }
        })
        .collect()
}

/// Unearned badges of the active tier
#[derive(Debug, Clone, Serialize)]
pub struct NextTierView {
    pub active_tier: Option<Tier>,
    pub badges: Vec<BadgeProgress>,
}

/// Select the active tier from evaluated badges and list what is left to earn in it,
/// closest to completion first
pub fn next_tier_badges(evaluated: &[BadgeProgress]) -> NextTierView {
    let badges: Vec<BadgeDefinition> = evaluated.iter().map(|e| e.badge.clone()).collect();
    let earned_ids: HashSet<String> = evaluated
        .iter()
        .filter(|e| e.earned)
        .map(|e| e.badge.id.clone())
        .collect();

    let active_tier = select_active_tier(&badges, &earned_ids);

    let mut remaining: Vec<BadgeProgress> = match active_tier {
        Some(tier) => evaluated
            .iter()
            .filter(|e| e.badge.tier == tier && !e.earned)
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    remaining.sort_by(|a, b| b.progress.percentage.cmp(&a.progress.percentage));

    NextTierView {
        active_tier,
        badges: remaining,
    }
}
