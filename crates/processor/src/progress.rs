//! Badge progress evaluation
//!
//! Pure functions from an activity snapshot and a badge definition to progress. Nothing here
//! awards badges; earned state comes from award records only.

use std::collections::HashSet;

use common::models::{
    ActivitySnapshot, BadgeDefinition, Combination, Criteria, Operator, ProgressRecord,
    SubRequirement,
};
use serde::Serialize;

/// A badge with its evaluated progress and earned state
#[derive(Debug, Clone, Serialize)]
pub struct BadgeProgress {
    pub badge: BadgeDefinition,
    pub progress: ProgressRecord,
    /// Award record present. This is the authoritative earned flag.
    pub earned: bool,
    /// Criteria currently satisfied by the snapshot, awarded or not
    pub criteria_met: bool,
}

/// Percentage of `current` toward `target`, clamped to 0..=100. Zero when target is not positive.
pub fn percentage(current: f64, target: f64) -> u8 {
    if target <= 0.0 || !current.is_finite() || !target.is_finite() {
        return 0;
    }
    (current / target * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Boolean-style counters collapse to 0 or 1
fn flag(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else {
        0.0
    }
}

fn sub_percentage(snapshot: &ActivitySnapshot, sub: &SubRequirement) -> u8 {
    percentage(snapshot.get(&sub.metric), sub.target)
}

/// Evaluate one badge against one user's snapshot
pub fn evaluate(snapshot: &ActivitySnapshot, badge: &BadgeDefinition) -> ProgressRecord {
    let (current, target, pct) = match &badge.criteria {
        Criteria::Count(t) | Criteria::Streak(t) | Criteria::Quality(t) => {
            let current = snapshot.get(&t.metric);
            (current, t.target, percentage(current, t.target))
        }
        Criteria::Date(t) | Criteria::Time(t) | Criteria::Special(t) => {
            let current = flag(snapshot.get(&t.metric));
            (current, t.target, percentage(current, t.target))
        }
        Criteria::Combination(combo) => evaluate_combination(snapshot, combo),
    };

    ProgressRecord {
        badge_id: badge.id.clone(),
        current,
        target,
        percentage: pct,
    }
}

/// Current is the number of fully met sub-requirements, percentage is their average
fn evaluate_combination(snapshot: &ActivitySnapshot, combo: &Combination) -> (f64, f64, u8) {
    if combo.requirements.is_empty() {
        return (0.0, 0.0, 0);
    }

    let percentages: Vec<u8> = combo
        .requirements
        .iter()
        .map(|sub| sub_percentage(snapshot, sub))
        .collect();

    let met = percentages.iter().filter(|p| **p == 100).count();
    let sum: u32 = percentages.iter().map(|p| *p as u32).sum();
    let average = (sum as f64 / percentages.len() as f64).round() as u8;

    (met as f64, percentages.len() as f64, average)
}

/// Whether the snapshot satisfies the criteria outright.
///
/// For combinations every `AND` leg must be at 100%, and when `OR` legs exist at least one of
/// them must be too. An averaged percentage near 100 does not count.
pub fn criteria_met(snapshot: &ActivitySnapshot, criteria: &Criteria) -> bool {
    match criteria {
        Criteria::Combination(combo) => {
            if combo.requirements.is_empty() {
                return false;
            }
            let (all, any): (Vec<_>, Vec<_>) = combo
                .requirements
                .iter()
                .partition(|sub| sub.operator == Operator::And);

            let all_met = all.iter().all(|sub| sub_percentage(snapshot, sub) == 100);
            let any_met =
                any.is_empty() || any.iter().any(|sub| sub_percentage(snapshot, sub) == 100);
            all_met && any_met
        }
        Criteria::Count(t) | Criteria::Streak(t) | Criteria::Quality(t) => {
            t.target > 0.0 && snapshot.get(&t.metric) >= t.target
        }
        Criteria::Date(t) | Criteria::Time(t) | Criteria::Special(t) => {
            t.target > 0.0 && flag(snapshot.get(&t.metric)) >= t.target
        }
    }
}

/// Evaluate every badge, marking earned state from the award set
pub fn evaluate_all(
    snapshot: &ActivitySnapshot,
    badges: &[BadgeDefinition],
    earned_ids: &HashSet<String>,
) -> Vec<BadgeProgress> {
    badges
        .iter()
        .map(|badge| BadgeProgress {
            progress: evaluate(snapshot, badge),
            earned: earned_ids.contains(&badge.id),
            criteria_met: criteria_met(snapshot, &badge.criteria),
            badge: badge.clone(),
        })
        .collect()
}
