//! Content leaderboards
//!
//! Storage keeps no per-user aggregates, so every derived metric joins users to their startups
//! and comments here and reduces per user. Records with missing author references are skipped.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use common::models::{Comment, LeaderboardEntry, Startup, User};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Metric a content leaderboard ranks by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardMetric {
    FollowersGained,
    LikesReceived,
    ViewsReceived,
    StartupsCreated,
    CommentsPosted,
    EngagementRate,
    StartupSuccess,
}

impl LeaderboardMetric {
    pub const ALL: [LeaderboardMetric; 7] = [
        LeaderboardMetric::FollowersGained,
        LeaderboardMetric::LikesReceived,
        LeaderboardMetric::ViewsReceived,
        LeaderboardMetric::StartupsCreated,
        LeaderboardMetric::CommentsPosted,
        LeaderboardMetric::EngagementRate,
        LeaderboardMetric::StartupSuccess,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FollowersGained => "followers_gained",
            Self::LikesReceived => "likes_received",
            Self::ViewsReceived => "views_received",
            Self::StartupsCreated => "startups_created",
            Self::CommentsPosted => "comments_posted",
            Self::EngagementRate => "engagement_rate",
            Self::StartupSuccess => "startup_success",
        }
    }

    /// Whether ranking reads the startup records
    pub fn needs_startups(&self) -> bool {
        matches!(
            self,
            Self::LikesReceived
                | Self::ViewsReceived
                | Self::StartupsCreated
                | Self::EngagementRate
                | Self::StartupSuccess
        )
    }

    /// Whether ranking reads the comment records
    pub fn needs_comments(&self) -> bool {
        matches!(
            self,
            Self::CommentsPosted | Self::EngagementRate | Self::StartupSuccess
        )
    }
}

impl FromStr for LeaderboardMetric {
    type Err = common::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                common::Error::InvalidInput(format!("unknown leaderboard metric '{}'", s))
            })
    }
}

impl fmt::Display for LeaderboardMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score of one startup for the success leaderboard
pub fn startup_success_score(likes: u64, views: u64, comments: u64) -> u64 {
    comments
        .saturating_mul(2)
        .saturating_add(likes)
        .saturating_add(views / 10)
}

/// (likes + comments) / views as a percentage, two decimals. Zero without views.
pub fn engagement_rate(likes: u64, comments: u64, views: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    let rate = likes.saturating_add(comments) as f64 / views as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

struct Score {
    value: f64,
    subtitle: Option<String>,
}

/// Content joined by author
struct ContentIndex<'a> {
    startups_by_author: HashMap<Uuid, Vec<&'a Startup>>,
    comments_by_author: HashMap<Uuid, u64>,
    comments_by_startup: HashMap<Uuid, u64>,
}

impl<'a> ContentIndex<'a> {
    fn build(startups: &'a [Startup], comments: &'a [Comment]) -> Self {
        let mut startups_by_author: HashMap<Uuid, Vec<&Startup>> = HashMap::new();
        for startup in startups {
            if let Some(author) = startup.author_id {
                startups_by_author.entry(author).or_default().push(startup);
            }
        }

        let mut comments_by_author: HashMap<Uuid, u64> = HashMap::new();
        let mut comments_by_startup: HashMap<Uuid, u64> = HashMap::new();
        for comment in comments {
            if let Some(author) = comment.author_id {
                *comments_by_author.entry(author).or_insert(0) += 1;
            }
            if let Some(startup) = comment.startup_id {
                *comments_by_startup.entry(startup).or_insert(0) += 1;
            }
        }

        Self {
            startups_by_author,
            comments_by_author,
            comments_by_startup,
        }
    }

    fn startups_of(&self, user_id: Uuid) -> &[&'a Startup] {
        self.startups_by_author
            .get(&user_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn comments_on(&self, startup_id: Uuid) -> u64 {
        self.comments_by_startup
            .get(&startup_id)
            .copied()
            .unwrap_or(0)
    }

    fn score(&self, metric: LeaderboardMetric, user: &User) -> Score {
        let startups = self.startups_of(user.id);
        let likes = startups.iter().fold(0u64, |acc, s| acc.saturating_add(s.likes));
        let views = startups.iter().fold(0u64, |acc, s| acc.saturating_add(s.views));

        match metric {
            LeaderboardMetric::FollowersGained => Score {
                value: user.followers.len() as f64,
                subtitle: None,
            },
            LeaderboardMetric::LikesReceived => Score {
                value: likes as f64,
                subtitle: None,
            },
            LeaderboardMetric::ViewsReceived => Score {
                value: views as f64,
                subtitle: None,
            },
            LeaderboardMetric::StartupsCreated => Score {
                value: startups.len() as f64,
                subtitle: None,
            },
            LeaderboardMetric::CommentsPosted => Score {
                value: self.comments_by_author.get(&user.id).copied().unwrap_or(0) as f64,
                subtitle: None,
            },
            LeaderboardMetric::EngagementRate => {
                let comments = startups
                    .iter()
                    .fold(0u64, |acc, s| acc.saturating_add(self.comments_on(s.id)));
                Score {
                    value: engagement_rate(likes, comments, views),
                    subtitle: Some(format!("{} likes, {} comments", likes, comments)),
                }
            }
            LeaderboardMetric::StartupSuccess => {
                let total = startups.iter().fold(0u64, |acc, s| {
                    acc.saturating_add(startup_success_score(
                        s.likes,
                        s.views,
                        self.comments_on(s.id),
                    ))
                });
                Score {
                    value: total as f64,
                    subtitle: Some(format!("{} startups", startups.len())),
                }
            }
        }
    }
}

/// Rank the population by `metric`, highest first.
///
/// Equal values keep population order. At most `limit` entries are returned.
pub fn rank(
    metric: LeaderboardMetric,
    users: &[User],
    startups: &[Startup],
    comments: &[Comment],
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let index = ContentIndex::build(startups, comments);

    let mut scored: Vec<(&User, Score)> = users
        .iter()
        .map(|user| (user, index.score(metric, user)))
        .filter(|(_, score)| score.value.is_finite() && score.value >= 0.0)
        .collect();

    scored.sort_by(|a, b| b.1.value.total_cmp(&a.1.value));
    scored.truncate(limit);

    debug!(
        "Ranked {} users by {} ({} returned)",
        users.len(),
        metric,
        scored.len()
    );

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (user, score))| LeaderboardEntry {
            rank: (idx + 1) as u32,
            user_id: user.id,
            name: user.display_name(),
            username: user.handle(),
            image: user.image.clone(),
            value: score.value,
            subtitle: score.subtitle,
        })
        .collect()
}
