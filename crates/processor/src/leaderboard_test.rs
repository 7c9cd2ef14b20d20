#[cfg(test)]
mod tests {
    use crate::leaderboard::*;
    use crate::tests::fixtures::{comment, startup, user};
    use common::models::User;
    use uuid::Uuid;

    fn names(entries: &[common::models::LeaderboardEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    // formula tests
    #[test]
    fn test_startup_success_score_formula() {
        // 3 likes + floor(47 / 10) + 2 comments * 2
        assert_eq!(startup_success_score(3, 47, 2), 11);
        assert_eq!(startup_success_score(0, 9, 0), 0);
    }

    #[test]
    fn test_engagement_rate_zero_views_is_zero() {
        let rate = engagement_rate(5, 3, 0);
        assert_eq!(rate, 0.0);
        assert!(!rate.is_nan());
    }

    #[test]
    fn test_engagement_rate_two_decimals() {
        // (1 + 1) / 3 * 100 = 66.666..
        assert_eq!(engagement_rate(1, 1, 3), 66.67);
        assert_eq!(engagement_rate(10, 0, 40), 25.0);
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!(
            "engagement_rate".parse::<LeaderboardMetric>().unwrap(),
            LeaderboardMetric::EngagementRate
        );
        assert!("karma".parse::<LeaderboardMetric>().is_err());
        for metric in LeaderboardMetric::ALL {
            assert_eq!(metric.as_str().parse::<LeaderboardMetric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_metric_sources() {
        assert!(!LeaderboardMetric::FollowersGained.needs_startups());
        assert!(!LeaderboardMetric::FollowersGained.needs_comments());
        assert!(LeaderboardMetric::LikesReceived.needs_startups());
        assert!(!LeaderboardMetric::LikesReceived.needs_comments());
        assert!(!LeaderboardMetric::CommentsPosted.needs_startups());
        assert!(LeaderboardMetric::StartupSuccess.needs_comments());
    }

    // rank tests
    #[test]
    fn test_followers_ranked_descending() {
        let mut ada = user(1, "Ada");
        let mut bob = user(2, "Bob");
        let cy = user(3, "Cy");
        ada.followers = vec![Uuid::from_u128(90)];
        bob.followers = vec![Uuid::from_u128(90), Uuid::from_u128(91)];

        let entries = rank(
            LeaderboardMetric::FollowersGained,
            &[ada, bob, cy],
            &[],
            &[],
            10,
        );

        assert_eq!(names(&entries), vec!["Bob", "Ada", "Cy"]);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].value, 2.0);
        assert_eq!(entries[2].value, 0.0);
    }

    #[test]
    fn test_ties_keep_population_order() {
        let users = vec![user(1, "Ada"), user(2, "Bob"), user(3, "Cy")];
        let startups = vec![
            startup(1, Some(&users[2]), 5, 0),
            startup(2, Some(&users[0]), 5, 0),
            startup(3, Some(&users[1]), 5, 0),
        ];

        let entries = rank(LeaderboardMetric::LikesReceived, &users, &startups, &[], 10);

        assert_eq!(names(&entries), vec!["Ada", "Bob", "Cy"]);
    }

    #[test]
    fn test_likes_views_and_counts_per_author() {
        let ada = user(1, "Ada");
        let bob = user(2, "Bob");
        let startups = vec![
            startup(1, Some(&ada), 4, 100),
            startup(2, Some(&ada), 6, 50),
            startup(3, Some(&bob), 20, 10),
            startup(4, None, 99, 999),
        ];
        let users = vec![ada, bob];

        let likes = rank(LeaderboardMetric::LikesReceived, &users, &startups, &[], 10);
        assert_eq!(names(&likes), vec!["Bob", "Ada"]);
        assert_eq!(likes[1].value, 10.0);

        let views = rank(LeaderboardMetric::ViewsReceived, &users, &startups, &[], 10);
        assert_eq!(names(&views), vec!["Ada", "Bob"]);
        assert_eq!(views[0].value, 150.0);

        let created = rank(LeaderboardMetric::StartupsCreated, &users, &startups, &[], 10);
        assert_eq!(created[0].value, 2.0);
        assert_eq!(created[1].value, 1.0);
    }

    #[test]
    fn test_comments_posted_skips_missing_authors() {
        let ada = user(1, "Ada");
        let bob = user(2, "Bob");
        let comments = vec![
            comment(1, Some(&bob), None),
            comment(2, Some(&bob), None),
            comment(3, None, None),
            comment(4, Some(&ada), None),
        ];

        let entries = rank(
            LeaderboardMetric::CommentsPosted,
            &[ada, bob],
            &[],
            &comments,
            10,
        );

        assert_eq!(names(&entries), vec!["Bob", "Ada"]);
        assert_eq!(entries[0].value, 2.0);
    }

    #[test]
    fn test_engagement_rate_entry() {
        let ada = user(1, "Ada");
        let bob = user(2, "Bob");
        let pitch = startup(1, Some(&ada), 8, 40);
        let empty = startup(2, Some(&bob), 3, 0);
        let comments = vec![
            comment(1, Some(&bob), Some(&pitch)),
            comment(2, Some(&bob), Some(&pitch)),
            comment(3, Some(&ada), Some(&empty)),
        ];

        let entries = rank(
            LeaderboardMetric::EngagementRate,
            &[ada, bob],
            &[pitch, empty],
            &comments,
            10,
        );

        assert_eq!(entries[0].name, "Ada");
        assert_eq!(entries[0].value, 25.0);
        assert_eq!(entries[0].subtitle.as_deref(), Some("8 likes, 2 comments"));
        // No views at all
        assert_eq!(entries[1].value, 0.0);
        assert_eq!(entries[1].subtitle.as_deref(), Some("3 likes, 1 comments"));
    }

    #[test]
    fn test_startup_success_entry() {
        let ada = user(1, "Ada");
        let pitch = startup(1, Some(&ada), 3, 47);
        let comments = vec![
            comment(1, None, Some(&pitch)),
            comment(2, None, Some(&pitch)),
        ];

        let entries = rank(
            LeaderboardMetric::StartupSuccess,
            &[ada],
            &[pitch],
            &comments,
            10,
        );

        assert_eq!(entries[0].value, 11.0);
        assert_eq!(entries[0].subtitle.as_deref(), Some("1 startups"));
    }

    #[test]
    fn test_huge_counters_saturate_instead_of_overflowing() {
        let ada = user(1, "Ada");
        let bob = user(2, "Bob");
        let huge = i64::MAX as u64;
        let startups = vec![
            startup(1, Some(&ada), huge, huge),
            startup(2, Some(&ada), huge, huge),
            startup(3, Some(&ada), huge, huge),
            startup(4, Some(&bob), 5, 10),
        ];
        let comments = vec![comment(1, Some(&bob), Some(&startups[0]))];
        let users = vec![ada, bob];

        let likes = rank(LeaderboardMetric::LikesReceived, &users, &startups, &[], 10);
        assert_eq!(names(&likes), vec!["Ada", "Bob"]);
        assert_eq!(likes[0].value, u64::MAX as f64);

        let success = rank(
            LeaderboardMetric::StartupSuccess,
            &users,
            &startups,
            &comments,
            10,
        );
        assert_eq!(names(&success), vec!["Ada", "Bob"]);
        assert_eq!(success[0].value, u64::MAX as f64);

        let engagement = rank(
            LeaderboardMetric::EngagementRate,
            &users,
            &startups,
            &comments,
            10,
        );
        assert!(engagement.iter().all(|e| e.value.is_finite()));
    }

    #[test]
    fn test_formulas_saturate() {
        assert_eq!(startup_success_score(u64::MAX, u64::MAX, u64::MAX), u64::MAX);
        assert_eq!(engagement_rate(u64::MAX, 1, u64::MAX), 100.0);
    }

    #[test]
    fn test_rank_truncates_to_limit() {
        let users: Vec<User> = (1..=25).map(|n| user(n, &format!("User{}", n))).collect();

        let entries = rank(LeaderboardMetric::FollowersGained, &users, &[], &[], 7);

        assert_eq!(entries.len(), 7);
        assert_eq!(entries.last().unwrap().rank, 7);
    }

    #[test]
    fn test_empty_population() {
        let entries = rank(LeaderboardMetric::EngagementRate, &[], &[], &[], 10);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_missing_labels_fall_back() {
        let mut anon = user(1, "x");
        anon.name = None;
        anon.username = None;

        let entries = rank(LeaderboardMetric::FollowersGained, &[anon], &[], &[], 10);

        assert_eq!(entries[0].name, "Unknown User");
        assert_eq!(entries[0].username, "unknown");
    }
}
