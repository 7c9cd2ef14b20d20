//! Activity snapshot queries
//!
//! Counters are aggregated in SQL. The weekly streak needs ordered week arithmetic and is
//! derived here from the distinct weeks the user was active in.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate, Utc};
use common::models::{metrics, ActivitySnapshot};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Monday of the ISO week containing `day`
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// Consecutive active weeks ending at the current week, or at the previous one when the
/// current week has no activity yet
pub fn weekly_streak(active_weeks: &[NaiveDate], today: NaiveDate) -> u32 {
    let weeks: HashSet<NaiveDate> = active_weeks.iter().map(|d| week_start(*d)).collect();

    let current = week_start(today);
    let mut cursor = if weeks.contains(&current) {
        current
    } else {
        current - Duration::weeks(1)
    };

    let mut streak = 0;
    while weeks.contains(&cursor) {
        streak += 1;
        cursor -= Duration::weeks(1);
    }
    streak
}

/// Fresh counters for one user. Unknown users get an all-zero snapshot.
pub async fn snapshot(pool: &PgPool, user_id: Uuid) -> Result<ActivitySnapshot, sqlx::Error> {
    let row = sqlx::query(
        r#"
        WITH posts AS (
            SELECT created_at AT TIME ZONE 'UTC' AS posted_at, likes, views
            FROM startups WHERE author_id = $1
        ),
        activity AS (
            SELECT posted_at FROM posts
            UNION ALL
            SELECT created_at AT TIME ZONE 'UTC' FROM comments WHERE author_id = $1
        )
        SELECT
            (SELECT COUNT(*) FROM posts) AS startups_created,
            (SELECT COUNT(*) FROM comments WHERE author_id = $1) AS comments_posted,
            (SELECT COUNT(*) FROM follows WHERE followee_id = $1) AS followers_gained,
            (SELECT COUNT(*) FROM follows WHERE follower_id = $1) AS users_followed,
            (SELECT COALESCE(SUM(GREATEST(likes, 0)), 0)::BIGINT FROM posts) AS total_likes,
            (SELECT COALESCE(SUM(GREATEST(views, 0)), 0)::BIGINT FROM posts) AS total_views,
            (SELECT COUNT(*) FROM reports WHERE reporter_id = $1) AS reports,
            (SELECT COUNT(DISTINCT posted_at::date) FROM activity) AS days_active,
            (SELECT COUNT(*) FROM posts
                WHERE EXTRACT(ISODOW FROM posted_at) IN (6, 7)) AS weekend_posts,
            (SELECT COUNT(*) FROM posts
                WHERE EXTRACT(HOUR FROM posted_at) >= 22
                   OR EXTRACT(HOUR FROM posted_at) < 5) AS night_posts,
            (SELECT COUNT(*) FROM posts
                WHERE EXTRACT(HOUR FROM posted_at) BETWEEN 5 AND 7) AS early_posts
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let weeks: Vec<NaiveDate> = sqlx::query(
        r#"
        SELECT DISTINCT date_trunc('week', created_at AT TIME ZONE 'UTC')::date AS week
        FROM (
            SELECT created_at FROM startups WHERE author_id = $1
            UNION ALL
            SELECT created_at FROM comments WHERE author_id = $1
        ) a
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|r| r.get("week"))
    .collect();

    let count = |column: &str| row.get::<i64, _>(column) as f64;

    Ok(ActivitySnapshot::new()
        .with(metrics::STARTUPS_CREATED, count("startups_created"))
        .with(metrics::COMMENTS_POSTED, count("comments_posted"))
        .with(metrics::FOLLOWERS_GAINED, count("followers_gained"))
        .with(metrics::USERS_FOLLOWED, count("users_followed"))
        .with(metrics::TOTAL_LIKES, count("total_likes"))
        .with(metrics::TOTAL_VIEWS, count("total_views"))
        .with(metrics::REPORTS, count("reports"))
        .with(metrics::DAYS_ACTIVE, count("days_active"))
        .with(metrics::WEEKEND_POSTS, count("weekend_posts"))
        .with(metrics::NIGHT_POSTS, count("night_posts"))
        .with(metrics::EARLY_POSTS, count("early_posts"))
        .with(
            metrics::WEEKLY_STREAK,
            weekly_streak(&weeks, Utc::now().date_naive()) as f64,
        ))
}
