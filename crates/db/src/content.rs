//! Startup and comment queries

use common::models::{Comment, Startup};
use sqlx::{PgPool, Row};

/// Stored counters may be NULL or negative after manual edits
fn counter(value: Option<i64>) -> u64 {
    value.unwrap_or(0).max(0) as u64
}

/// All startups, oldest first
pub async fn list_startups(pool: &PgPool) -> Result<Vec<Startup>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, author_id, title, likes, views, created_at
        FROM startups
        ORDER BY created_at, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| Startup {
            id: r.get("id"),
            author_id: r.get("author_id"),
            title: r.get("title"),
            likes: counter(r.get("likes")),
            views: counter(r.get("views")),
            created_at: r.get("created_at"),
        })
        .collect())
}

/// All comments, oldest first
pub async fn list_comments(pool: &PgPool) -> Result<Vec<Comment>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, author_id, startup_id, created_at
        FROM comments
        ORDER BY created_at, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| Comment {
            id: r.get("id"),
            author_id: r.get("author_id"),
            startup_id: r.get("startup_id"),
            created_at: r.get("created_at"),
        })
        .collect())
}
