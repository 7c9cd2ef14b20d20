//! User queries

use common::models::User;
use sqlx::{postgres::PgRow, PgPool, Row};

const USER_COLUMNS: &str = r#"
    u.id, u.name, u.username, u.image,
    ARRAY(
        SELECT f.follower_id FROM follows f
        WHERE f.followee_id = u.id
        ORDER BY f.created_at, f.follower_id
    ) AS followers,
    ARRAY(
        SELECT f.followee_id FROM follows f
        WHERE f.follower_id = u.id
        ORDER BY f.created_at, f.followee_id
    ) AS following
"#;

fn from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        name: row.get("name"),
        username: row.get("username"),
        image: row.get("image"),
        followers: row.get("followers"),
        following: row.get("following"),
    }
}

/// Every user with follow edges, oldest account first
pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM users u ORDER BY u.created_at, u.id",
        USER_COLUMNS
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    Ok(rows.iter().map(from_row).collect())
}
