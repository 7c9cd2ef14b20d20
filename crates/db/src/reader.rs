//! PostgreSQL-backed activity reader

use async_trait::async_trait;
use common::models::{ActivitySnapshot, BadgeDefinition, Comment, Startup, User, UserBadge};
use common::{ActivityReader, Error, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{activity, badges, content, users};

fn db_err(e: sqlx::Error) -> Error {
    Error::Database(e.to_string())
}

#[derive(Clone)]
pub struct PgActivityReader {
    pool: PgPool,
}

impl PgActivityReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityReader for PgActivityReader {
    async fn list_badge_definitions(&self) -> Result<Vec<BadgeDefinition>> {
        badges::list_definitions(&self.pool).await.map_err(db_err)
    }

    async fn user_activity_snapshot(&self, user_id: Uuid) -> Result<ActivitySnapshot> {
        activity::snapshot(&self.pool, user_id).await.map_err(db_err)
    }

    async fn list_earned_badges(&self, user_id: Uuid) -> Result<Vec<UserBadge>> {
        badges::list_awards_for_user(&self.pool, user_id)
            .await
            .map_err(db_err)
    }

    async fn list_all_earned_badges(&self) -> Result<Vec<UserBadge>> {
        badges::list_all_awards(&self.pool).await.map_err(db_err)
    }

    async fn list_all_users(&self) -> Result<Vec<User>> {
        users::list_all(&self.pool).await.map_err(db_err)
    }

    async fn list_startups(&self) -> Result<Vec<Startup>> {
        content::list_startups(&self.pool).await.map_err(db_err)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>> {
        content::list_comments(&self.pool).await.map_err(db_err)
    }
}
