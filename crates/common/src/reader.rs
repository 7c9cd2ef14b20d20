//! Activity reader port
//!
//! Thin read access to stored records. Implementations do I/O only; every derived value is
//! computed by the processor from what these return.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{ActivitySnapshot, BadgeDefinition, Comment, Startup, User, UserBadge};
use crate::Result;

#[async_trait]
pub trait ActivityReader: Send + Sync {
    /// Full badge catalog, including inactive definitions
    async fn list_badge_definitions(&self) -> Result<Vec<BadgeDefinition>>;

    /// Fresh activity counters for one user
    async fn user_activity_snapshot(&self, user_id: Uuid) -> Result<ActivitySnapshot>;

    /// Award records for one user
    async fn list_earned_badges(&self, user_id: Uuid) -> Result<Vec<UserBadge>>;

    /// Award records for every user
    async fn list_all_earned_badges(&self) -> Result<Vec<UserBadge>>;

    async fn list_all_users(&self) -> Result<Vec<User>>;

    async fn list_startups(&self) -> Result<Vec<Startup>>;

    async fn list_comments(&self) -> Result<Vec<Comment>>;
}
