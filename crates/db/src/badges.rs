//! Badge catalog and award queries

use common::models::{BadgeDefinition, UserBadge};
use serde_json::{Map, Value};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::warn;
use uuid::Uuid;

/// Raw catalog row before lenient decoding
#[derive(Debug, Clone)]
pub struct BadgeRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tier: Option<String>,
    pub rarity: Option<String>,
    pub is_active: Option<bool>,
    pub criteria: Value,
    pub icon: Option<String>,
}

impl BadgeRow {
    fn from_row(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            category: row.get("category"),
            tier: row.get("tier"),
            rarity: row.get("rarity"),
            is_active: row.get("is_active"),
            criteria: row.get("criteria"),
            icon: row.get("icon"),
        }
    }

    /// Decode through the model's serde rules so unknown enum values fall back to defaults.
    /// NULL columns are left out so field defaults apply.
    pub fn into_definition(self) -> Result<BadgeDefinition, serde_json::Error> {
        let mut fields = Map::new();
        fields.insert("id".into(), Value::String(self.id));
        fields.insert("name".into(), Value::String(self.name));
        let optional = [
            ("description", self.description),
            ("category", self.category),
            ("tier", self.tier),
            ("rarity", self.rarity),
            ("icon", self.icon),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                fields.insert(key.into(), Value::String(value));
            }
        }
        if let Some(active) = self.is_active {
            fields.insert("is_active".into(), Value::Bool(active));
        }
        fields.insert("criteria".into(), self.criteria);

        serde_json::from_value(Value::Object(fields))
    }
}

/// Decode catalog rows, skipping definitions whose criteria cannot be read
pub fn decode_catalog(rows: Vec<BadgeRow>) -> Vec<BadgeDefinition> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            match row.into_definition() {
                Ok(def) => Some(def),
                Err(e) => {
                    warn!("Skipping badge {} with malformed definition: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

/// Full catalog, inactive definitions included
pub async fn list_definitions(pool: &PgPool) -> Result<Vec<BadgeDefinition>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, description, category, tier, rarity, is_active, criteria, icon
        FROM badges
        ORDER BY created_at, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(decode_catalog(rows.iter().map(BadgeRow::from_row).collect()))
}

fn award_from_row(row: PgRow) -> UserBadge {
    UserBadge {
        user_id: row.get("user_id"),
        badge_id: row.get("badge_id"),
        earned_at: row.get("earned_at"),
    }
}

/// Award records of one user
pub async fn list_awards_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<UserBadge>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, badge_id, earned_at
        FROM user_badges
        WHERE user_id = $1
        ORDER BY earned_at DESC, id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(award_from_row).collect())
}

/// Award records of every user
pub async fn list_all_awards(pool: &PgPool) -> Result<Vec<UserBadge>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, badge_id, earned_at
        FROM user_badges
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(award_from_row).collect())
}
