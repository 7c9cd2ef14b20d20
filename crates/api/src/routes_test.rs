#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use chrono::{TimeZone, Utc};
    use common::models::{
        ActivitySnapshot, BadgeDefinition, Comment, Startup, User, UserBadge,
    };
    use common::{ActivityReader, Config, Error, Result};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::routes;
    use crate::state::AppState;

    #[derive(Default)]
    struct StubReader {
        fail_comments: bool,
    }

    fn ada() -> User {
        User {
            id: Uuid::from_u128(1),
            name: Some("Ada".to_string()),
            username: Some("ada".to_string()),
            image: None,
            followers: vec![Uuid::from_u128(2), Uuid::from_u128(3)],
            following: vec![],
        }
    }

    fn bob() -> User {
        User {
            id: Uuid::from_u128(2),
            name: Some("Bob".to_string()),
            username: Some("bob".to_string()),
            image: None,
            followers: vec![Uuid::from_u128(1)],
            following: vec![Uuid::from_u128(1)],
        }
    }

    fn catalog() -> Vec<BadgeDefinition> {
        serde_json::from_value(json!([
            {
                "id": "first_launch",
                "name": "First Launch",
                "category": "creator",
                "criteria": {"type": "count", "metric": "startups_created", "target": 1}
            },
            {
                "id": "five_launches",
                "name": "Five Launches",
                "category": "creator",
                "tier": "silver",
                "criteria": {"type": "count", "metric": "startups_created", "target": 5}
            },
            {
                "id": "retired",
                "name": "Retired",
                "isActive": false,
                "criteria": {"type": "special", "metric": "beta_tester", "target": 1}
            }
        ]))
        .unwrap()
    }

    #[async_trait]
    impl ActivityReader for StubReader {
        async fn list_badge_definitions(&self) -> Result<Vec<BadgeDefinition>> {
            Ok(catalog())
        }

        async fn user_activity_snapshot(&self, _user_id: Uuid) -> Result<ActivitySnapshot> {
            Ok(ActivitySnapshot::new().with("startups_created", 2.0))
        }

        async fn list_earned_badges(&self, user_id: Uuid) -> Result<Vec<UserBadge>> {
            Ok(self
                .list_all_earned_badges()
                .await?
                .into_iter()
                .filter(|a| a.user_id == Some(user_id))
                .collect())
        }

        async fn list_all_earned_badges(&self) -> Result<Vec<UserBadge>> {
            Ok(vec![UserBadge {
                user_id: Some(ada().id),
                badge_id: Some("first_launch".to_string()),
                earned_at: Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(),
            }])
        }

        async fn list_all_users(&self) -> Result<Vec<User>> {
            Ok(vec![ada(), bob()])
        }

        async fn list_startups(&self) -> Result<Vec<Startup>> {
            Ok(vec![])
        }

        async fn list_comments(&self) -> Result<Vec<Comment>> {
            if self.fail_comments {
                return Err(Error::Database("connection reset".to_string()));
            }
            Ok(vec![])
        }
    }

    fn app(reader: StubReader) -> Router {
        let config = Config::from_lookup(|_| None);
        routes::router(Arc::new(AppState::new(config, Arc::new(reader))))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(app(StubReader::default()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_catalog_lists_active_badges() {
        let (status, body) = get(app(StubReader::default()), "/api/badges").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_leaderboard_metric_is_bad_request() {
        let (status, body) = get(app(StubReader::default()), "/api/leaderboard/karma").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_leaderboard_limit_is_clamped() {
        let (status, body) = get(
            app(StubReader::default()),
            "/api/leaderboard/followers_gained?limit=1",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["name"], "Ada");
        assert_eq!(entries[0]["rank"], 1);

        let (_, body) = get(
            app(StubReader::default()),
            "/api/leaderboard/followers_gained?limit=0",
        )
        .await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_source_is_bad_gateway() {
        let reader = StubReader {
            fail_comments: true,
        };
        let (status, body) = get(app(reader), "/api/leaderboard/comments_posted").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "source_unavailable");
    }

    #[tokio::test]
    async fn test_badge_leaderboard() {
        let (status, body) = get(
            app(StubReader::default()),
            "/api/badges/leaderboard/total_badges?category=creator",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["total_badges"], 1);
    }

    #[tokio::test]
    async fn test_badge_leaderboard_rejects_unknown_tier() {
        let (status, _) = get(
            app(StubReader::default()),
            "/api/badges/leaderboard/highest_tier?tier=mythril",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_user_id_is_bad_request() {
        let (status, _) = get(app(StubReader::default()), "/api/users/not-a-uuid/badges").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_user_progress_filtered_by_query() {
        let uri = format!("/api/users/{}/progress?status=in_progress", ada().id);
        let (status, body) = get(app(StubReader::default()), &uri).await;

        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["badge"]["id"], "five_launches");
        assert_eq!(entries[0]["progress"]["percentage"], 40);
    }

    #[tokio::test]
    async fn test_user_next_tier() {
        let uri = format!("/api/users/{}/next-tier", ada().id);
        let (status, body) = get(app(StubReader::default()), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active_tier"], "silver");
    }
}
