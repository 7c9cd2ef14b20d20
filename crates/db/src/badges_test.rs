#[cfg(test)]
mod tests {
    use crate::badges::{decode_catalog, BadgeRow};
    use common::models::{BadgeCategory, Criteria, Rarity, Tier};
    use serde_json::json;

    fn row(id: &str, criteria: serde_json::Value) -> BadgeRow {
        BadgeRow {
            id: id.to_string(),
            name: "First Launch".to_string(),
            description: None,
            category: None,
            tier: None,
            rarity: None,
            is_active: None,
            criteria,
            icon: None,
        }
    }

    #[test]
    fn test_null_columns_take_defaults() {
        let def = row(
            "first_launch",
            json!({"type": "count", "metric": "startups_created", "target": 1}),
        )
        .into_definition()
        .unwrap();

        assert_eq!(def.tier, Tier::Bronze);
        assert_eq!(def.rarity, Rarity::Common);
        assert_eq!(def.category, BadgeCategory::Achievement);
        assert!(def.is_active);
        assert_eq!(def.description, "");
        assert!(matches!(def.criteria, Criteria::Count(_)));
    }

    #[test]
    fn test_unknown_enum_text_falls_back() {
        let mut r = row(
            "odd",
            json!({"type": "count", "metric": "startups_created", "target": 1}),
        );
        r.tier = Some("adamantium".to_string());
        r.rarity = Some("epic".to_string());
        r.is_active = Some(false);

        let def = r.into_definition().unwrap();

        assert_eq!(def.tier, Tier::Bronze);
        assert_eq!(def.rarity, Rarity::Epic);
        assert!(!def.is_active);
    }

    #[test]
    fn test_malformed_criteria_skipped() {
        let rows = vec![
            row(
                "ok",
                json!({"type": "count", "metric": "comments_posted", "target": 5}),
            ),
            row("no_type", json!({"metric": "comments_posted"})),
            row("not_object", json!("count")),
        ];

        let catalog = decode_catalog(rows);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].id, "ok");
    }
}
