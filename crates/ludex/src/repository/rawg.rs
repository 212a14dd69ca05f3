//! Persistence for the RAWG namespace.

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::entity::rawg_game::{ActiveModel, Entity as RawgGame, Model};

use super::{Result, required_active_value};

/// Insert or update a RAWG game by its natural key (RAWG id).
pub async fn upsert_game(db: &DatabaseConnection, model: ActiveModel) -> Result<Model> {
    let id = required_active_value("id", &model.id)?;

    match RawgGame::find_by_id(id).one(db).await? {
        Some(_) => model.update(db).await.map_err(Into::into),
        None => model.insert(db).await.map_err(Into::into),
    }
}

/// Total stored RAWG games.
pub async fn count_games(db: &DatabaseConnection) -> Result<u64> {
    RawgGame::find().count(db).await.map_err(Into::into)
}

#[cfg(all(test, feature = "migrate"))]
mod tests {
    use chrono::Utc;
    use sea_orm::{ActiveValue, Set};

    use super::*;
    use crate::db::connect_and_migrate;
    use crate::repository::RepositoryError;

    fn model(id: i64, title: &str, metacritic: Option<i32>) -> ActiveModel {
        ActiveModel {
            id: Set(id),
            title: Set(title.to_string()),
            slug: Set(Some(format!("{}-slug", title.to_lowercase()))),
            description: Set(None),
            released: Set(None),
            release_year: Set(None),
            cover_image: Set(None),
            metacritic: Set(metacritic),
            rating: Set(Some(4.2)),
            rating_count: Set(Some(10)),
            playtime: Set(None),
            esrb_rating: Set(None),
            website: Set(None),
            genres: Set(serde_json::json!(["RPG"])),
            platforms: Set(serde_json::json!(["PC"])),
            stores: Set(serde_json::json!([])),
            developers: Set(serde_json::json!([])),
            publishers: Set(serde_json::json!([])),
            screenshots: Set(serde_json::json!([])),
            tags: Set(serde_json::json!([])),
            last_fetched: Set(Utc::now().fixed_offset()),
        }
    }

    #[tokio::test]
    async fn upsert_is_idempotent_for_identical_payloads() {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();

        upsert_game(&db, model(42, "Hades", Some(93))).await.unwrap();
        upsert_game(&db, model(42, "Hades", Some(93))).await.unwrap();

        assert_eq!(count_games(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn second_write_wins_on_full_record() {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();

        upsert_game(&db, model(42, "Hades", Some(93))).await.unwrap();
        let updated = upsert_game(&db, model(42, "Hades II", Some(94)))
            .await
            .unwrap();

        assert_eq!(updated.title, "Hades II");
        assert_eq!(updated.metacritic, Some(94));
        assert_eq!(count_games(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_missing_optional_field_preserves_stored_value() {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();

        upsert_game(&db, model(7, "Celeste", Some(92))).await.unwrap();

        // Partial payload: metacritic not fetched this time.
        let partial = ActiveModel {
            id: Set(7),
            title: Set("Celeste".to_string()),
            metacritic: ActiveValue::NotSet,
            rating: Set(Some(4.6)),
            last_fetched: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };
        let updated = upsert_game(&db, partial).await.unwrap();

        assert_eq!(updated.metacritic, Some(92), "NotSet must preserve");
        assert_eq!(updated.rating, Some(4.6));
    }

    #[tokio::test]
    async fn explicit_null_clears_stored_value() {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();

        upsert_game(&db, model(7, "Celeste", Some(92))).await.unwrap();

        let clearing = ActiveModel {
            id: Set(7),
            metacritic: Set(None),
            ..Default::default()
        };
        let updated = upsert_game(&db, clearing).await.unwrap();

        assert_eq!(updated.metacritic, None, "Set(None) must clear");
    }

    #[tokio::test]
    async fn upsert_rejects_missing_natural_key() {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();

        let mut item = model(1, "No Key", None);
        item.id = ActiveValue::NotSet;

        let err = upsert_game(&db, item).await.expect_err("must fail");
        match err {
            RepositoryError::InvalidInput { message } => assert!(message.contains("id")),
            other => panic!("expected invalid input error, got {other:?}"),
        }
    }
}
