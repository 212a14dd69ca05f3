//! Mapping from RAWG payloads to the normalized record shape.

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::Set;

use crate::entity::rawg_game::ActiveModel;

use super::types::RawgGameRaw;

/// Map a raw RAWG game to an active model.
///
/// RAWG resends the full shape on every fetch, so every column is set;
/// absent optional fields become explicit nulls and absent arrays become
/// empty JSON arrays.
pub fn to_active_model(raw: RawgGameRaw) -> ActiveModel {
    let released = raw.released.as_deref().and_then(parse_release_date);
    let release_year = released.map(|d| d.year());

    let names = |items: Option<Vec<super::types::Named>>| -> serde_json::Value {
        serde_json::Value::Array(
            items
                .unwrap_or_default()
                .into_iter()
                .map(|n| serde_json::Value::String(n.name))
                .collect(),
        )
    };

    let platforms: Vec<serde_json::Value> = raw
        .platforms
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.platform.map(|n| serde_json::Value::String(n.name)))
        .collect();

    let stores: Vec<serde_json::Value> = raw
        .stores
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| s.store.map(|n| serde_json::Value::String(n.name)))
        .collect();

    let screenshots: Vec<serde_json::Value> = raw
        .short_screenshots
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| s.image.map(serde_json::Value::String))
        .collect();

    ActiveModel {
        id: Set(raw.id),
        title: Set(raw.name),
        slug: Set(raw.slug),
        description: Set(raw.description_raw.or(raw.description)),
        released: Set(released),
        release_year: Set(release_year),
        cover_image: Set(raw.background_image),
        metacritic: Set(raw.metacritic),
        rating: Set(raw.rating),
        rating_count: Set(raw.ratings_count),
        playtime: Set(raw.playtime),
        esrb_rating: Set(raw.esrb_rating.and_then(|e| e.name)),
        website: Set(raw.website),
        genres: Set(names(raw.genres)),
        platforms: Set(serde_json::Value::Array(platforms)),
        stores: Set(serde_json::Value::Array(stores)),
        developers: Set(names(raw.developers)),
        publishers: Set(names(raw.publishers)),
        screenshots: Set(serde_json::Value::Array(screenshots)),
        tags: Set(names(raw.tags)),
        last_fetched: Set(Utc::now().fixed_offset()),
    }
}

/// Parse RAWG's `YYYY-MM-DD` release date.
pub fn parse_release_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn minimal_raw(id: i64, name: &str) -> RawgGameRaw {
        serde_json::from_value(serde_json::json!({ "id": id, "name": name }))
            .expect("minimal payload should deserialize")
    }

    #[test]
    fn mapping_is_total_over_minimal_payload() {
        let model = to_active_model(minimal_raw(1, "Portal"));

        assert_eq!(model.id, ActiveValue::Set(1));
        assert_eq!(model.title, ActiveValue::Set("Portal".to_string()));
        assert_eq!(model.released, ActiveValue::Set(None));
        assert_eq!(model.release_year, ActiveValue::Set(None));
        assert_eq!(model.genres, ActiveValue::Set(serde_json::json!([])));
        assert_eq!(model.tags, ActiveValue::Set(serde_json::json!([])));
    }

    #[test]
    fn release_date_and_year_are_derived() {
        let raw: RawgGameRaw = serde_json::from_value(serde_json::json!({
            "id": 2, "name": "Half-Life 2", "released": "2004-11-16"
        }))
        .unwrap();

        let model = to_active_model(raw);
        assert_eq!(
            model.released,
            ActiveValue::Set(NaiveDate::from_ymd_opt(2004, 11, 16))
        );
        assert_eq!(model.release_year, ActiveValue::Set(Some(2004)));
    }

    #[test]
    fn malformed_release_date_maps_to_null() {
        let raw: RawgGameRaw = serde_json::from_value(serde_json::json!({
            "id": 3, "name": "TBA", "released": "soon"
        }))
        .unwrap();

        let model = to_active_model(raw);
        assert_eq!(model.released, ActiveValue::Set(None));
    }

    #[test]
    fn nested_names_flatten_into_json_arrays() {
        let raw: RawgGameRaw = serde_json::from_value(serde_json::json!({
            "id": 4,
            "name": "Doom",
            "genres": [{"name": "Shooter"}, {"name": "Action"}],
            "platforms": [{"platform": {"name": "PC"}}, {"platform": null}],
            "stores": [{"store": {"name": "Steam"}}],
            "short_screenshots": [{"image": "https://x/1.jpg"}, {"image": null}]
        }))
        .unwrap();

        let model = to_active_model(raw);
        assert_eq!(
            model.genres,
            ActiveValue::Set(serde_json::json!(["Shooter", "Action"]))
        );
        assert_eq!(model.platforms, ActiveValue::Set(serde_json::json!(["PC"])));
        assert_eq!(model.stores, ActiveValue::Set(serde_json::json!(["Steam"])));
        assert_eq!(
            model.screenshots,
            ActiveValue::Set(serde_json::json!(["https://x/1.jpg"]))
        );
    }

    #[test]
    fn description_prefers_raw_variant() {
        let raw: RawgGameRaw = serde_json::from_value(serde_json::json!({
            "id": 5, "name": "Quake",
            "description": "<p>html</p>",
            "description_raw": "plain"
        }))
        .unwrap();

        let model = to_active_model(raw);
        assert_eq!(
            model.description,
            ActiveValue::Set(Some("plain".to_string()))
        );
    }
}
