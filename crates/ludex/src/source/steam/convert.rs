//! Mapping from Steam payloads to the normalized record shape.

use chrono::Utc;
use sea_orm::Set;

use crate::entity::steam_app::ActiveModel;

use super::types::{AppDetailsRaw, QuerySummary};

/// Map a full appdetails payload (plus supplementary data for games) to
/// an active model.
///
/// Non-game entries pass `None` for both supplementary arguments and are
/// stored with those columns null.
pub fn details_to_model(
    app_id: i64,
    raw: AppDetailsRaw,
    player_count: Option<i32>,
    reviews: Option<&QuerySummary>,
) -> ActiveModel {
    let described = |items: Option<Vec<super::types::Described>>| -> serde_json::Value {
        serde_json::Value::Array(
            items
                .unwrap_or_default()
                .into_iter()
                .map(|d| serde_json::Value::String(d.description))
                .collect(),
        )
    };

    let strings = |items: Option<Vec<String>>| -> serde_json::Value {
        serde_json::Value::Array(
            items
                .unwrap_or_default()
                .into_iter()
                .map(serde_json::Value::String)
                .collect(),
        )
    };

    let dlc = raw.dlc.unwrap_or_default();
    let dlc_count = dlc.len() as i32;

    let metadata = serde_json::json!({
        "platforms": raw.platforms,
        "achievements": raw.achievements,
        "supported_languages": raw.supported_languages,
        "metacritic_url": raw.metacritic.as_ref().and_then(|m| m.url.clone()),
        "coming_soon": raw.release_date.as_ref().and_then(|r| r.coming_soon),
        "dlc_app_ids": dlc,
    });

    ActiveModel {
        app_id: Set(app_id),
        name: Set(raw.name.unwrap_or_else(|| format!("app {app_id}"))),
        app_type: Set(raw.app_type.unwrap_or_else(|| "unknown".to_string())),
        is_free: Set(raw.is_free.unwrap_or(false)),
        required_age: Set(raw.required_age),
        short_description: Set(raw.short_description),
        header_image: Set(raw.header_image),
        website: Set(raw.website),
        developers: Set(strings(raw.developers)),
        publishers: Set(strings(raw.publishers)),
        categories: Set(described(raw.categories)),
        genres: Set(described(raw.genres)),
        price_overview: Set(raw.price_overview.unwrap_or(serde_json::json!({}))),
        metacritic_score: Set(raw.metacritic.and_then(|m| m.score)),
        recommendations: Set(raw.recommendations.and_then(|r| r.total)),
        release_date: Set(raw.release_date.and_then(|r| r.date)),
        controller_support: Set(raw.controller_support),
        dlc_count: Set(dlc_count),
        current_players: Set(player_count),
        review_score: Set(reviews.and_then(|r| r.review_score)),
        review_score_desc: Set(reviews.and_then(|r| r.review_score_desc.clone())),
        total_positive: Set(reviews.and_then(|r| r.total_positive)),
        total_negative: Set(reviews.and_then(|r| r.total_negative)),
        total_reviews: Set(reviews.and_then(|r| r.total_reviews)),
        metadata: Set(metadata),
        last_fetched: Set(Utc::now().fixed_offset()),
        last_quick_update: Set(None),
    }
}

/// Partial model for the quick player-count refresh.
///
/// Only the player columns and refresh timestamps are set; every other
/// column is left untouched by the merge.
pub fn quick_refresh_model(app_id: i64, player_count: i32) -> ActiveModel {
    let now = Utc::now().fixed_offset();
    ActiveModel {
        app_id: Set(app_id),
        current_players: Set(Some(player_count)),
        last_fetched: Set(now),
        last_quick_update: Set(Some(now)),
        ..Default::default()
    }
}
