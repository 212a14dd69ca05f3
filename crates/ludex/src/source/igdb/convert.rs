//! Mapping from IGDB payloads to the normalized record shape.

use chrono::{DateTime, Datelike, Utc};
use sea_orm::Set;

use crate::entity::igdb_game::ActiveModel;

use super::types::IgdbGameRaw;

/// Map a raw IGDB game to an active model.
///
/// IGDB resends the full shape on every fetch, so every column is set.
pub fn to_active_model(raw: IgdbGameRaw) -> ActiveModel {
    let first_release = raw
        .first_release_date
        .and_then(|secs| DateTime::from_timestamp(secs, 0));
    let release_year = first_release.map(|d| d.year());

    let slug = raw
        .slug
        .clone()
        .unwrap_or_else(|| generate_slug(&raw.name));

    let names = |items: Option<Vec<super::types::Named>>| -> serde_json::Value {
        serde_json::Value::Array(
            items
                .unwrap_or_default()
                .into_iter()
                .map(|n| serde_json::Value::String(n.name))
                .collect(),
        )
    };

    let companies = raw.involved_companies.unwrap_or_default();
    let developers: Vec<serde_json::Value> = companies
        .iter()
        .filter(|c| c.developer.unwrap_or(false))
        .filter_map(|c| c.company.as_ref())
        .map(|n| serde_json::Value::String(n.name.clone()))
        .collect();
    let publishers: Vec<serde_json::Value> = companies
        .iter()
        .filter(|c| c.publisher.unwrap_or(false))
        .filter_map(|c| c.company.as_ref())
        .map(|n| serde_json::Value::String(n.name.clone()))
        .collect();

    let screenshots: Vec<serde_json::Value> = raw
        .screenshots
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| s.url)
        .map(|url| serde_json::Value::String(upscale_image(&url, "t_screenshot_big")))
        .collect();

    let cover_url = raw
        .cover
        .and_then(|c| c.url)
        .map(|url| upscale_image(&url, "t_cover_big"));

    let metadata = serde_json::json!({
        "total_rating": raw.total_rating,
        "total_rating_count": raw.total_rating_count,
    });

    ActiveModel {
        id: Set(raw.id),
        name: Set(raw.name),
        slug: Set(slug),
        summary: Set(raw.summary),
        storyline: Set(raw.storyline),
        first_release_date: Set(first_release.map(|d| d.fixed_offset())),
        release_year: Set(release_year),
        cover_url: Set(cover_url),
        igdb_rating: Set(raw.rating),
        aggregated_rating: Set(raw.aggregated_rating),
        rating_count: Set(raw.rating_count.unwrap_or(0)),
        aggregated_rating_count: Set(raw.aggregated_rating_count.unwrap_or(0)),
        category: Set(raw.category.unwrap_or(0)),
        status: Set(raw.status),
        genres: Set(names(raw.genres)),
        platforms: Set(names(raw.platforms)),
        developers: Set(serde_json::Value::Array(developers)),
        publishers: Set(serde_json::Value::Array(publishers)),
        screenshots: Set(serde_json::Value::Array(screenshots)),
        metadata: Set(metadata),
        last_fetched: Set(Utc::now().fixed_offset()),
    }
}

/// URL-friendly slug fallback for games missing one.
pub fn generate_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_matches('-').to_string()
}

/// Rewrite an IGDB thumbnail URL to a larger image size.
///
/// IGDB returns protocol-relative `//images...` URLs pointing at the
/// `t_thumb` rendition.
pub fn upscale_image(url: &str, size: &str) -> String {
    let upscaled = url.replacen("t_thumb", size, 1);
    if let Some(rest) = upscaled.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        upscaled
    }
}
