//! Raw payload schemas for the RAWG listing endpoint.
//!
//! Every optional field is `Option` so the mapping stays total over
//! partial payloads; RAWG omits or nulls fields freely across API tiers.

use serde::Deserialize;

/// One page of `/games`. Completion is detected from an empty results
/// array, so the pagination links are not modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct GamesPage {
    pub results: Option<Vec<RawgGameRaw>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawgGameRaw {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    /// Plain-text description; the listing endpoint sends `description`
    /// while the detail endpoint sends `description_raw`.
    pub description_raw: Option<String>,
    pub description: Option<String>,
    /// Release date as `YYYY-MM-DD`.
    pub released: Option<String>,
    pub background_image: Option<String>,
    pub metacritic: Option<i32>,
    pub rating: Option<f64>,
    pub ratings_count: Option<i32>,
    pub playtime: Option<i32>,
    pub esrb_rating: Option<EsrbRating>,
    pub website: Option<String>,
    pub genres: Option<Vec<Named>>,
    pub platforms: Option<Vec<PlatformEntry>>,
    pub stores: Option<Vec<StoreEntry>>,
    pub developers: Option<Vec<Named>>,
    pub publishers: Option<Vec<Named>>,
    pub short_screenshots: Option<Vec<Screenshot>>,
    pub tags: Option<Vec<Named>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EsrbRating {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformEntry {
    pub platform: Option<Named>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreEntry {
    pub store: Option<Named>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Screenshot {
    pub image: Option<String>,
}
