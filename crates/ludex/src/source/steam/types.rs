//! Raw payload schemas for the Steam APIs.

use std::collections::HashMap;

use serde::Deserialize;

use crate::source::de::lenient_i32;

/// `ISteamApps/GetAppList/v2` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct AppListResponse {
    pub applist: AppList,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppList {
    pub apps: Vec<AppEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppEntry {
    pub appid: i64,
    pub name: String,
}

/// `appdetails` envelope: keyed by the requested app id.
pub type AppDetailsEnvelope = HashMap<String, AppDetailsEntry>;

#[derive(Debug, Clone, Deserialize)]
pub struct AppDetailsEntry {
    pub success: bool,
    pub data: Option<AppDetailsRaw>,
}

/// The appdetails data block. Steam mixes number and string encodings
/// for `required_age` depending on the entry.
#[derive(Debug, Clone, Deserialize)]
pub struct AppDetailsRaw {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub app_type: Option<String>,
    pub is_free: Option<bool>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub required_age: Option<i32>,
    pub short_description: Option<String>,
    pub header_image: Option<String>,
    pub website: Option<String>,
    pub developers: Option<Vec<String>>,
    pub publishers: Option<Vec<String>>,
    pub price_overview: Option<serde_json::Value>,
    pub categories: Option<Vec<Described>>,
    pub genres: Option<Vec<Described>>,
    pub metacritic: Option<MetacriticRaw>,
    pub recommendations: Option<RecommendationsRaw>,
    pub release_date: Option<ReleaseDateRaw>,
    pub controller_support: Option<String>,
    pub dlc: Option<Vec<i64>>,
    pub platforms: Option<serde_json::Value>,
    pub achievements: Option<serde_json::Value>,
    pub supported_languages: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Described {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetacriticRaw {
    pub score: Option<i32>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsRaw {
    pub total: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseDateRaw {
    pub coming_soon: Option<bool>,
    pub date: Option<String>,
}

/// `GetNumberOfCurrentPlayers` envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerCountResponse {
    pub response: PlayerCountInner,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerCountInner {
    pub player_count: Option<i64>,
}

/// `appreviews` summary envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewsResponse {
    pub query_summary: Option<QuerySummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuerySummary {
    pub total_positive: Option<i32>,
    pub total_negative: Option<i32>,
    pub total_reviews: Option<i32>,
    pub review_score: Option<i32>,
    pub review_score_desc: Option<String>,
}
