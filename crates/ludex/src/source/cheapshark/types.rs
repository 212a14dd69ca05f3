//! Raw payload schemas for the CheapShark API.
//!
//! CheapShark encodes most numbers as strings ("14.99", "70") and flags
//! as either strings or numbers ("1", 1). The lenient deserializers from
//! `source::de` accept both encodings; flags are kept as raw JSON values
//! and decoded by `convert::parse_flag`.

use serde::Deserialize;

use crate::source::de::{lenient_f64, lenient_i32, lenient_i64};

/// A storefront from `/stores`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreRaw {
    #[serde(rename = "storeID")]
    pub store_id: String,
    #[serde(rename = "storeName")]
    pub store_name: String,
    #[serde(rename = "isActive")]
    pub is_active: Option<serde_json::Value>,
    pub images: Option<StoreImages>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreImages {
    pub banner: Option<String>,
    pub logo: Option<String>,
    pub icon: Option<String>,
}

/// A deal, either from the `/deals` listing or embedded in game detail.
///
/// The two shapes differ: listing deals carry `dealID`, `salePrice` and
/// `normalPrice`; embedded deals carry `price` and `retailPrice` and no
/// deal id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealRaw {
    #[serde(rename = "dealID")]
    pub deal_id: Option<String>,
    #[serde(rename = "gameID")]
    pub game_id: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "storeID")]
    pub store_id: Option<String>,
    #[serde(rename = "storeName")]
    pub store_name: Option<String>,
    #[serde(default, rename = "salePrice", deserialize_with = "lenient_f64")]
    pub sale_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, rename = "normalPrice", deserialize_with = "lenient_f64")]
    pub normal_price: Option<f64>,
    #[serde(default, rename = "retailPrice", deserialize_with = "lenient_f64")]
    pub retail_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub savings: Option<f64>,
    #[serde(default, rename = "metacriticScore", deserialize_with = "lenient_i32")]
    pub metacritic_score: Option<i32>,
    #[serde(rename = "metacriticLink")]
    pub metacritic_link: Option<String>,
    #[serde(rename = "steamRatingText")]
    pub steam_rating_text: Option<String>,
    #[serde(default, rename = "steamRatingPercent", deserialize_with = "lenient_i32")]
    pub steam_rating_percent: Option<i32>,
    #[serde(default, rename = "steamRatingCount", deserialize_with = "lenient_i32")]
    pub steam_rating_count: Option<i32>,
    #[serde(rename = "steamAppID")]
    pub steam_app_id: Option<String>,
    #[serde(default, rename = "releaseDate", deserialize_with = "lenient_i64")]
    pub release_date: Option<i64>,
    #[serde(default, rename = "lastChange", deserialize_with = "lenient_i64")]
    pub last_change: Option<i64>,
    #[serde(default, rename = "dealRating", deserialize_with = "lenient_f64")]
    pub deal_rating: Option<f64>,
    pub thumb: Option<String>,
    #[serde(rename = "isOnSale")]
    pub is_on_sale: Option<serde_json::Value>,
}

/// Per-game detail from `/games?id=`.
#[derive(Debug, Clone, Deserialize)]
pub struct GameDetailRaw {
    pub info: Option<GameInfoRaw>,
    #[serde(rename = "cheapestPriceEver")]
    pub cheapest_price_ever: Option<CheapestEverRaw>,
    pub deals: Option<Vec<DealRaw>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameInfoRaw {
    pub title: Option<String>,
    #[serde(rename = "steamAppID")]
    pub steam_app_id: Option<String>,
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheapestEverRaw {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub date: Option<i64>,
    #[serde(rename = "dealID")]
    pub deal_id: Option<String>,
}
