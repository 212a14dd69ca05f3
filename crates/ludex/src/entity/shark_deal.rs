//! SharkDeal entity - individual price deals from CheapShark.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One deal (a price at a store for a game).
///
/// Keyed by CheapShark's dealID when present. Deals embedded in the
/// per-game detail payload carry no dealID, so those fall back to the
/// composite `storeID_gameID_price` key. Two genuinely different deals
/// sharing store, game and price would collide under that fallback; the
/// upstream data model has the same property and we keep it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shark_deals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub deal_id: String,

    pub game_id: String,
    pub title: String,
    pub store_id: String,
    pub store_name: Option<String>,

    pub sale_price: f64,
    pub normal_price: f64,
    /// Savings percentage; taken from the payload when present, otherwise
    /// computed as round((normal - sale) / normal * 100).
    pub savings: f64,

    pub metacritic_score: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub metacritic_link: Option<String>,
    pub steam_rating_text: Option<String>,
    pub steam_rating_percent: Option<i32>,
    pub steam_rating_count: Option<i32>,
    pub steam_app_id: Option<String>,

    pub release_date: Option<DateTimeWithTimeZone>,
    pub last_change: Option<DateTimeWithTimeZone>,
    pub deal_rating: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub thumb: Option<String>,
    /// Normalized from the upstream "1"/1/true encoding.
    pub is_on_sale: bool,

    pub last_fetched: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
