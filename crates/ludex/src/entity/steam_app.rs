//! SteamApp entity - store entries from the Steam catalog.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One Steam app of any type (game, dlc, demo, software...).
///
/// Only entries classified `game` carry the supplementary player-count and
/// review fields; other types are stored with those left null. The hot
/// refresh path updates `current_players` and `last_quick_update` alone,
/// leaving every other column untouched.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "steam_apps")]
pub struct Model {
    /// Steam app id (natural key).
    #[sea_orm(primary_key, auto_increment = false)]
    pub app_id: i64,

    pub name: String,
    /// Steam's type discriminator: game, dlc, demo, music, video...
    pub app_type: String,
    pub is_free: bool,
    pub required_age: Option<i32>,

    #[sea_orm(column_type = "Text", nullable)]
    pub short_description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub header_image: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub website: Option<String>,

    #[sea_orm(column_type = "Json")]
    pub developers: Json,
    #[sea_orm(column_type = "Json")]
    pub publishers: Json,
    #[sea_orm(column_type = "Json")]
    pub categories: Json,
    #[sea_orm(column_type = "Json")]
    pub genres: Json,
    /// Raw price_overview block (currency, initial, final, discount).
    #[sea_orm(column_type = "Json")]
    pub price_overview: Json,

    pub metacritic_score: Option<i32>,
    pub recommendations: Option<i32>,
    /// Steam's display release date, kept verbatim (e.g. "14 Nov, 2022").
    pub release_date: Option<String>,
    pub controller_support: Option<String>,
    pub dlc_count: i32,

    // Supplementary fields, games only.
    pub current_players: Option<i32>,
    pub review_score: Option<i32>,
    pub review_score_desc: Option<String>,
    pub total_positive: Option<i32>,
    pub total_negative: Option<i32>,
    pub total_reviews: Option<i32>,

    /// Long-tail appdetails fields with no dedicated column.
    #[sea_orm(column_type = "Json")]
    pub metadata: Json,

    pub last_fetched: DateTimeWithTimeZone,
    /// Last time the quick player-count refresh touched this row.
    pub last_quick_update: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
