//! SharkGame entity - per-game price summary from CheapShark.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-game detail from the `/games?id=` endpoint, including the
/// cheapest-ever price. Not available from the deals listing alone, which
/// is why the CheapShark driver runs its second backfill phase.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shark_games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub game_id: String,

    pub title: String,
    pub steam_app_id: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub thumb: Option<String>,

    pub cheapest: Option<f64>,
    pub cheapest_deal_id: Option<String>,
    pub historical_low: Option<f64>,
    pub historical_low_date: Option<DateTimeWithTimeZone>,

    /// Distinct store ids this game currently has deals at.
    #[sea_orm(column_type = "Json")]
    pub store_ids: Json,

    pub last_fetched: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
