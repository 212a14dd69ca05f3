//! TwitchStream entity - individual live streams captured during a pass.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "twitch_streams")]
pub struct Model {
    /// Twitch stream id (natural key).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub game_id: String,
    pub game_name: Option<String>,
    pub user_id: String,
    pub user_login: String,
    pub user_display_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub title: Option<String>,
    pub viewer_count: i64,
    pub started_at: Option<DateTimeWithTimeZone>,
    pub language: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub thumbnail_url: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub tags: Json,
    pub is_mature: bool,

    pub captured_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
