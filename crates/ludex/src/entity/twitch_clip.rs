//! TwitchClip entity - recent clips captured during a pass.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "twitch_clips")]
pub struct Model {
    /// Twitch clip id (natural key).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub game_id: String,
    pub broadcaster_id: String,
    pub broadcaster_name: String,
    pub creator_id: Option<String>,
    pub creator_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub title: Option<String>,
    pub view_count: i64,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub duration: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub thumbnail_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub embed_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub url: Option<String>,
    pub video_id: Option<String>,
    pub vod_offset: Option<i32>,
    pub language: Option<String>,

    pub captured_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
