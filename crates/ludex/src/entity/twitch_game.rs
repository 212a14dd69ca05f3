//! TwitchGame entity - viewership-aggregated game records from Twitch.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A game as seen on Twitch, with aggregates computed from its stream set
/// at fetch time and rolling statistics recomputed from snapshots.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "twitch_games")]
pub struct Model {
    /// Twitch game id (stringly typed upstream, natural key).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub box_art_url: Option<String>,
    /// Cross-reference into IGDB when Twitch provides one.
    pub igdb_id: Option<String>,

    /// Sum of viewers across the streams captured in the latest pass.
    pub current_viewers: i64,
    /// Number of live channels captured in the latest pass.
    pub current_channels: i32,

    /// Per-language {viewers, channels} breakdown.
    #[sea_orm(column_type = "Json")]
    pub language_breakdown: Json,
    /// Top streamers by viewers (bounded to 20).
    #[sea_orm(column_type = "Json")]
    pub top_streamers: Json,
    /// Union of tags across captured streams.
    #[sea_orm(column_type = "Json")]
    pub tags: Json,

    // Rolling statistics, recomputed from viewer snapshots.
    pub peak_viewers_today: i64,
    pub peak_viewers_week: i64,
    pub peak_viewers_month: i64,
    pub peak_viewers_all_time: i64,
    pub avg_viewers_day: i64,
    pub avg_viewers_week: i64,
    pub avg_viewers_month: i64,

    pub last_fetched: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
