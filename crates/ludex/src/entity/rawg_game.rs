//! RawgGame entity - normalized game records from the RAWG catalog.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A game as known to RAWG.
///
/// Keyed by RAWG's own numeric id - stable across fetches, which is what
/// makes the upsert path idempotent. Array-shaped payload fields (genres,
/// platforms, tags...) are stored as JSON for cross-database compatibility.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rawg_games")]
pub struct Model {
    /// RAWG-assigned numeric id (natural key).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    pub title: String,
    pub slug: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Release date as reported by RAWG.
    pub released: Option<Date>,
    /// Release year, denormalized for filtering.
    pub release_year: Option<i32>,

    #[sea_orm(column_type = "Text", nullable)]
    pub cover_image: Option<String>,
    pub metacritic: Option<i32>,
    pub rating: Option<f64>,
    pub rating_count: Option<i32>,
    pub playtime: Option<i32>,
    pub esrb_rating: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub website: Option<String>,

    #[sea_orm(column_type = "Json")]
    pub genres: Json,
    #[sea_orm(column_type = "Json")]
    pub platforms: Json,
    #[sea_orm(column_type = "Json")]
    pub stores: Json,
    #[sea_orm(column_type = "Json")]
    pub developers: Json,
    #[sea_orm(column_type = "Json")]
    pub publishers: Json,
    #[sea_orm(column_type = "Json")]
    pub screenshots: Json,
    #[sea_orm(column_type = "Json")]
    pub tags: Json,

    /// Set on every write.
    pub last_fetched: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
