//! IgdbGame entity - normalized game records from IGDB.
//!
//! Stored in its own namespace; IGDB ids never collide with RAWG ids
//! because the tables are separate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "igdb_games")]
pub struct Model {
    /// IGDB-assigned numeric id (natural key).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    pub name: String,
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub summary: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub storyline: Option<String>,

    pub first_release_date: Option<DateTimeWithTimeZone>,
    pub release_year: Option<i32>,

    /// Cover art URL, upscaled from the thumbnail IGDB returns.
    #[sea_orm(column_type = "Text", nullable)]
    pub cover_url: Option<String>,

    /// IGDB user rating (0-100).
    pub igdb_rating: Option<f64>,
    /// External critic rating (0-100).
    pub aggregated_rating: Option<f64>,
    pub rating_count: i32,
    pub aggregated_rating_count: i32,

    /// IGDB category discriminator (0 = main game).
    pub category: i32,
    /// IGDB release status code.
    pub status: Option<i32>,

    #[sea_orm(column_type = "Json")]
    pub genres: Json,
    #[sea_orm(column_type = "Json")]
    pub platforms: Json,
    #[sea_orm(column_type = "Json")]
    pub developers: Json,
    #[sea_orm(column_type = "Json")]
    pub publishers: Json,
    #[sea_orm(column_type = "Json")]
    pub screenshots: Json,

    /// Long-tail IGDB fields that have no dedicated column.
    #[sea_orm(column_type = "Json")]
    pub metadata: Json,

    pub last_fetched: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
