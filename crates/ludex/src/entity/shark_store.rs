//! SharkStore entity - storefronts known to CheapShark.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shark_stores")]
pub struct Model {
    /// CheapShark store id (natural key, stringly typed upstream).
    #[sea_orm(primary_key, auto_increment = false)]
    pub store_id: String,

    pub store_name: String,
    /// Normalized from the upstream 0/1 flag.
    pub is_active: bool,

    #[sea_orm(column_type = "Text", nullable)]
    pub banner: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub logo: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub icon: Option<String>,

    pub last_fetched: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
