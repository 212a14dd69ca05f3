//! Persistence for the CheapShark namespace: stores, deals and per-game
//! price summaries.

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use crate::entity::shark_deal;
use crate::entity::shark_game;
use crate::entity::shark_store;

use super::{Result, required_active_value};

/// Insert or update a storefront by its CheapShark store id.
pub async fn upsert_store(
    db: &DatabaseConnection,
    model: shark_store::ActiveModel,
) -> Result<shark_store::Model> {
    let id = required_active_value("store_id", &model.store_id)?;

    match shark_store::Entity::find_by_id(&id).one(db).await? {
        Some(_) => model.update(db).await.map_err(Into::into),
        None => model.insert(db).await.map_err(Into::into),
    }
}

/// Insert or update a deal by its deal id (or fallback composite key).
///
/// Re-delivery of the same deal from either sweep phase lands on the same
/// row; the second write's set columns win.
pub async fn upsert_deal(
    db: &DatabaseConnection,
    model: shark_deal::ActiveModel,
) -> Result<shark_deal::Model> {
    let id = required_active_value("deal_id", &model.deal_id)?;

    match shark_deal::Entity::find_by_id(&id).one(db).await? {
        Some(_) => model.update(db).await.map_err(Into::into),
        None => model.insert(db).await.map_err(Into::into),
    }
}

/// Insert or update a per-game price summary by its CheapShark game id.
pub async fn upsert_game(
    db: &DatabaseConnection,
    model: shark_game::ActiveModel,
) -> Result<shark_game::Model> {
    let id = required_active_value("game_id", &model.game_id)?;

    match shark_game::Entity::find_by_id(&id).one(db).await? {
        Some(_) => model.update(db).await.map_err(Into::into),
        None => model.insert(db).await.map_err(Into::into),
    }
}

/// Total stored deals.
pub async fn count_deals(db: &DatabaseConnection) -> Result<u64> {
    shark_deal::Entity::find().count(db).await.map_err(Into::into)
}

/// Deals currently flagged on sale.
pub async fn count_active_deals(db: &DatabaseConnection) -> Result<u64> {
    shark_deal::Entity::find()
        .filter(shark_deal::Column::IsOnSale.eq(true))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Total stored game summaries.
pub async fn count_games(db: &DatabaseConnection) -> Result<u64> {
    shark_game::Entity::find().count(db).await.map_err(Into::into)
}

/// Total stored storefronts.
pub async fn count_stores(db: &DatabaseConnection) -> Result<u64> {
    shark_store::Entity::find().count(db).await.map_err(Into::into)
}
