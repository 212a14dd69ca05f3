//! Persistence for the IGDB namespace.

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::entity::igdb_game::{ActiveModel, Entity as IgdbGame, Model};

use super::{Result, required_active_value};

/// Insert or update an IGDB game by its natural key (IGDB id).
pub async fn upsert_game(db: &DatabaseConnection, model: ActiveModel) -> Result<Model> {
    let id = required_active_value("id", &model.id)?;

    match IgdbGame::find_by_id(id).one(db).await? {
        Some(_) => model.update(db).await.map_err(Into::into),
        None => model.insert(db).await.map_err(Into::into),
    }
}

/// Total stored IGDB games.
pub async fn count_games(db: &DatabaseConnection) -> Result<u64> {
    IgdbGame::find().count(db).await.map_err(Into::into)
}
