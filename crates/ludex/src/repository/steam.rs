//! Persistence for the Steam namespace.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::steam_app::{self, Entity as SteamApp};
use crate::entity::steam_player_snapshot;

use super::{Result, required_active_value};

/// Insert or update a Steam app by its app id.
pub async fn upsert_app(
    db: &DatabaseConnection,
    model: steam_app::ActiveModel,
) -> Result<steam_app::Model> {
    let id = required_active_value("app_id", &model.app_id)?;

    match SteamApp::find_by_id(id).one(db).await? {
        Some(_) => model.update(db).await.map_err(Into::into),
        None => model.insert(db).await.map_err(Into::into),
    }
}

/// Append a player-count snapshot for an app.
pub async fn record_player_snapshot(
    db: &DatabaseConnection,
    app_id: i64,
    player_count: i32,
) -> Result<()> {
    let model = steam_player_snapshot::ActiveModel {
        id: Set(Uuid::new_v4()),
        app_id: Set(app_id),
        player_count: Set(player_count),
        captured_at: Set(Utc::now().fixed_offset()),
    };
    model.insert(db).await?;
    Ok(())
}

/// All app ids already present in storage.
///
/// The Steam full sync derives its work list from this set: every id on
/// the fresh app list that is not yet stored gets fetched.
pub async fn existing_app_ids(db: &DatabaseConnection) -> Result<HashSet<i64>> {
    let ids: Vec<i64> = SteamApp::find()
        .select_only()
        .column(steam_app::Column::AppId)
        .into_tuple()
        .all(db)
        .await?;
    Ok(ids.into_iter().collect())
}

/// App ids of stored games, least recently quick-refreshed first.
pub async fn stalest_game_ids(db: &DatabaseConnection, limit: u64) -> Result<Vec<i64>> {
    SteamApp::find()
        .filter(steam_app::Column::AppType.eq("game"))
        .order_by_asc(steam_app::Column::LastQuickUpdate)
        .limit(limit)
        .select_only()
        .column(steam_app::Column::AppId)
        .into_tuple()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Total stored apps.
pub async fn count_apps(db: &DatabaseConnection) -> Result<u64> {
    SteamApp::find().count(db).await.map_err(Into::into)
}

/// Stored apps of type `game`.
pub async fn count_games(db: &DatabaseConnection) -> Result<u64> {
    SteamApp::find()
        .filter(steam_app::Column::AppType.eq("game"))
        .count(db)
        .await
        .map_err(Into::into)
}
