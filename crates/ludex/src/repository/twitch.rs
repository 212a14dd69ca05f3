//! Persistence for the Twitch namespace: games, streams, clips and the
//! viewer-history snapshots behind the rolling statistics.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::twitch_clip;
use crate::entity::twitch_game::{self, Entity as TwitchGame};
use crate::entity::twitch_stream;
use crate::entity::twitch_viewer_snapshot::{self, Entity as TwitchViewerSnapshot};

use super::{Result, required_active_value};

/// Insert or update a Twitch game by its Twitch id.
pub async fn upsert_game(
    db: &DatabaseConnection,
    model: twitch_game::ActiveModel,
) -> Result<twitch_game::Model> {
    let id = required_active_value("id", &model.id)?;

    match TwitchGame::find_by_id(&id).one(db).await? {
        Some(_) => model.update(db).await.map_err(Into::into),
        None => model.insert(db).await.map_err(Into::into),
    }
}

/// Insert or update a stream by its Twitch stream id.
pub async fn upsert_stream(
    db: &DatabaseConnection,
    model: twitch_stream::ActiveModel,
) -> Result<twitch_stream::Model> {
    let id = required_active_value("id", &model.id)?;

    match twitch_stream::Entity::find_by_id(&id).one(db).await? {
        Some(_) => model.update(db).await.map_err(Into::into),
        None => model.insert(db).await.map_err(Into::into),
    }
}

/// Insert or update a clip by its Twitch clip id.
pub async fn upsert_clip(
    db: &DatabaseConnection,
    model: twitch_clip::ActiveModel,
) -> Result<twitch_clip::Model> {
    let id = required_active_value("id", &model.id)?;

    match twitch_clip::Entity::find_by_id(&id).one(db).await? {
        Some(_) => model.update(db).await.map_err(Into::into),
        None => model.insert(db).await.map_err(Into::into),
    }
}

/// Append a viewer/channel snapshot for a game.
pub async fn record_viewer_snapshot(
    db: &DatabaseConnection,
    game_id: &str,
    viewers: i64,
    channels: i32,
) -> Result<()> {
    let model = twitch_viewer_snapshot::ActiveModel {
        id: Set(Uuid::new_v4()),
        game_id: Set(game_id.to_string()),
        viewers: Set(viewers),
        channels: Set(channels),
        captured_at: Set(Utc::now().fixed_offset()),
    };
    model.insert(db).await?;
    Ok(())
}

/// Viewer counts recorded for a game since `since`.
pub async fn viewer_counts_since(
    db: &DatabaseConnection,
    game_id: &str,
    since: DateTime<FixedOffset>,
) -> Result<Vec<i64>> {
    TwitchViewerSnapshot::find()
        .filter(twitch_viewer_snapshot::Column::GameId.eq(game_id))
        .filter(twitch_viewer_snapshot::Column::CapturedAt.gte(since))
        .select_only()
        .column(twitch_viewer_snapshot::Column::Viewers)
        .into_tuple()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Highest viewer count ever recorded for a game, 0 if no snapshots.
pub async fn peak_viewers_all_time(db: &DatabaseConnection, game_id: &str) -> Result<i64> {
    let max: Option<Option<i64>> = TwitchViewerSnapshot::find()
        .filter(twitch_viewer_snapshot::Column::GameId.eq(game_id))
        .select_only()
        .column_as(twitch_viewer_snapshot::Column::Viewers.max(), "max_viewers")
        .into_tuple()
        .one(db)
        .await?;
    Ok(max.flatten().unwrap_or(0))
}

/// Rolling peak/average viewer statistics for one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewerStats {
    pub peak_today: i64,
    pub peak_week: i64,
    pub peak_month: i64,
    pub peak_all_time: i64,
    pub avg_day: i64,
    pub avg_week: i64,
    pub avg_month: i64,
}

/// Write recomputed rolling statistics onto the game row.
///
/// Partial update: only the statistics columns are touched.
pub async fn update_viewer_stats(
    db: &DatabaseConnection,
    game_id: &str,
    stats: ViewerStats,
) -> Result<()> {
    let model = twitch_game::ActiveModel {
        id: Set(game_id.to_string()),
        peak_viewers_today: Set(stats.peak_today),
        peak_viewers_week: Set(stats.peak_week),
        peak_viewers_month: Set(stats.peak_month),
        peak_viewers_all_time: Set(stats.peak_all_time),
        avg_viewers_day: Set(stats.avg_day),
        avg_viewers_week: Set(stats.avg_week),
        avg_viewers_month: Set(stats.avg_month),
        ..Default::default()
    };
    model.update(db).await?;
    Ok(())
}

/// Total stored games.
pub async fn count_games(db: &DatabaseConnection) -> Result<u64> {
    TwitchGame::find().count(db).await.map_err(Into::into)
}

/// Total stored streams.
pub async fn count_streams(db: &DatabaseConnection) -> Result<u64> {
    twitch_stream::Entity::find()
        .count(db)
        .await
        .map_err(Into::into)
}

/// Total stored clips.
pub async fn count_clips(db: &DatabaseConnection) -> Result<u64> {
    twitch_clip::Entity::find()
        .count(db)
        .await
        .map_err(Into::into)
}
