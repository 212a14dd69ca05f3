//! Checkpoint persistence for sync attempts.
//!
//! This module exclusively owns the `sync_attempts` table: the append-only
//! log of orchestrator runs and the cursor each run reached. The one
//! non-obvious rule lives in [`latest_cursor`]: the start point for a new
//! attempt is the maximum cursor *ever* recorded for the (source,
//! sync_type) pair, not the cursor of the most recent row. A crashed
//! attempt leaves a `running` row behind with a stale cursor; trusting only
//! the newest row could regress the cursor when attempts of different
//! vintages overlap.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use thiserror::Error;
use uuid::Uuid;

use crate::entity::attempt_status::AttemptStatus;
use crate::entity::source::Source;
use crate::entity::sync_attempt::{ActiveModel, Column, Entity as SyncAttempt, Model};
use crate::entity::sync_type::SyncType;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("sync attempt not found: {0}")]
    AttemptNotFound(Uuid),
}

pub type Result<T> = std::result::Result<T, CheckpointError>;

/// The furthest cursor ever recorded for (source, sync_type), or 0.
pub async fn latest_cursor(
    db: &DatabaseConnection,
    source: Source,
    sync_type: SyncType,
) -> Result<i64> {
    let max: Option<Option<i64>> = SyncAttempt::find()
        .filter(Column::Source.eq(source))
        .filter(Column::SyncType.eq(sync_type))
        .select_only()
        .column_as(Column::LastCursor.max(), "max_cursor")
        .into_tuple()
        .one(db)
        .await?;

    Ok(max.flatten().unwrap_or(0))
}

/// Insert a new attempt row with status `running`.
pub async fn begin_attempt(
    db: &DatabaseConnection,
    source: Source,
    sync_type: SyncType,
    start_cursor: i64,
) -> Result<Model> {
    let now = Utc::now().fixed_offset();
    let model = ActiveModel {
        id: Set(Uuid::new_v4()),
        source: Set(source),
        sync_type: Set(sync_type),
        status: Set(AttemptStatus::Running),
        started_at: Set(now),
        ended_at: Set(None),
        items_processed: Set(0),
        items_added: Set(0),
        last_cursor: Set(start_cursor),
        error_message: Set(None),
        metadata: Set(serde_json::json!({})),
    };

    let saved = model.insert(db).await?;
    tracing::debug!(
        attempt = %saved.id,
        source = %source,
        sync_type = %sync_type,
        start_cursor,
        "sync attempt started"
    );
    Ok(saved)
}

/// Advance the attempt's cursor and counters in place.
///
/// Called after every successfully processed page. This is the unit of
/// resumability: if the process dies right after, the next run starts from
/// `cursor` and re-fetches at most the page that was in flight.
pub async fn advance(
    db: &DatabaseConnection,
    attempt_id: Uuid,
    cursor: i64,
    items_processed: i64,
    items_added: i64,
) -> Result<()> {
    let model = ActiveModel {
        id: Set(attempt_id),
        last_cursor: Set(cursor),
        items_processed: Set(items_processed),
        items_added: Set(items_added),
        ..Default::default()
    };
    model.update(db).await?;
    Ok(())
}

/// Mark the attempt completed.
///
/// Terminal transition; the orchestrator calls this (or [`fail`]) exactly
/// once per attempt. A repeat call on an already-terminal row is a no-op.
pub async fn complete(
    db: &DatabaseConnection,
    attempt_id: Uuid,
    items_processed: i64,
    items_added: i64,
    metadata: serde_json::Value,
) -> Result<()> {
    let existing = find_required(db, attempt_id).await?;
    if existing.status != AttemptStatus::Running {
        tracing::warn!(attempt = %attempt_id, status = %existing.status, "attempt already terminal, ignoring complete");
        return Ok(());
    }

    let model = ActiveModel {
        id: Set(attempt_id),
        status: Set(AttemptStatus::Completed),
        ended_at: Set(Some(Utc::now().fixed_offset())),
        items_processed: Set(items_processed),
        items_added: Set(items_added),
        metadata: Set(metadata),
        ..Default::default()
    };
    model.update(db).await?;
    Ok(())
}

/// Mark the attempt failed with a human-readable message.
pub async fn fail(
    db: &DatabaseConnection,
    attempt_id: Uuid,
    error_message: impl Into<String>,
) -> Result<()> {
    let existing = find_required(db, attempt_id).await?;
    if existing.status != AttemptStatus::Running {
        tracing::warn!(attempt = %attempt_id, status = %existing.status, "attempt already terminal, ignoring fail");
        return Ok(());
    }

    let model = ActiveModel {
        id: Set(attempt_id),
        status: Set(AttemptStatus::Failed),
        ended_at: Set(Some(Utc::now().fixed_offset())),
        error_message: Set(Some(error_message.into())),
        ..Default::default()
    };
    model.update(db).await?;
    Ok(())
}

/// The most recent completed attempt for (source, sync_type), if any.
pub async fn last_completed(
    db: &DatabaseConnection,
    source: Source,
    sync_type: SyncType,
) -> Result<Option<Model>> {
    SyncAttempt::find()
        .filter(Column::Source.eq(source))
        .filter(Column::SyncType.eq(sync_type))
        .filter(Column::Status.eq(AttemptStatus::Completed))
        .order_by_desc(Column::StartedAt)
        .one(db)
        .await
        .map_err(CheckpointError::from)
}

/// Recent attempts for a source, newest first.
pub async fn history(db: &DatabaseConnection, source: Source, limit: u64) -> Result<Vec<Model>> {
    SyncAttempt::find()
        .filter(Column::Source.eq(source))
        .order_by_desc(Column::StartedAt)
        .limit(limit)
        .all(db)
        .await
        .map_err(CheckpointError::from)
}

async fn find_required(db: &DatabaseConnection, attempt_id: Uuid) -> Result<Model> {
    SyncAttempt::find_by_id(attempt_id)
        .one(db)
        .await?
        .ok_or(CheckpointError::AttemptNotFound(attempt_id))
}

#[cfg(all(test, feature = "migrate"))]
mod tests {
    use super::*;
    use crate::db::connect_and_migrate;

    async fn setup_db() -> DatabaseConnection {
        connect_and_migrate("sqlite::memory:")
            .await
            .expect("test db should migrate")
    }

    #[tokio::test]
    async fn latest_cursor_is_zero_with_no_attempts() {
        let db = setup_db().await;
        let cursor = latest_cursor(&db, Source::Rawg, SyncType::Historical)
            .await
            .unwrap();
        assert_eq!(cursor, 0);
    }

    #[tokio::test]
    async fn latest_cursor_is_max_over_all_attempts_not_most_recent() {
        let db = setup_db().await;

        // First attempt got far, then crashed (left running).
        let first = begin_attempt(&db, Source::Rawg, SyncType::Historical, 0)
            .await
            .unwrap();
        advance(&db, first.id, 50, 2000, 1900).await.unwrap();

        // A newer attempt started from a stale view and recorded less.
        let second = begin_attempt(&db, Source::Rawg, SyncType::Historical, 0)
            .await
            .unwrap();
        advance(&db, second.id, 12, 480, 480).await.unwrap();
        fail(&db, second.id, "network trouble").await.unwrap();

        let cursor = latest_cursor(&db, Source::Rawg, SyncType::Historical)
            .await
            .unwrap();
        assert_eq!(cursor, 50);
    }

    #[tokio::test]
    async fn latest_cursor_is_scoped_to_source_and_sync_type() {
        let db = setup_db().await;

        let attempt = begin_attempt(&db, Source::Rawg, SyncType::Historical, 0)
            .await
            .unwrap();
        advance(&db, attempt.id, 99, 10, 10).await.unwrap();

        assert_eq!(
            latest_cursor(&db, Source::Rawg, SyncType::Incremental)
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            latest_cursor(&db, Source::Igdb, SyncType::Historical)
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn cursor_is_monotonic_across_failed_attempts() {
        let db = setup_db().await;

        let mut previous = 0;
        for (cursor, should_fail) in [(10, false), (25, true), (40, false)] {
            let attempt = begin_attempt(&db, Source::Rawg, SyncType::Historical, previous)
                .await
                .unwrap();
            advance(&db, attempt.id, cursor, 0, 0).await.unwrap();
            if should_fail {
                fail(&db, attempt.id, "boom").await.unwrap();
            } else {
                complete(&db, attempt.id, 0, 0, serde_json::json!({}))
                    .await
                    .unwrap();
            }

            let latest = latest_cursor(&db, Source::Rawg, SyncType::Historical)
                .await
                .unwrap();
            assert!(latest >= previous, "cursor regressed: {latest} < {previous}");
            previous = latest;
        }

        assert_eq!(previous, 40);
    }

    #[tokio::test]
    async fn complete_sets_terminal_state_once() {
        let db = setup_db().await;

        let attempt = begin_attempt(&db, Source::CheapShark, SyncType::Historical, 0)
            .await
            .unwrap();
        assert!(attempt.is_running());

        complete(&db, attempt.id, 120, 118, serde_json::json!({"pages": 2}))
            .await
            .unwrap();

        let saved = SyncAttempt::find_by_id(attempt.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.status, AttemptStatus::Completed);
        assert_eq!(saved.items_processed, 120);
        assert_eq!(saved.items_added, 118);
        assert!(saved.ended_at.is_some());

        // A later fail on the terminal row is ignored.
        fail(&db, attempt.id, "late failure").await.unwrap();
        let still = SyncAttempt::find_by_id(attempt.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(still.status, AttemptStatus::Completed);
        assert!(still.error_message.is_none());
    }

    #[tokio::test]
    async fn fail_records_error_message() {
        let db = setup_db().await;

        let attempt = begin_attempt(&db, Source::Steam, SyncType::Historical, 0)
            .await
            .unwrap();
        fail(&db, attempt.id, "5 consecutive errors").await.unwrap();

        let saved = SyncAttempt::find_by_id(attempt.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.status, AttemptStatus::Failed);
        assert_eq!(saved.error_message.as_deref(), Some("5 consecutive errors"));
    }

    #[tokio::test]
    async fn last_completed_skips_failed_and_running() {
        let db = setup_db().await;

        let done = begin_attempt(&db, Source::Twitch, SyncType::HotUpdate, 0)
            .await
            .unwrap();
        complete(&db, done.id, 5, 5, serde_json::json!({}))
            .await
            .unwrap();

        let failed = begin_attempt(&db, Source::Twitch, SyncType::HotUpdate, 0)
            .await
            .unwrap();
        fail(&db, failed.id, "nope").await.unwrap();

        let _running = begin_attempt(&db, Source::Twitch, SyncType::HotUpdate, 0)
            .await
            .unwrap();

        let last = last_completed(&db, Source::Twitch, SyncType::HotUpdate)
            .await
            .unwrap()
            .expect("one completed attempt");
        assert_eq!(last.id, done.id);
    }

    #[tokio::test]
    async fn history_returns_newest_first() {
        let db = setup_db().await;

        for _ in 0..3 {
            begin_attempt(&db, Source::Igdb, SyncType::Historical, 0)
                .await
                .unwrap();
        }

        let rows = history(&db, Source::Igdb, 10).await.unwrap();
        assert_eq!(rows.len(), 3);
    }
}
