//! SyncAttempt entity - append-only log of orchestrator runs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::attempt_status::AttemptStatus;
use crate::entity::source::Source;
use crate::entity::sync_type::SyncType;

/// One row per orchestrator run.
///
/// The row is inserted with status `running` at attempt start, its cursor
/// and counters advance in place after every successfully processed page,
/// and it receives exactly one terminal transition. A later attempt reads
/// the maximum `last_cursor` ever recorded for its (source, sync_type) pair
/// before choosing a start point; a crashed attempt therefore never
/// regresses the effective cursor.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sync_attempts")]
pub struct Model {
    /// Attempt UUID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Which external source this attempt ran against.
    pub source: Source,
    /// Which kind of pass ran.
    pub sync_type: SyncType,
    /// Lifecycle status.
    pub status: AttemptStatus,

    /// When the attempt started.
    pub started_at: DateTimeWithTimeZone,
    /// When the attempt reached a terminal state.
    pub ended_at: Option<DateTimeWithTimeZone>,

    /// Records seen by this attempt (including re-deliveries).
    pub items_processed: i64,
    /// Records written by this attempt.
    pub items_added: i64,
    /// Furthest page number or offset fully processed by this attempt.
    pub last_cursor: i64,

    /// Human-readable failure description for failed attempts.
    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,

    /// Driver-specific counters (pages swept, unique ids, skip counts...).
    #[sea_orm(column_type = "Json")]
    pub metadata: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the attempt is still in flight.
    pub fn is_running(&self) -> bool {
        self.status == AttemptStatus::Running
    }
}
