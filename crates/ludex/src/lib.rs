//! Ludex - a multi-source video-game metadata aggregator.
//!
//! This library pulls game metadata, pricing and viewership signals from
//! five independent external APIs (RAWG, IGDB, CheapShark, Steam,
//! Twitch) into a local relational store through an incremental,
//! resumable synchronization engine. Every source keeps its own
//! namespace, its own pacing and its own checkpoint cursors; long
//! historical sweeps survive process restarts by resuming from the
//! furthest cursor ever recorded.
//!
//! # Features
//!
//! - `migrate` (default) - Enables database migration support and
//!   [`connect_and_migrate`].
//!
//! # Example
//!
//! ```ignore
//! use ludex::{Source, connect_and_migrate};
//! use ludex::sync::{SourceCredentials, SyncService};
//!
//! let db = connect_and_migrate("sqlite://ludex.db?mode=rwc").await?;
//! let transport = std::sync::Arc::new(
//!     ludex::http::reqwest_transport::ReqwestTransport::with_timeout(
//!         std::time::Duration::from_secs(10),
//!     )?,
//! );
//!
//! let service = SyncService::new(db, transport, SourceCredentials::default());
//! let summary = service.full_sync(Source::CheapShark).await?;
//! let stats = service.sync_stats(Source::CheapShark).await?;
//! ```

pub mod auth;
pub mod checkpoint;
pub mod db;
pub mod entity;
pub mod fetch;
pub mod http;
pub mod pace;
pub mod repository;
pub mod source;
pub mod sync;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use repository::RepositoryError;
pub use source::{SourceDriver, SourceLimits};
pub use sync::{SyncError, SyncService, SyncSummary};
