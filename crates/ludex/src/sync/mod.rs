//! Sync orchestration: the attempt state machine, progress events and
//! the application-facing service.
//!
//! # Module Structure
//!
//! - [`progress`] - Progress reporting: `SyncProgress`, `ProgressCallback`, `emit()`
//! - [`engine`] - The attempt loop: `run_historical()`, `run_incremental()`, `run_hot_update()`
//! - [`service`] - Facade: `SyncService`, `SyncStats`, credentials and endpoints
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ludex::http::reqwest_transport::ReqwestTransport;
//! use ludex::sync::{SourceCredentials, SyncService};
//! use ludex::Source;
//!
//! let transport = Arc::new(ReqwestTransport::with_timeout(std::time::Duration::from_secs(10))?);
//! let service = SyncService::new(db, transport, SourceCredentials::default());
//! let summary = service.full_sync(Source::CheapShark).await?;
//! println!("processed {} in {:?}", summary.items_processed, summary.duration);
//! ```

pub mod engine;
mod progress;
mod service;

pub use engine::{SyncError, SyncSummary, run_historical, run_hot_update, run_incremental};
pub use progress::{ProgressCallback, SyncProgress, emit};
pub use service::{Endpoints, SourceCredentials, SyncService, SyncStats};
