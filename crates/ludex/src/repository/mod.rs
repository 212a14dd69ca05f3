//! Idempotent record persistence (the upsert sink).
//!
//! Every collection follows the same contract: records are keyed by their
//! source-assigned natural key, writing the same key twice never duplicates
//! a row, and an update only touches the columns the caller `Set(..)`.
//! That last property is what gives partial payloads field-level merge
//! semantics: a driver that fetched only a subset of fields leaves the
//! rest `NotSet` and the stored values survive. An explicit `Set(None)`
//! clears a nullable column.

mod errors;

pub mod igdb;
pub mod rawg;
pub mod shark;
pub mod steam;
pub mod twitch;

pub use errors::{RepositoryError, Result};

pub(crate) use errors::required_active_value;
