//! RAWG catalog driver.
//!
//! Historical sync pages through `/games` with no filters; incremental
//! sync bounds the same listing to a release-date window.

mod convert;
mod driver;
mod types;

pub use driver::RawgDriver;

/// RAWG API base URL.
pub const RAWG_BASE_URL: &str = "https://api.rawg.io/api";
