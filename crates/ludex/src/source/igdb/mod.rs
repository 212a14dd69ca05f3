//! IGDB catalog driver.
//!
//! IGDB is offset-paginated and authenticated through the Twitch identity
//! service. A 400 response past the end of the dataset is IGDB's way of
//! saying "no more rows", not an error.

mod convert;
mod driver;
mod types;

pub use driver::IgdbDriver;

/// IGDB API base URL.
pub const IGDB_BASE_URL: &str = "https://api.igdb.com/v4";
