//! Twitch viewership driver.
//!
//! Enumerates top games, then fans in per game: streams, recent clips
//! and top videos. Viewer totals and per-language breakdowns are
//! aggregated from the stream set before the game record is written;
//! rolling peak/average statistics are recomputed from the snapshot
//! history after all games are processed.

mod convert;
mod driver;
mod types;

pub use driver::TwitchDriver;

/// Twitch Helix API base URL.
pub const TWITCH_API_BASE_URL: &str = "https://api.twitch.tv/helix";
