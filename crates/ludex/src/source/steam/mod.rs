//! Steam catalog driver.
//!
//! Steam has no listing pagination: the full app-id list comes back in a
//! single call and the driver fetches store detail for every id not yet
//! in storage. Only entries classified `game` get the two supplementary
//! calls (current player count and review summary).

mod convert;
mod driver;
mod types;

pub use driver::SteamDriver;

/// Steam Web API base URL (app list, player counts).
pub const STEAM_API_BASE_URL: &str = "https://api.steampowered.com";

/// Steam storefront API base URL (app details, reviews).
pub const STEAM_STORE_BASE_URL: &str = "https://store.steampowered.com/api";
