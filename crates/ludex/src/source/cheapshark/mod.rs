//! CheapShark deals driver.
//!
//! The full sync is deliberately two-phase: a paginated sweep over the
//! deals listing (which also derives the set of unique game ids seen),
//! followed by a per-game detail backfill, because cheapest-ever pricing
//! and bundle history are only available from the per-game endpoint.

mod convert;
mod driver;
mod types;

pub use convert::{calculate_savings, parse_flag};
pub use driver::CheapSharkDriver;

/// CheapShark API base URL.
pub const CHEAPSHARK_BASE_URL: &str = "https://www.cheapshark.com/api/1.0";
