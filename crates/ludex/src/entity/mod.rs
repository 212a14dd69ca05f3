//! SeaORM entity definitions for the ludex database schema.
//!
//! One normalized-record table per source namespace, plus the sync-attempt
//! audit log. Sources are never merged: a RAWG game and an IGDB game live
//! in separate tables even when they describe the same title.

pub mod attempt_status;
pub mod igdb_game;
pub mod prelude;
pub mod rawg_game;
pub mod shark_deal;
pub mod shark_game;
pub mod shark_store;
pub mod source;
pub mod steam_app;
pub mod steam_player_snapshot;
pub mod sync_attempt;
pub mod sync_type;
pub mod twitch_clip;
pub mod twitch_game;
pub mod twitch_stream;
pub mod twitch_viewer_snapshot;
