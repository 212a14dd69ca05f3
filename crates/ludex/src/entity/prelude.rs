//! Re-exports of all entities under their conventional names.

pub use super::attempt_status::AttemptStatus;
pub use super::igdb_game::Entity as IgdbGame;
pub use super::rawg_game::Entity as RawgGame;
pub use super::shark_deal::Entity as SharkDeal;
pub use super::shark_game::Entity as SharkGame;
pub use super::shark_store::Entity as SharkStore;
pub use super::source::Source;
pub use super::steam_app::Entity as SteamApp;
pub use super::steam_player_snapshot::Entity as SteamPlayerSnapshot;
pub use super::sync_attempt::Entity as SyncAttempt;
pub use super::sync_type::SyncType;
pub use super::twitch_clip::Entity as TwitchClip;
pub use super::twitch_game::Entity as TwitchGame;
pub use super::twitch_stream::Entity as TwitchStream;
pub use super::twitch_viewer_snapshot::Entity as TwitchViewerSnapshot;
