//! Raw payload schemas for the Twitch Helix API.

use serde::Deserialize;

/// Standard Helix envelope: a data array plus an optional cursor.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub data: Option<Vec<T>>,
    pub pagination: Option<Pagination>,
}

impl<T> Paginated<T> {
    pub fn cursor(&self) -> Option<&str> {
        self.pagination.as_ref().and_then(|p| p.cursor.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwitchGameRaw {
    pub id: String,
    pub name: String,
    pub box_art_url: Option<String>,
    pub igdb_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamRaw {
    pub id: String,
    pub user_id: String,
    pub user_login: String,
    pub user_name: String,
    pub game_name: Option<String>,
    pub title: Option<String>,
    pub viewer_count: Option<i64>,
    /// RFC 3339 start time.
    pub started_at: Option<String>,
    pub language: Option<String>,
    pub thumbnail_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_mature: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClipRaw {
    pub id: String,
    pub broadcaster_id: String,
    pub broadcaster_name: String,
    pub creator_id: Option<String>,
    pub creator_name: Option<String>,
    pub title: Option<String>,
    pub view_count: Option<i64>,
    pub created_at: Option<String>,
    pub duration: Option<f64>,
    pub thumbnail_url: Option<String>,
    pub embed_url: Option<String>,
    pub url: Option<String>,
    pub video_id: Option<String>,
    pub vod_offset: Option<i32>,
    pub language: Option<String>,
}

