//! Mapping and aggregation for Twitch payloads.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::Set;

use crate::entity::{twitch_clip, twitch_game, twitch_stream};

use super::types::{ClipRaw, StreamRaw, TwitchGameRaw};

/// Streamers kept in the per-game top list.
const TOP_STREAMERS: usize = 20;

/// Aggregates computed from a game's captured stream set.
#[derive(Debug, Clone, Default)]
pub struct StreamAggregates {
    pub total_viewers: i64,
    pub total_channels: i32,
    pub language_breakdown: serde_json::Value,
    pub top_streamers: serde_json::Value,
    pub tags: serde_json::Value,
}

/// Aggregate viewer totals, per-language breakdowns, the top-streamer
/// list and the tag union from one game's streams.
pub fn aggregate_streams(streams: &[StreamRaw]) -> StreamAggregates {
    let total_viewers: i64 = streams.iter().filter_map(|s| s.viewer_count).sum();
    let total_channels = streams.len() as i32;

    // BTreeMap keeps the breakdown deterministic.
    let mut languages: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for stream in streams {
        let language = stream.language.clone().unwrap_or_else(|| "other".to_string());
        let entry = languages.entry(language).or_insert((0, 0));
        entry.0 += stream.viewer_count.unwrap_or(0);
        entry.1 += 1;
    }
    let language_breakdown = serde_json::Value::Object(
        languages
            .into_iter()
            .map(|(lang, (viewers, channels))| {
                (
                    lang,
                    serde_json::json!({"viewers": viewers, "channels": channels}),
                )
            })
            .collect(),
    );

    let mut by_viewers: Vec<&StreamRaw> = streams.iter().collect();
    by_viewers.sort_by_key(|s| std::cmp::Reverse(s.viewer_count.unwrap_or(0)));
    let top_streamers = serde_json::Value::Array(
        by_viewers
            .into_iter()
            .take(TOP_STREAMERS)
            .map(|s| {
                serde_json::json!({
                    "user_id": s.user_id,
                    "user_login": s.user_login,
                    "display_name": s.user_name,
                    "viewers": s.viewer_count.unwrap_or(0),
                    "title": s.title,
                    "language": s.language,
                    "started_at": s.started_at,
                })
            })
            .collect(),
    );

    let mut tag_union: Vec<String> = Vec::new();
    for stream in streams {
        for tag in stream.tags.iter().flatten() {
            if !tag_union.contains(tag) {
                tag_union.push(tag.clone());
            }
        }
    }
    let tags = serde_json::Value::Array(
        tag_union.into_iter().map(serde_json::Value::String).collect(),
    );

    StreamAggregates {
        total_viewers,
        total_channels,
        language_breakdown,
        top_streamers,
        tags,
    }
}

/// Map a game plus its stream aggregates to an active model.
///
/// The rolling statistics columns are left `NotSet` here; they are
/// recomputed from snapshots by the trailing pass.
pub fn game_to_model(raw: &TwitchGameRaw, agg: &StreamAggregates) -> twitch_game::ActiveModel {
    twitch_game::ActiveModel {
        id: Set(raw.id.clone()),
        name: Set(raw.name.clone()),
        box_art_url: Set(raw
            .box_art_url
            .as_ref()
            .map(|url| url.replace("{width}x{height}", "285x380"))),
        igdb_id: Set(raw.igdb_id.clone().filter(|v| !v.is_empty())),
        current_viewers: Set(agg.total_viewers),
        current_channels: Set(agg.total_channels),
        language_breakdown: Set(agg.language_breakdown.clone()),
        top_streamers: Set(agg.top_streamers.clone()),
        tags: Set(agg.tags.clone()),
        last_fetched: Set(Utc::now().fixed_offset()),
        ..Default::default()
    }
}

/// Map a raw stream to an active model.
pub fn stream_to_model(raw: StreamRaw, game_id: &str) -> twitch_stream::ActiveModel {
    twitch_stream::ActiveModel {
        id: Set(raw.id),
        game_id: Set(game_id.to_string()),
        game_name: Set(raw.game_name),
        user_id: Set(raw.user_id),
        user_login: Set(raw.user_login),
        user_display_name: Set(raw.user_name),
        title: Set(raw.title),
        viewer_count: Set(raw.viewer_count.unwrap_or(0)),
        started_at: Set(raw.started_at.as_deref().and_then(parse_rfc3339)),
        language: Set(raw.language),
        thumbnail_url: Set(raw.thumbnail_url),
        tags: Set(serde_json::json!(raw.tags.unwrap_or_default())),
        is_mature: Set(raw.is_mature.unwrap_or(false)),
        captured_at: Set(Utc::now().fixed_offset()),
    }
}

/// Map a raw clip to an active model.
pub fn clip_to_model(raw: ClipRaw, game_id: &str) -> twitch_clip::ActiveModel {
    twitch_clip::ActiveModel {
        id: Set(raw.id),
        game_id: Set(game_id.to_string()),
        broadcaster_id: Set(raw.broadcaster_id),
        broadcaster_name: Set(raw.broadcaster_name),
        creator_id: Set(raw.creator_id),
        creator_name: Set(raw.creator_name),
        title: Set(raw.title),
        view_count: Set(raw.view_count.unwrap_or(0)),
        created_at: Set(raw.created_at.as_deref().and_then(parse_rfc3339)),
        duration: Set(raw.duration),
        thumbnail_url: Set(raw.thumbnail_url),
        embed_url: Set(raw.embed_url),
        url: Set(raw.url),
        video_id: Set(raw.video_id.filter(|v| !v.is_empty())),
        vod_offset: Set(raw.vod_offset),
        language: Set(raw.language),
        captured_at: Set(Utc::now().fixed_offset()),
    }
}

fn parse_rfc3339(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}
