//! Source enum for type-safe handling of the five external APIs.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The external data sources ludex aggregates.
///
/// Each source is stored in its own namespace; records are never merged
/// across sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Source {
    /// RAWG video game database.
    #[sea_orm(string_value = "rawg")]
    Rawg,
    /// IGDB (Internet Game Database, via the Twitch API program).
    #[sea_orm(string_value = "igdb")]
    Igdb,
    /// CheapShark price/deal aggregator.
    #[sea_orm(string_value = "cheapshark")]
    CheapShark,
    /// Steam store and player statistics.
    #[sea_orm(string_value = "steam")]
    Steam,
    /// Twitch viewership (games, streams, clips).
    #[sea_orm(string_value = "twitch")]
    Twitch,
}

impl Source {
    /// All sources, in sync order.
    pub const ALL: [Source; 5] = [
        Source::Rawg,
        Source::Igdb,
        Source::CheapShark,
        Source::Steam,
        Source::Twitch,
    ];
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Rawg => write!(f, "rawg"),
            Source::Igdb => write!(f, "igdb"),
            Source::CheapShark => write!(f, "cheapshark"),
            Source::Steam => write!(f, "steam"),
            Source::Twitch => write!(f, "twitch"),
        }
    }
}

impl std::str::FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rawg" => Ok(Source::Rawg),
            "igdb" => Ok(Source::Igdb),
            "cheapshark" | "shark" => Ok(Source::CheapShark),
            "steam" => Ok(Source::Steam),
            "twitch" => Ok(Source::Twitch),
            _ => Err(format!("Unknown source: {}", s)),
        }
    }
}
