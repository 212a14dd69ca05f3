//! Sync pass kinds.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The kind of sync pass an attempt ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum SyncType {
    /// Long-running full backfill, resumed across sessions via the cursor.
    #[sea_orm(string_value = "historical")]
    Historical,
    /// Window-bounded catch-up (new releases / recent deals).
    #[sea_orm(string_value = "incremental")]
    Incremental,
    /// Fixed query profiles for frequent low-latency refresh.
    #[sea_orm(string_value = "hot_update")]
    HotUpdate,
}

impl std::fmt::Display for SyncType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncType::Historical => write!(f, "historical"),
            SyncType::Incremental => write!(f, "incremental"),
            SyncType::HotUpdate => write!(f, "hot_update"),
        }
    }
}

impl std::str::FromStr for SyncType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "historical" | "full" => Ok(SyncType::Historical),
            "incremental" | "new" => Ok(SyncType::Incremental),
            "hot_update" | "hot" | "update" => Ok(SyncType::HotUpdate),
            _ => Err(format!("Unknown sync type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("full".parse::<SyncType>().unwrap(), SyncType::Historical);
        assert_eq!("hot".parse::<SyncType>().unwrap(), SyncType::HotUpdate);
        assert_eq!("new".parse::<SyncType>().unwrap(), SyncType::Incremental);
    }
}
