//! Mapping from CheapShark payloads to the normalized record shapes.
//!
//! Deals follow the Prisma-style merge policy the rest of the store uses:
//! fields absent from the payload are left `NotSet` so a partial shape
//! (a deal embedded in game detail) never clears columns a fuller shape
//! (the deals listing) already stored.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, Set};

use crate::entity::{shark_deal, shark_game, shark_store};

use super::types::{DealRaw, GameDetailRaw, StoreRaw};

/// Decode CheapShark's saleness flag.
///
/// `"1"`, `1` and `true` mean on sale; `"0"`, `0`, `false`, absent and
/// anything unexpected mean not on sale.
pub fn parse_flag(value: Option<&serde_json::Value>) -> bool {
    match value {
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::Number(n)) => n.as_i64() == Some(1),
        Some(serde_json::Value::String(s)) => s == "1",
        _ => false,
    }
}

/// Savings percentage: round((normal - sale) / normal * 100), 0 when the
/// normal price is missing or zero.
pub fn calculate_savings(sale_price: Option<f64>, normal_price: Option<f64>) -> f64 {
    match normal_price {
        Some(normal) if normal != 0.0 => {
            let sale = sale_price.unwrap_or(0.0);
            (((normal - sale) / normal) * 100.0).round()
        }
        _ => 0.0,
    }
}

/// The natural key for a deal.
///
/// Listing deals carry a `dealID`. Deals embedded in game detail do not,
/// so those fall back to `storeID_gameID_price`; two distinct deals with
/// the same store, game and price would collide, matching the upstream
/// data model.
pub fn deal_key(deal: &DealRaw, fallback_game_id: Option<&str>) -> Option<String> {
    if let Some(id) = &deal.deal_id {
        return Some(id.clone());
    }

    let store_id = deal.store_id.as_deref()?;
    let game_id = deal.game_id.as_deref().or(fallback_game_id)?;
    let price = deal.sale_price.or(deal.price).unwrap_or(0.0);
    Some(format!("{store_id}_{game_id}_{price}"))
}

fn preserve_if_absent<T>(value: Option<T>) -> ActiveValue<Option<T>>
where
    Option<T>: Into<sea_orm::Value>,
{
    match value {
        Some(v) => Set(Some(v)),
        None => ActiveValue::NotSet,
    }
}

fn unix_datetime(secs: i64) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    DateTime::from_timestamp(secs, 0).map(|d| d.fixed_offset())
}

/// Map a raw deal to an active model.
///
/// Returns `None` when no natural key can be derived (no deal id and no
/// store/game to build the fallback from).
pub fn deal_to_model(
    deal: DealRaw,
    fallback_game_id: Option<&str>,
    fallback_title: Option<&str>,
) -> Option<shark_deal::ActiveModel> {
    let key = deal_key(&deal, fallback_game_id)?;

    let sale_price = deal.sale_price.or(deal.price).unwrap_or(0.0);
    let normal_price = deal.normal_price.or(deal.retail_price).unwrap_or(0.0);
    let savings = deal
        .savings
        .unwrap_or_else(|| calculate_savings(Some(sale_price), Some(normal_price)));

    Some(shark_deal::ActiveModel {
        deal_id: Set(key),
        game_id: Set(deal
            .game_id
            .or_else(|| fallback_game_id.map(str::to_string))
            .unwrap_or_else(|| "unknown".to_string())),
        title: Set(deal
            .title
            .or_else(|| fallback_title.map(str::to_string))
            .unwrap_or_else(|| "Unknown".to_string())),
        store_id: Set(deal.store_id.unwrap_or_default()),
        store_name: preserve_if_absent(deal.store_name),
        sale_price: Set(sale_price),
        normal_price: Set(normal_price),
        savings: Set(savings),
        metacritic_score: preserve_if_absent(deal.metacritic_score),
        metacritic_link: preserve_if_absent(deal.metacritic_link),
        steam_rating_text: preserve_if_absent(deal.steam_rating_text),
        steam_rating_percent: preserve_if_absent(deal.steam_rating_percent),
        steam_rating_count: preserve_if_absent(deal.steam_rating_count),
        steam_app_id: preserve_if_absent(deal.steam_app_id),
        release_date: preserve_if_absent(deal.release_date.and_then(unix_datetime)),
        last_change: preserve_if_absent(deal.last_change.and_then(unix_datetime)),
        deal_rating: preserve_if_absent(deal.deal_rating),
        thumb: preserve_if_absent(deal.thumb),
        is_on_sale: Set(parse_flag(deal.is_on_sale.as_ref())),
        last_fetched: Set(Utc::now().fixed_offset()),
    })
}

/// Map a raw storefront to an active model.
pub fn store_to_model(store: StoreRaw) -> shark_store::ActiveModel {
    let images = store.images;
    shark_store::ActiveModel {
        store_id: Set(store.store_id),
        store_name: Set(store.store_name),
        is_active: Set(parse_flag(store.is_active.as_ref())),
        banner: Set(images.as_ref().and_then(|i| i.banner.clone())),
        logo: Set(images.as_ref().and_then(|i| i.logo.clone())),
        icon: Set(images.and_then(|i| i.icon)),
        last_fetched: Set(Utc::now().fixed_offset()),
    }
}

/// Map per-game detail to an active model.
pub fn game_detail_to_model(game_id: &str, detail: &GameDetailRaw) -> shark_game::ActiveModel {
    let cheapest = detail.cheapest_price_ever.as_ref();
    let store_ids: Vec<serde_json::Value> = {
        let mut seen = Vec::new();
        for deal in detail.deals.iter().flatten() {
            if let Some(store_id) = &deal.store_id {
                if !seen.contains(store_id) {
                    seen.push(store_id.clone());
                }
            }
        }
        seen.into_iter().map(serde_json::Value::String).collect()
    };

    shark_game::ActiveModel {
        game_id: Set(game_id.to_string()),
        title: Set(detail
            .info
            .as_ref()
            .and_then(|i| i.title.clone())
            .unwrap_or_else(|| "Unknown".to_string())),
        steam_app_id: Set(detail.info.as_ref().and_then(|i| i.steam_app_id.clone())),
        thumb: Set(detail.info.as_ref().and_then(|i| i.thumb.clone())),
        cheapest: Set(cheapest.and_then(|c| c.price)),
        cheapest_deal_id: Set(cheapest.and_then(|c| c.deal_id.clone())),
        historical_low: Set(cheapest.and_then(|c| c.price)),
        historical_low_date: Set(cheapest.and_then(|c| c.date).and_then(unix_datetime)),
        store_ids: Set(serde_json::Value::Array(store_ids)),
        last_fetched: Set(Utc::now().fixed_offset()),
    }
}
