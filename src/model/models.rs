//! Database entity structs for the two persisted tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row in `cryptocurrencies`; refreshed on every ETL cycle, keyed on
/// `coingecko_id`. The store assigns `id` on first insert.
#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct Cryptocurrency {
    pub id: Option<i32>,
    pub coingecko_id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: f64,
    pub market_cap: f64,
    pub total_volume: f64,
    pub last_updated: DateTime<Utc>,
}

/// Row in `historical_prices`; one point per asset per calendar day,
/// immutable once written.
#[derive(Debug, Clone, FromRow, Deserialize, Serialize)]
pub struct HistoricalPrice {
    pub id: Option<i64>,
    pub crypto_id: i32,
    pub coingecko_id: String,
    pub date: DateTime<Utc>,
    pub close_price: f64,
    pub total_volume: f64,
    pub market_cap: f64,
}

/// Asset/day entry with the top trailing-24h trading volume.
#[derive(Debug, FromRow, Deserialize, Serialize)]
pub struct HighestVolume {
    pub crypto_id: i32,
    pub coingecko_id: String,
    pub total_volume: f64,
}
