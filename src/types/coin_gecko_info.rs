use std::collections::HashMap;

use serde::Deserialize;

/// Snapshot payload of `GET /coins/{id}`, reduced to the fields the
/// transform consumes. `id` stays optional so its absence surfaces as
/// a data-integrity failure instead of a decode error.
#[derive(Debug, Deserialize)]
pub struct CoinGeckoInfo {
    pub id: Option<String>,
    pub symbol: String,
    pub name: String,
    pub market_data: Option<CoinGeckoMarketInfo>,
}

/// Per-currency quote maps nested under `market_data`. Values may be
/// null for exotic quote currencies.
#[derive(Debug, Deserialize)]
pub struct CoinGeckoMarketInfo {
    #[serde(default)]
    pub current_price: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub market_cap: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub total_volume: HashMap<String, Option<f64>>,
}
