use serde::Deserialize;

/// Parallel daily series returned by `GET /coins/{id}/market_chart`.
/// The three series are co-indexed by the provider.
#[derive(Debug, Deserialize)]
pub struct CoinGeckoMarketData {
    pub prices: Option<Vec<MarketData>>,
    pub market_caps: Option<Vec<MarketData>>,
    pub total_volumes: Option<Vec<MarketData>>,
}

/// One `[epochMillis, value]` pair.
#[derive(Deserialize, Debug)]
pub struct MarketData(pub i64, pub f64);
