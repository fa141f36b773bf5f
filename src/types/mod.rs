pub use self::{
    coin_gecko_info::{CoinGeckoInfo, CoinGeckoMarketInfo},
    coin_gecko_market_data::{CoinGeckoMarketData, MarketData},
};

mod coin_gecko_info;
mod coin_gecko_market_data;
