use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::time;
use tracing::{info, warn};

use crate::{
    configuration::Config,
    error::Error,
    types::{CoinGeckoInfo, CoinGeckoMarketData},
};

/// Delay before the first retry; doubled after each failed attempt.
const RETRY_BASE_DELAY: Duration = Duration::from_secs(5);
/// Backoff ceiling.
const RETRY_MAX_DELAY: Duration = Duration::from_secs(60);
/// Transport failures are retried this many times before the error
/// propagates to the per-asset handler.
const RETRY_MAX_ATTEMPTS: u32 = 5;

/// Outbound client for the CoinGecko market-data API.
#[derive(Debug)]
pub struct HTTP {
    pub config: Config,
    client: Client,
}

impl HTTP {
    pub fn new(config: Config) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(HTTP { config, client })
    }

    /// Current market snapshot for one asset. A 2xx response without
    /// an `id` is a malformed success and is not retried.
    pub async fn get_asset(
        &self,
        coingecko_id: &str,
    ) -> Result<CoinGeckoInfo, Error> {
        let url = self.config.get_coingecko_info_url(coingecko_id);
        info!("{}", &url);
        let json = self.fetch_json::<CoinGeckoInfo>(&url).await?;

        if json.id.is_none() {
            return Err(Error::FieldNotExist(format!(
                "id in response for {}",
                coingecko_id
            )));
        }

        Ok(json)
    }

    /// Daily price/cap/volume series over the lookback window.
    pub async fn get_market_chart(
        &self,
        coingecko_id: &str,
        days: u16,
    ) -> Result<CoinGeckoMarketData, Error> {
        let url = self
            .config
            .get_coingecko_market_chart_url(coingecko_id, days);
        let json = self.fetch_json::<CoinGeckoMarketData>(&url).await?;

        if json.prices.is_none() {
            return Err(Error::FieldNotExist(format!(
                "prices in market chart for {}",
                coingecko_id
            )));
        }

        Ok(json)
    }

    async fn fetch_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let mut attempt = 0;
        let mut delay = RETRY_BASE_DELAY;

        loop {
            match self.try_fetch_json::<T>(url).await {
                Ok(value) => return Ok(value),
                Err(error)
                    if is_transient(&error)
                        && attempt < RETRY_MAX_ATTEMPTS =>
                {
                    attempt += 1;
                    warn!(
                        "request to {} failed (attempt {}/{}), retrying in {:?}: {}",
                        url, attempt, RETRY_MAX_ATTEMPTS, delay, error
                    );
                    time::sleep(delay).await;
                    delay = (delay * 2).min(RETRY_MAX_DELAY);
                },
                Err(error) => return Err(error.into()),
            }
        }
    }

    async fn try_fetch_json<T>(&self, url: &str) -> Result<T, reqwest::Error>
    where
        T: DeserializeOwned,
    {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }
}

/// Decode failures are malformed successes; everything else (connect,
/// timeout, non-2xx status, body read) is transport-level.
fn is_transient(error: &reqwest::Error) -> bool {
    !error.is_decode()
}
