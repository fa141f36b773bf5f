//! Extract/transform/load cycle for the tracked assets.

use std::collections::HashMap;

use anyhow::Context;
use chrono::{DateTime, Utc};
use tokio::{time, time::Duration};
use tracing::{error, info};

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::{Cryptocurrency, HistoricalPrice},
    types::{CoinGeckoInfo, CoinGeckoMarketData},
};

/// Builds the snapshot row from a validated API payload. The
/// `last_updated` stamp is the transform-time clock, not the
/// provider's.
pub fn transform_asset(raw: CoinGeckoInfo) -> Result<Cryptocurrency, Error> {
    let coingecko_id = raw
        .id
        .ok_or_else(|| Error::FieldNotExist(String::from("id")))?;
    let market_data = raw
        .market_data
        .ok_or_else(|| Error::FieldNotExist(String::from("market_data")))?;

    let current_price = get_usd(
        &market_data.current_price,
        "market_data.current_price.usd",
    )?;
    let market_cap =
        get_usd(&market_data.market_cap, "market_data.market_cap.usd")?;
    let total_volume =
        get_usd(&market_data.total_volume, "market_data.total_volume.usd")?;

    Ok(Cryptocurrency {
        id: None,
        coingecko_id,
        symbol: raw.symbol.to_uppercase(),
        name: raw.name,
        current_price,
        market_cap,
        total_volume,
        last_updated: Utc::now(),
    })
}

fn get_usd(
    values: &HashMap<String, Option<f64>>,
    field: &str,
) -> Result<f64, Error> {
    values
        .get("usd")
        .copied()
        .flatten()
        .ok_or_else(|| Error::FieldNotExist(String::from(field)))
}

/// Zips the provider's parallel series positionally into history
/// rows; the series are assumed co-indexed.
pub fn transform_history(
    raw: CoinGeckoMarketData,
    crypto_id: i32,
    coingecko_id: &str,
) -> Result<Vec<HistoricalPrice>, Error> {
    let prices = raw
        .prices
        .ok_or_else(|| Error::FieldNotExist(String::from("prices")))?;
    if prices.is_empty() {
        return Err(Error::FieldNotExist(String::from("prices")));
    }
    let market_caps = raw
        .market_caps
        .ok_or_else(|| Error::FieldNotExist(String::from("market_caps")))?;
    let total_volumes = raw
        .total_volumes
        .ok_or_else(|| Error::FieldNotExist(String::from("total_volumes")))?;

    let mut records = Vec::with_capacity(prices.len());

    for ((price, market_cap), total_volume) in prices
        .iter()
        .zip(market_caps.iter())
        .zip(total_volumes.iter())
    {
        let date =
            DateTime::from_timestamp_millis(price.0).ok_or_else(|| {
                Error::DecodeDateTimeError(format!(
                    "timestamp {} out of range",
                    price.0
                ))
            })?;

        records.push(HistoricalPrice {
            id: None,
            crypto_id,
            coingecko_id: coingecko_id.to_owned(),
            date,
            close_price: price.1,
            total_volume: total_volume.1,
            market_cap: market_cap.1,
        });
    }

    Ok(records)
}

/// Extract, transform, and load one tracked asset.
pub async fn fetch_insert(
    app_state: &AppState<State>,
    coingecko_id: &str,
) -> Result<(), Error> {
    let snapshot = app_state.http.get_asset(coingecko_id).await?;
    let chart = app_state
        .http
        .get_market_chart(coingecko_id, app_state.config.history_days)
        .await?;

    let crypto = transform_asset(snapshot)?;
    let crypto_id = app_state
        .database
        .cryptocurrency
        .upsert(&crypto)
        .await
        .context(format!(
            "cryptocurrency upsert returned no id for {}",
            coingecko_id
        ))?;

    let records = transform_history(chart, crypto_id, &crypto.coingecko_id)?;
    app_state
        .database
        .historical_price
        .insert_many(&records)
        .await?;

    Ok(())
}

/// One sequential pass over the tracked assets. A failing asset is
/// logged and never aborts the batch; partially loaded assets stay
/// as-is.
pub async fn run_etl(app_state: &AppState<State>) {
    for coingecko_id in &app_state.config.tracked_assets {
        match fetch_insert(app_state, coingecko_id).await {
            Ok(()) => info!("ETL completed for {}", coingecko_id),
            Err(error) => {
                error!("ETL failed for {}: {}", coingecko_id, error)
            },
        }
    }

    info!("ETL cycle completed for all tracked assets");
}

/// Repeats `run_etl` at the configured interval.
pub async fn etl_task(app_state: AppState<State>) -> Result<(), Error> {
    let interval = app_state.config.etl_interval;
    let mut interval = time::interval(Duration::from_secs(interval));

    tokio::spawn(async move {
        interval.tick().await;
        loop {
            interval.tick().await;
            run_etl(&app_state).await;
        }
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MarketData;

    fn usd(value: f64) -> HashMap<String, Option<f64>> {
        HashMap::from([(String::from("usd"), Some(value))])
    }

    fn snapshot() -> CoinGeckoInfo {
        CoinGeckoInfo {
            id: Some(String::from("bitcoin")),
            symbol: String::from("btc"),
            name: String::from("Bitcoin"),
            market_data: Some(crate::types::CoinGeckoMarketInfo {
                current_price: usd(65000.0),
                market_cap: usd(1_200_000_000_000.0),
                total_volume: usd(30_000_000_000.0),
            }),
        }
    }

    #[test]
    fn test_transform_asset_uppercases_symbol() {
        let crypto = transform_asset(snapshot()).unwrap();

        assert_eq!(crypto.coingecko_id, "bitcoin");
        assert_eq!(crypto.symbol, "BTC");
        assert_eq!(crypto.name, "Bitcoin");
        assert_eq!(crypto.current_price, 65000.0);
        assert!(crypto.id.is_none());
    }

    #[test]
    fn test_transform_asset_names_missing_field() {
        let mut raw = snapshot();
        raw.market_data.as_mut().unwrap().current_price.clear();

        match transform_asset(raw) {
            Err(Error::FieldNotExist(field)) => {
                assert_eq!(field, "market_data.current_price.usd")
            },
            other => panic!("expected FieldNotExist, got {:?}", other),
        }
    }

    #[test]
    fn test_transform_asset_requires_market_data() {
        let mut raw = snapshot();
        raw.market_data = None;

        match transform_asset(raw) {
            Err(Error::FieldNotExist(field)) => {
                assert_eq!(field, "market_data")
            },
            other => panic!("expected FieldNotExist, got {:?}", other),
        }
    }

    #[test]
    fn test_transform_history_zips_positionally() {
        // 2024-10-14T00:00:00Z and the following day, in millis.
        let day_1 = 1_728_864_000_000;
        let day_2 = 1_728_950_400_000;

        let raw = CoinGeckoMarketData {
            prices: Some(vec![
                MarketData(day_1, 100.0),
                MarketData(day_2, 110.0),
            ]),
            market_caps: Some(vec![
                MarketData(day_1, 1000.0),
                MarketData(day_2, 1100.0),
            ]),
            total_volumes: Some(vec![
                MarketData(day_1, 50.0),
                MarketData(day_2, 55.0),
            ]),
        };

        let records = transform_history(raw, 7, "bitcoin").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].crypto_id, 7);
        assert_eq!(records[0].coingecko_id, "bitcoin");
        assert_eq!(records[0].close_price, 100.0);
        assert_eq!(records[0].market_cap, 1000.0);
        assert_eq!(records[0].total_volume, 50.0);
        assert_eq!(
            records[0].date.to_rfc3339(),
            "2024-10-14T00:00:00+00:00"
        );
        assert_eq!(records[1].close_price, 110.0);
    }

    #[test]
    fn test_transform_history_truncates_to_shortest_series() {
        let raw = CoinGeckoMarketData {
            prices: Some(vec![
                MarketData(0, 100.0),
                MarketData(86_400_000, 110.0),
            ]),
            market_caps: Some(vec![MarketData(0, 1000.0)]),
            total_volumes: Some(vec![
                MarketData(0, 50.0),
                MarketData(86_400_000, 55.0),
            ]),
        };

        let records = transform_history(raw, 1, "bitcoin").unwrap();

        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_transform_history_rejects_missing_or_empty_prices() {
        let missing = CoinGeckoMarketData {
            prices: None,
            market_caps: Some(vec![]),
            total_volumes: Some(vec![]),
        };
        assert!(matches!(
            transform_history(missing, 1, "bitcoin"),
            Err(Error::FieldNotExist(_))
        ));

        let empty = CoinGeckoMarketData {
            prices: Some(vec![]),
            market_caps: Some(vec![]),
            total_volumes: Some(vec![]),
        };
        assert!(matches!(
            transform_history(empty, 1, "bitcoin"),
            Err(Error::FieldNotExist(_))
        ));
    }

    #[test]
    fn test_market_chart_wire_shape() {
        let json = r#"
        {
            "prices": [[1728864000000, 65000.5], [1728950400000, 66000.0]],
            "market_caps": [[1728864000000, 1.2e12], [1728950400000, 1.25e12]],
            "total_volumes": [[1728864000000, 3.0e10], [1728950400000, 2.8e10]]
        }
        "#;

        let parsed: CoinGeckoMarketData = serde_json::from_str(json).unwrap();
        let prices = parsed.prices.as_ref().unwrap();

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].0, 1_728_864_000_000);
        assert_eq!(prices[0].1, 65000.5);
    }

    #[test]
    fn test_snapshot_wire_shape_tolerates_missing_fields() {
        let json = r#"
        {
            "symbol": "btc",
            "name": "Bitcoin"
        }
        "#;

        let parsed: CoinGeckoInfo = serde_json::from_str(json).unwrap();

        assert!(parsed.id.is_none());
        assert!(parsed.market_data.is_none());
    }
}
