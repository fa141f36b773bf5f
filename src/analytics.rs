//! Read-only analysis use cases composed from gateway reads plus
//! arithmetic. Every function queries the store directly; nothing is
//! cached in-process.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    error::Error,
    helpers::{pearson, percentage_change, population_std_dev},
    model::{Cryptocurrency, HistoricalPrice},
    provider::DatabasePool,
};

#[derive(Debug, Serialize)]
pub struct Roi {
    pub crypto_id: i32,
    pub roi: f64,
    pub initial_price: f64,
    pub final_price: f64,
}

/// Return on investment between two calendar days, in percent.
pub async fn calculate_roi(
    database: &DatabasePool,
    crypto_id: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Roi, Error> {
    let initial_price = database
        .historical_price
        .get_price_on_date(crypto_id, start_date)
        .await
        .ok_or_else(|| {
            Error::InsufficientData(format!(
                "no price found for the start date {}",
                start_date
            ))
        })?;

    let final_price = database
        .historical_price
        .get_price_on_date(crypto_id, end_date)
        .await
        .ok_or_else(|| {
            Error::InsufficientData(format!(
                "no price found for the end date {}",
                end_date
            ))
        })?;

    Ok(Roi {
        crypto_id,
        roi: percentage_change(initial_price, final_price),
        initial_price,
        final_price,
    })
}

#[derive(Debug, Serialize)]
pub struct Correlation {
    pub crypto_id_1: i32,
    pub crypto_id_2: i32,
    pub days: i64,
    pub correlation: f64,
}

/// Pearson correlation of two assets' close prices over the trailing
/// `days` window, aligned by shared calendar dates.
pub async fn calculate_correlation(
    database: &DatabasePool,
    crypto_id_1: i32,
    crypto_id_2: i32,
    days: i64,
) -> Result<Correlation, Error> {
    let end_date = Utc::now();
    let start_date = end_date - Duration::days(days);

    let series_1 = database
        .historical_price
        .get_by_crypto_id(crypto_id_1, Some(start_date), Some(end_date))
        .await;
    let series_2 = database
        .historical_price
        .get_by_crypto_id(crypto_id_2, Some(start_date), Some(end_date))
        .await;

    if series_1.is_empty() || series_2.is_empty() {
        return Err(Error::InsufficientData(String::from(
            "insufficient data to calculate correlation",
        )));
    }

    let (prices_1, prices_2) = align_by_day(&series_1, &series_2);
    if prices_1.len() < 2 {
        return Err(Error::InsufficientData(String::from(
            "not enough common dates to calculate correlation",
        )));
    }

    let correlation = pearson(&prices_1, &prices_2).ok_or_else(|| {
        Error::InsufficientData(String::from(
            "correlation is undefined for constant price series",
        ))
    })?;

    Ok(Correlation {
        crypto_id_1,
        crypto_id_2,
        days,
        correlation,
    })
}

/// Close prices of both series on their shared calendar days,
/// ascending by date.
fn align_by_day(
    a: &[HistoricalPrice],
    b: &[HistoricalPrice],
) -> (Vec<f64>, Vec<f64>) {
    let by_day_a: BTreeMap<NaiveDate, f64> = a
        .iter()
        .map(|point| (point.date.date_naive(), point.close_price))
        .collect();
    let by_day_b: BTreeMap<NaiveDate, f64> = b
        .iter()
        .map(|point| (point.date.date_naive(), point.close_price))
        .collect();

    by_day_a
        .into_iter()
        .filter_map(|(day, price)| {
            by_day_b.get(&day).map(|other| (price, *other))
        })
        .unzip()
}

#[derive(Debug, Serialize)]
pub struct Volatility {
    pub crypto_id: i32,
    pub coingecko_id: String,
    pub volatility: f64,
}

/// Population standard deviation of each asset's full close-price
/// history. Assets with fewer than two points are skipped.
pub async fn calculate_volatility(
    database: &DatabasePool,
) -> Result<Vec<Volatility>, Error> {
    let cryptocurrencies = database.cryptocurrency.get_all().await;
    if cryptocurrencies.is_empty() {
        return Err(Error::InsufficientData(String::from(
            "no tracked cryptocurrencies found",
        )));
    }

    let mut results = Vec::new();

    for crypto in cryptocurrencies {
        let crypto_id = match crypto.id {
            Some(id) => id,
            None => continue,
        };

        let history = database
            .historical_price
            .get_by_crypto_id(crypto_id, None, None)
            .await;
        let close_prices: Vec<f64> =
            history.iter().map(|point| point.close_price).collect();

        if close_prices.len() > 1 {
            results.push(Volatility {
                crypto_id,
                coingecko_id: crypto.coingecko_id,
                volatility: population_std_dev(&close_prices),
            });
        }
    }

    Ok(results)
}

#[derive(Debug, Serialize)]
pub struct MarketDominance {
    pub crypto_id: i32,
    pub coingecko_id: String,
    pub dominance: f64,
}

/// Each asset's market cap as a share of the tracked total. Assets
/// with a zero cap are excluded from both sides of the ratio.
pub async fn calculate_market_dominance(
    database: &DatabasePool,
) -> Result<Vec<MarketDominance>, Error> {
    let cryptocurrencies = database.cryptocurrency.get_all().await;
    if cryptocurrencies.is_empty() {
        return Err(Error::InsufficientData(String::from(
            "no cryptocurrencies found in the database",
        )));
    }

    Ok(dominance_shares(cryptocurrencies))
}

/// Shares of the summed market cap, in percent. Zero-cap assets
/// contribute to neither the numerator nor the denominator.
fn dominance_shares(
    cryptocurrencies: Vec<Cryptocurrency>,
) -> Vec<MarketDominance> {
    let total_market_cap: f64 = cryptocurrencies
        .iter()
        .filter(|crypto| crypto.market_cap > 0.0)
        .map(|crypto| crypto.market_cap)
        .sum();

    let mut results = Vec::new();

    for crypto in cryptocurrencies {
        if crypto.market_cap > 0.0 && total_market_cap > 0.0 {
            if let Some(crypto_id) = crypto.id {
                results.push(MarketDominance {
                    crypto_id,
                    coingecko_id: crypto.coingecko_id,
                    // Multiply first: keeps round shares exact in f64.
                    dominance: crypto.market_cap * 100.0 / total_market_cap,
                });
            }
        }
    }

    results
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Upward,
    Downward,
    Stable,
}

impl Trend {
    /// Strict comparison of the current price against the reference;
    /// equality is stable.
    pub fn classify(current: f64, previous: f64) -> Trend {
        if current > previous {
            Trend::Upward
        } else if current < previous {
            Trend::Downward
        } else {
            Trend::Stable
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PriceTrend {
    pub crypto_id: i32,
    pub period: i64,
    pub current_price: f64,
    pub price_days_ago: f64,
    pub trend: Trend,
    pub percentage_change: f64,
}

/// Compares the most recent calendar day's close against the price
/// `period` days before now.
pub async fn price_trend(
    database: &DatabasePool,
    crypto_id: i32,
    period: i64,
) -> Result<PriceTrend, Error> {
    let history = database
        .historical_price
        .get_by_crypto_id(crypto_id, None, None)
        .await;
    if history.is_empty() {
        return Err(Error::InsufficientData(format!(
            "no historical prices found for the cryptocurrency with id {}",
            crypto_id
        )));
    }

    // History is ordered newest first; the head is the latest day.
    let current_price = history[0].close_price;

    let reference_day = (Utc::now() - Duration::days(period)).date_naive();
    let price_days_ago = database
        .historical_price
        .get_price_on_date(crypto_id, reference_day)
        .await
        .ok_or_else(|| {
            Error::InsufficientData(format!(
                "no price found for {} days ago",
                period
            ))
        })?;

    Ok(PriceTrend {
        crypto_id,
        period,
        current_price,
        price_days_ago,
        trend: Trend::classify(current_price, price_days_ago),
        percentage_change: percentage_change(price_days_ago, current_price),
    })
}

#[derive(Debug, Serialize)]
pub struct Performance {
    pub crypto_id: i32,
    pub current_price: f64,
    pub price_days_ago: f64,
    pub percentage_change: f64,
}

#[derive(Debug, Serialize)]
pub struct PerformanceComparison {
    pub period: i64,
    pub performance: Vec<Performance>,
}

/// Periods shorter than one day cannot be compared.
pub fn validate_period(period: i64) -> Result<(), Error> {
    if period < 1 {
        return Err(Error::InvalidOption {
            option: format!(
                "period must be a positive integer greater than or equal to 1, got {}",
                period
            ),
        });
    }

    Ok(())
}

/// Percentage change of every requested asset over `period` days.
/// Assets lacking history or a reference price are skipped.
pub async fn compare_performance(
    database: &DatabasePool,
    crypto_ids: &[i32],
    period: i64,
) -> Result<PerformanceComparison, Error> {
    validate_period(period)?;

    let reference_day = (Utc::now() - Duration::days(period)).date_naive();
    let mut performance = Vec::new();

    for &crypto_id in crypto_ids {
        let history = database
            .historical_price
            .get_by_crypto_id(crypto_id, None, None)
            .await;
        if history.is_empty() {
            continue;
        }
        let current_price = history[0].close_price;

        let price_days_ago = match database
            .historical_price
            .get_price_on_date(crypto_id, reference_day)
            .await
        {
            Some(price) => price,
            None => continue,
        };

        performance.push(Performance {
            crypto_id,
            current_price,
            price_days_ago,
            percentage_change: percentage_change(
                price_days_ago,
                current_price,
            ),
        });
    }

    Ok(PerformanceComparison {
        period,
        performance,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn point(
        crypto_id: i32,
        day: (i32, u32, u32),
        close_price: f64,
    ) -> HistoricalPrice {
        HistoricalPrice {
            id: None,
            crypto_id,
            coingecko_id: String::from("bitcoin"),
            date: Utc.with_ymd_and_hms(day.0, day.1, day.2, 0, 0, 0).unwrap(),
            close_price,
            total_volume: 0.0,
            market_cap: 0.0,
        }
    }

    #[test]
    fn test_classify_trend() {
        assert_eq!(Trend::classify(120.0, 100.0), Trend::Upward);
        assert_eq!(Trend::classify(80.0, 100.0), Trend::Downward);
        assert_eq!(Trend::classify(100.0, 100.0), Trend::Stable);
    }

    #[test]
    fn test_trend_percentage_change() {
        assert_eq!(percentage_change(100.0, 120.0), 20.0);
        assert_eq!(percentage_change(100.0, 100.0), 0.0);
    }

    #[test]
    fn test_validate_period_rejects_zero() {
        assert!(validate_period(0).is_err());
        assert!(validate_period(-3).is_err());
        assert!(validate_period(1).is_ok());
        assert!(validate_period(7).is_ok());
    }

    #[test]
    fn test_align_by_day_intersects_and_sorts_ascending() {
        // Series arrive newest first, as the gateway returns them.
        let series_1 = vec![
            point(1, (2024, 10, 16), 103.0),
            point(1, (2024, 10, 15), 102.0),
            point(1, (2024, 10, 14), 101.0),
        ];
        let series_2 = vec![
            point(2, (2024, 10, 15), 202.0),
            point(2, (2024, 10, 14), 201.0),
            point(2, (2024, 10, 13), 200.0),
        ];

        let (prices_1, prices_2) = align_by_day(&series_1, &series_2);

        assert_eq!(prices_1, vec![101.0, 102.0]);
        assert_eq!(prices_2, vec![201.0, 202.0]);
    }

    #[test]
    fn test_align_by_day_no_overlap() {
        let series_1 = vec![point(1, (2024, 10, 14), 101.0)];
        let series_2 = vec![point(2, (2024, 10, 15), 202.0)];

        let (prices_1, prices_2) = align_by_day(&series_1, &series_2);

        assert!(prices_1.is_empty());
        assert!(prices_2.is_empty());
    }

    fn crypto(id: i32, coingecko_id: &str, market_cap: f64) -> Cryptocurrency {
        Cryptocurrency {
            id: Some(id),
            coingecko_id: String::from(coingecko_id),
            symbol: String::from("TKN"),
            name: String::from(coingecko_id),
            current_price: 0.0,
            market_cap,
            total_volume: 0.0,
            last_updated: Utc.with_ymd_and_hms(2024, 10, 14, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_dominance_shares() {
        let shares = dominance_shares(vec![
            crypto(1, "bitcoin", 300.0),
            crypto(2, "ethereum", 700.0),
        ]);

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].dominance, 30.0);
        assert_eq!(shares[1].dominance, 70.0);
        assert_eq!(
            shares.iter().map(|entry| entry.dominance).sum::<f64>(),
            100.0
        );
    }

    #[test]
    fn test_dominance_excludes_zero_caps() {
        let shares = dominance_shares(vec![
            crypto(1, "bitcoin", 300.0),
            crypto(2, "usd-coin", 0.0),
            crypto(3, "ethereum", 700.0),
        ]);

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].dominance, 30.0);
        assert_eq!(shares[1].dominance, 70.0);
    }
}
