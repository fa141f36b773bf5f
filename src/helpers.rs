//! Shared date handling and the numeric kernels behind the analysis
//! use cases.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::{error::Error, model::HistoricalPrice};

/// Parses a `YYYY-MM-DD` query parameter.
pub fn parse_date(value: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|error| Error::DecodeDateTimeError(format!("{}: {}", value, error)))
}

/// Inclusive UTC bounds of a calendar day: 00:00:00 to 23:59:59.
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    let end = start + Duration::seconds(86_399);
    (start, end)
}

/// Collapses a series to one entry per calendar day, keeping the
/// first-seen entry and preserving the input order.
pub fn dedup_by_day(points: Vec<HistoricalPrice>) -> Vec<HistoricalPrice> {
    let mut seen: HashSet<NaiveDate> = HashSet::new();

    points
        .into_iter()
        .filter(|point| seen.insert(point.date.date_naive()))
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by N).
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let avg = mean(values);
    let variance = values
        .iter()
        .map(|value| (value - avg).powi(2))
        .sum::<f64>()
        / values.len() as f64;

    variance.sqrt()
}

/// Pearson correlation coefficient. `None` when the series lengths
/// differ, fewer than two points are given, or either side has zero
/// variance (the coefficient is undefined there).
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let mean_x = mean(xs);
    let mean_y = mean(ys);

    let mut covariance = 0.0;
    let mut variance_x = 0.0;
    let mut variance_y = 0.0;

    for (x, y) in xs.iter().zip(ys.iter()) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    let denominator = (variance_x * variance_y).sqrt();
    if denominator == 0.0 {
        return None;
    }

    Some(covariance / denominator)
}

/// Change from `initial` to `current`, in percent of `initial`.
pub fn percentage_change(initial: f64, current: f64) -> f64 {
    (current - initial) / initial * 100.0
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn point(day: DateTime<Utc>, close_price: f64) -> HistoricalPrice {
        HistoricalPrice {
            id: None,
            crypto_id: 1,
            coingecko_id: String::from("bitcoin"),
            date: day,
            close_price,
            total_volume: 0.0,
            market_cap: 0.0,
        }
    }

    #[test]
    fn test_percentage_change_matches_roi_formula() {
        assert_eq!(percentage_change(100.0, 150.0), 50.0);
        assert_eq!(percentage_change(100.0, 100.0), 0.0);
        assert_eq!(percentage_change(100.0, 120.0), 20.0);
        assert_eq!(percentage_change(200.0, 100.0), -50.0);
    }

    #[test]
    fn test_population_std_dev_constant_series_is_zero() {
        assert_eq!(population_std_dev(&[100.0, 100.0, 100.0]), 0.0);
    }

    #[test]
    fn test_population_std_dev_divides_by_n() {
        // Variance of [2, 4, 4, 4, 5, 5, 7, 9] over N is 4.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std_dev(&values) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_identical_series() {
        let series = [100.0, 110.0, 105.0, 120.0];
        let correlation = pearson(&series, &series).unwrap();
        assert!((correlation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_inverse_series() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [4.0, 3.0, 2.0, 1.0];
        let correlation = pearson(&xs, &ys).unwrap();
        assert!((correlation + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_needs_two_points_and_variance() {
        assert!(pearson(&[1.0], &[2.0]).is_none());
        assert!(pearson(&[1.0, 2.0], &[5.0, 5.0]).is_none());
        assert!(pearson(&[1.0, 2.0, 3.0], &[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_dedup_by_day_keeps_first_seen() {
        let morning = Utc.with_ymd_and_hms(2024, 10, 14, 8, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 10, 14, 20, 0, 0).unwrap();
        let next_day = Utc.with_ymd_and_hms(2024, 10, 15, 0, 0, 0).unwrap();

        let deduped = dedup_by_day(vec![
            point(morning, 100.0),
            point(evening, 101.0),
            point(next_day, 102.0),
        ]);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].close_price, 100.0);
        assert_eq!(deduped[1].close_price, 102.0);
    }

    #[test]
    fn test_parse_date() {
        let day = parse_date("2024-10-14").unwrap();
        assert_eq!(day, NaiveDate::from_ymd_opt(2024, 10, 14).unwrap());
        assert!(parse_date("14/10/2024").is_err());
    }

    #[test]
    fn test_day_bounds_cover_whole_day() {
        let day = NaiveDate::from_ymd_opt(2024, 10, 14).unwrap();
        let (start, end) = day_bounds(day);

        assert_eq!(start, Utc.with_ymd_and_hms(2024, 10, 14, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 10, 14, 23, 59, 59).unwrap());
    }
}
