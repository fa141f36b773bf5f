use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::{error::Error, QueryBuilder};
use tracing::warn;

use super::DataBase;
use crate::{
    helpers::{day_bounds, dedup_by_day},
    model::{HighestVolume, HistoricalPrice, Table},
};

impl Table<HistoricalPrice> {
    /// History for one asset, newest first, at most one point per
    /// calendar day. Bounds are inclusive when given. Store failures
    /// degrade to an empty list.
    pub async fn get_by_crypto_id(
        &self,
        crypto_id: i32,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Vec<HistoricalPrice> {
        let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
            r#"
            SELECT "id", "crypto_id", "coingecko_id", "date", "close_price", "total_volume", "market_cap"
            FROM "historical_prices"
            WHERE "crypto_id" = "#,
        );
        query_builder.push_bind(crypto_id);

        if let Some(start) = start_date {
            query_builder.push(r#" AND "date" >= "#);
            query_builder.push_bind(start);
        }
        if let Some(end) = end_date {
            query_builder.push(r#" AND "date" <= "#);
            query_builder.push_bind(end);
        }
        query_builder.push(r#" ORDER BY "date" DESC"#);

        let result = query_builder
            .build_query_as::<HistoricalPrice>()
            .fetch_all(&self.pool)
            .await;

        match result {
            Ok(items) => dedup_by_day(items),
            Err(error) => {
                warn!(
                    "could not fetch history for crypto {}: {}",
                    crypto_id, error
                );
                Vec::new()
            },
        }
    }

    /// Closing price recorded within the given day's bounds, if any.
    pub async fn get_price_on_date(
        &self,
        crypto_id: i32,
        day: NaiveDate,
    ) -> Option<f64> {
        let (start_of_day, end_of_day) = day_bounds(day);

        let result: Result<Option<(f64,)>, Error> = sqlx::query_as(
            r#"
            SELECT "close_price"
            FROM "historical_prices"
            WHERE "crypto_id" = $1 AND "date" >= $2 AND "date" <= $3
            LIMIT 1
            "#,
        )
        .bind(crypto_id)
        .bind(start_of_day)
        .bind(end_of_day)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(row) => row.map(|(price,)| price),
            Err(error) => {
                warn!(
                    "could not fetch price on {} for crypto {}: {}",
                    day, crypto_id, error
                );
                None
            },
        }
    }

    /// Entry with the highest trading volume over the trailing 24
    /// hours, across all assets.
    pub async fn get_highest_volume(&self) -> Option<HighestVolume> {
        let since = Utc::now() - Duration::hours(24);

        let result = sqlx::query_as(
            r#"
            SELECT "crypto_id", "coingecko_id", "total_volume"
            FROM "historical_prices"
            WHERE "date" >= $1
            ORDER BY "total_volume" DESC
            LIMIT 1
            "#,
        )
        .bind(since)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(item) => item,
            Err(error) => {
                warn!("could not fetch highest volume entry: {}", error);
                None
            },
        }
    }

    /// Bulk insert; rows colliding on (crypto, day) are skipped so
    /// repeated ETL runs stay idempotent. Store errors propagate.
    pub async fn insert_many(
        &self,
        data: &Vec<HistoricalPrice>,
    ) -> Result<(), Error> {
        if data.is_empty() {
            return Ok(());
        }

        let mut query_builder: QueryBuilder<DataBase> = QueryBuilder::new(
            r#"
            INSERT INTO "historical_prices" (
                "crypto_id",
                "coingecko_id",
                "date",
                "close_price",
                "total_volume",
                "market_cap"
            )"#,
        );

        query_builder.push_values(data, |mut b, hp| {
            b.push_bind(hp.crypto_id)
                .push_bind(&hp.coingecko_id)
                .push_bind(hp.date)
                .push_bind(hp.close_price)
                .push_bind(hp.total_volume)
                .push_bind(hp.market_cap);
        });
        query_builder
            .push(r#" ON CONFLICT ("crypto_id", "date") DO NOTHING"#);

        let query = query_builder.build();
        query.execute(&self.pool).await?;

        Ok(())
    }
}
