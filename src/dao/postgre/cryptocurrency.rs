use tracing::warn;

use crate::model::{Cryptocurrency, Table};

impl Table<Cryptocurrency> {
    /// All tracked assets. Store failures degrade to an empty list;
    /// callers cannot tell "no data" from "store unreachable".
    pub async fn get_all(&self) -> Vec<Cryptocurrency> {
        let result = sqlx::query_as(
            r#"
            SELECT "id", "coingecko_id", "symbol", "name", "current_price", "market_cap", "total_volume", "last_updated"
            FROM "cryptocurrencies"
            ORDER BY "id"
            "#,
        )
        .fetch_all(&self.pool)
        .await;

        match result {
            Ok(items) => items,
            Err(error) => {
                warn!("could not fetch cryptocurrencies: {}", error);
                Vec::new()
            },
        }
    }

    /// Exact-match lookup by ticker symbol.
    pub async fn get_by_symbol(&self, symbol: &str) -> Option<Cryptocurrency> {
        let result = sqlx::query_as(
            r#"
            SELECT "id", "coingecko_id", "symbol", "name", "current_price", "market_cap", "total_volume", "last_updated"
            FROM "cryptocurrencies"
            WHERE "symbol" = $1
            "#,
        )
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(item) => item,
            Err(error) => {
                warn!(
                    "could not fetch cryptocurrency by symbol {}: {}",
                    symbol, error
                );
                None
            },
        }
    }

    /// Inserts the record or refreshes every column when the
    /// `coingecko_id` already exists. Returns the store-assigned id,
    /// or `None` when the store rejects the write.
    pub async fn upsert(&self, data: &Cryptocurrency) -> Option<i32> {
        let result: Result<(i32,), sqlx::Error> = sqlx::query_as(
            r#"
            INSERT INTO "cryptocurrencies" (
                "coingecko_id", "symbol", "name", "current_price", "market_cap", "total_volume", "last_updated"
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT ("coingecko_id") DO UPDATE SET
                "symbol" = EXCLUDED."symbol",
                "name" = EXCLUDED."name",
                "current_price" = EXCLUDED."current_price",
                "market_cap" = EXCLUDED."market_cap",
                "total_volume" = EXCLUDED."total_volume",
                "last_updated" = EXCLUDED."last_updated"
            RETURNING "id"
            "#,
        )
        .bind(&data.coingecko_id)
        .bind(&data.symbol)
        .bind(&data.name)
        .bind(data.current_price)
        .bind(data.market_cap)
        .bind(data.total_volume)
        .bind(data.last_updated)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok((id,)) => Some(id),
            Err(error) => {
                warn!(
                    "could not upsert cryptocurrency {}: {}",
                    data.coingecko_id, error
                );
                None
            },
        }
    }
}
