use crate::{
    configuration::Config,
    dao::{PoolOption, PoolType},
    error::Error,
    model::{Cryptocurrency, HistoricalPrice, Table},
};

/// Process-lifetime handle to the external store: one pool, created
/// at startup and shared by every component through `AppState`.
#[derive(Debug)]
pub struct DatabasePool {
    pub cryptocurrency: Table<Cryptocurrency>,
    pub historical_price: Table<HistoricalPrice>,
    pub pool: PoolType,
}

impl DatabasePool {
    pub async fn new(config: &Config) -> Result<DatabasePool, Error> {
        let pool = PoolOption::new()
            .max_connections(20)
            .connect(config.database_url.as_str())
            .await?;

        Ok(DatabasePool {
            cryptocurrency: Table::new(pool.clone()),
            historical_price: Table::new(pool.clone()),
            pool,
        })
    }

    pub fn get_pool(&self) -> &PoolType {
        &self.pool
    }
}
