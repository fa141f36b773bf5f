use std::{env, fs, ops::Deref, sync::Arc};

use url::Url;

use crate::{
    dao::get_path,
    error::Error,
    provider::{DatabasePool, HTTP},
};

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

/// Everything a handler or task needs, built once at startup and
/// injected everywhere; no component reaches for globals.
#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub database: DatabasePool,
    pub http: HTTP,
}

impl State {
    pub async fn new(
        config: Config,
        database: DatabasePool,
        http: HTTP,
    ) -> Result<State, Error> {
        Self::init_migrations(&database).await?;
        Ok(Self {
            config,
            database,
            http,
        })
    }

    async fn init_migrations(database: &DatabasePool) -> Result<(), Error> {
        let files = vec!["cryptocurrencies.sql", "historical_prices.sql"];
        let dir = env!("CARGO_MANIFEST_DIR");

        for file in files {
            let data = get_path(dir, file)?;
            sqlx::query(data.as_str())
                .execute(database.get_pool())
                .await?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub coingecko_api_url: String,
    pub database_url: String,
    pub tracked_assets: Vec<String>,
    pub history_days: u16,
    pub etl_interval: u64,
    pub timeout: u64,
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn get_coingecko_info_url(&self, coingecko_id: &str) -> String {
        format!("{}/coins/{}", self.coingecko_api_url, coingecko_id)
    }

    pub fn get_coingecko_market_chart_url(
        &self,
        coingecko_id: &str,
        days: u16,
    ) -> String {
        format!(
            "{}/coins/{}/market_chart?vs_currency=usd&days={}&interval=daily",
            self.coingecko_api_url, coingecko_id, days
        )
    }
}

pub fn get_configuration() -> Result<Config, Error> {
    let coingecko_api_url = env::var("COINGECKO_API_URL")?;
    Url::parse(&coingecko_api_url)?;

    let database_url = env::var("DATABASE_URL")?;

    let tracked_assets = env::var("TRACKED_ASSETS")?
        .split(',')
        .map(|item| item.trim().to_owned())
        .filter(|item| !item.is_empty())
        .collect::<Vec<String>>();

    if tracked_assets.is_empty() {
        return Err(Error::ConfigurationError(String::from(
            "TRACKED_ASSETS is empty",
        )));
    }

    let history_days: u16 = env::var("HISTORY_DAYS")?.parse()?;
    let etl_interval: u64 = env::var("ETL_INTERVAL_IN_SEC")?.parse()?;
    let timeout: u64 = env::var("TIMEOUT")?.parse()?;

    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let allowed_origins = env::var("ALLOWED_ORIGINS")?
        .split(',')
        .map(|item| item.to_owned())
        .collect::<Vec<String>>();

    Ok(Config {
        coingecko_api_url,
        database_url,
        tracked_assets,
        history_days,
        etl_interval,
        timeout,
        server_host,
        port,
        allowed_origins,
    })
}

pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    let config_string = fs::read_to_string(path)?;
    parse_config_string(config_string);

    Ok(())
}

fn parse_config_string(config: String) {
    for line in config.split('\n') {
        if line.trim_start().starts_with('#') {
            continue;
        }
        if let Some(position) = line.find('=') {
            let (key, value) = line.split_at(position);
            env::set_var(key.trim(), value[1..].trim());
        }
    }
}
