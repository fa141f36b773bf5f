use clap::Parser;
use tracing::{error, Level};

use crypto_etl::{
    cli::{Cli, Commands},
    configuration::{
        get_configuration, set_configuration, AppState, Config, State,
    },
    error::Error,
    handler::market_data,
    provider::{DatabasePool, HTTP},
    server,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level(Level::INFO)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let (config, database) = match init().await {
        Ok((config, database)) => (config, database),
        Err(e) => return Err(Error::ConfigurationError(e.to_string())),
    };

    let http = HTTP::new(config.clone())?;
    let state = State::new(config, database, http).await?;
    let app_state = AppState::new(state);

    match cli.command {
        Some(Commands::Serve) => {
            market_data::run_etl(&app_state).await;

            let (_, _) = tokio::try_join!(
                server::server_task(&app_state),
                market_data::etl_task(app_state.clone()),
            )?;
        },
        None => {
            market_data::run_etl(&app_state).await;

            if cli.continuous {
                market_data::etl_task(app_state.clone()).await?;
            }
        },
    }

    Ok(())
}

async fn init() -> Result<(Config, DatabasePool), Error> {
    set_configuration()?;
    let config = get_configuration()?;
    let database = DatabasePool::new(&config).await?;
    Ok((config, database))
}
