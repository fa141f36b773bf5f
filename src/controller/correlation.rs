use actix_web::{get, web, Responder, Result};
use serde::Deserialize;

use crate::{
    analytics,
    configuration::{AppState, State},
    error::Error,
};

#[get("/analysis/correlation")]
async fn index(
    state: web::Data<AppState<State>>,
    data: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let result = analytics::calculate_correlation(
        &state.database,
        data.crypto_id_1,
        data.crypto_id_2,
        data.days,
    )
    .await?;

    Ok(web::Json(result))
}

#[derive(Debug, Deserialize)]
pub struct Query {
    crypto_id_1: i32,
    crypto_id_2: i32,
    #[serde(default = "default_days")]
    days: i64,
}

fn default_days() -> i64 {
    7
}
