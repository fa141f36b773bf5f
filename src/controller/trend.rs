use actix_web::{get, web, Responder, Result};
use serde::Deserialize;

use crate::{
    analytics,
    configuration::{AppState, State},
    error::Error,
};

#[get("/analysis/trend/{id}")]
async fn index(
    state: web::Data<AppState<State>>,
    path: web::Path<i32>,
    data: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let crypto_id = path.into_inner();
    let result =
        analytics::price_trend(&state.database, crypto_id, data.period)
            .await?;

    Ok(web::Json(result))
}

#[derive(Debug, Deserialize)]
pub struct Query {
    #[serde(default = "default_period")]
    period: i64,
}

fn default_period() -> i64 {
    3
}
