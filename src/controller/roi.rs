use actix_web::{get, web, Responder, Result};
use serde::Deserialize;

use crate::{
    analytics,
    configuration::{AppState, State},
    error::Error,
    helpers::parse_date,
};

#[get("/analysis/roi/{id}")]
async fn index(
    state: web::Data<AppState<State>>,
    path: web::Path<i32>,
    data: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let crypto_id = path.into_inner();
    let start_date = parse_date(&data.start_date)?;
    let end_date = parse_date(&data.end_date)?;

    let result = analytics::calculate_roi(
        &state.database,
        crypto_id,
        start_date,
        end_date,
    )
    .await?;

    Ok(web::Json(result))
}

#[derive(Debug, Deserialize)]
pub struct Query {
    start_date: String,
    end_date: String,
}
