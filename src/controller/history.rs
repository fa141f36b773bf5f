use actix_web::{get, web, Responder, Result};
use serde::Deserialize;

use crate::{
    configuration::{AppState, State},
    error::Error,
    helpers::{day_bounds, parse_date},
};

#[get("/{id}/history")]
async fn index(
    state: web::Data<AppState<State>>,
    path: web::Path<i32>,
    data: web::Query<Query>,
) -> Result<impl Responder, Error> {
    let crypto_id = path.into_inner();

    let start_date = match &data.start_date {
        Some(value) => Some(day_bounds(parse_date(value)?).0),
        None => None,
    };
    let end_date = match &data.end_date {
        Some(value) => Some(day_bounds(parse_date(value)?).1),
        None => None,
    };

    let history = state
        .database
        .historical_price
        .get_by_crypto_id(crypto_id, start_date, end_date)
        .await;

    if history.is_empty() {
        return Err(Error::InsufficientData(String::from(
            "no historical prices found for this cryptocurrency",
        )));
    }

    Ok(web::Json(history))
}

#[derive(Debug, Deserialize)]
pub struct Query {
    start_date: Option<String>,
    end_date: Option<String>,
}
