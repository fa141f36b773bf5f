use actix_web::{get, web, Responder, Result};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[get("/{symbol}")]
async fn index(
    state: web::Data<AppState<State>>,
    path: web::Path<String>,
) -> Result<impl Responder, Error> {
    let symbol = path.into_inner();
    let data = state
        .database
        .cryptocurrency
        .get_by_symbol(&symbol)
        .await
        .ok_or_else(|| {
            Error::NotFound(String::from("Cryptocurrency not found"))
        })?;

    Ok(web::Json(data))
}
