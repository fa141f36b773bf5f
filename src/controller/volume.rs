use actix_web::{get, web, Responder, Result};

use crate::{
    configuration::{AppState, State},
    error::Error,
};

#[get("/analysis/volume")]
async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let data = state.database.historical_price.get_highest_volume().await;
    Ok(web::Json(data))
}
