use actix_web::{get, web, Responder, Result};

use crate::{
    analytics,
    configuration::{AppState, State},
    error::Error,
};

#[get("/analysis/market-dominance")]
async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let result =
        analytics::calculate_market_dominance(&state.database).await?;
    Ok(web::Json(result))
}
