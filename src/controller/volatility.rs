use actix_web::{get, web, Responder, Result};

use crate::{
    analytics,
    configuration::{AppState, State},
    error::Error,
};

#[get("/analysis/volatility")]
async fn index(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let result = analytics::calculate_volatility(&state.database).await?;
    Ok(web::Json(result))
}
