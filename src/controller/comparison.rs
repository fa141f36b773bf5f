use actix_web::{get, web, Responder, Result};

use crate::{
    analytics,
    configuration::{AppState, State},
    error::Error,
};

/// `ids` repeats as a query key, so the raw pair list is walked
/// instead of a derived struct.
#[get("/analysis/comparison")]
async fn index(
    state: web::Data<AppState<State>>,
    data: web::Query<Vec<(String, String)>>,
) -> Result<impl Responder, Error> {
    let mut crypto_ids: Vec<i32> = Vec::new();
    let mut period: i64 = 7;

    for (key, value) in data.into_inner() {
        match key.as_str() {
            "ids" => crypto_ids.push(value.parse()?),
            "period" => period = value.parse()?,
            _ => {},
        }
    }

    let result = analytics::compare_performance(
        &state.database,
        &crypto_ids,
        period,
    )
    .await?;

    Ok(web::Json(result))
}
