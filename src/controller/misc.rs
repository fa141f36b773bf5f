use actix_web::{get, web, Responder};
use serde::Serialize;

use crate::error::Error;

#[get("/")]
async fn index() -> Result<impl Responder, Error> {
    Ok(web::Json(Response {
        message: "Welcome to the Cryptocurrency Analytics API",
    }))
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub message: &'static str,
}
