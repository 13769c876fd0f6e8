use actix_web::{get, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError};

#[get("/health")]
async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.db.health_check().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}
