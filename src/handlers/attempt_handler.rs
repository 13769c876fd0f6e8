use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{ListAttemptsQuery, SubmitAttemptRequest},
};

#[post("/api/quizzes/{id}/attempts")]
async fn start_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state
        .attempt_service
        .start_attempt(&id, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/api/attempts/{id}/submit")]
async fn submit_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<SubmitAttemptRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .attempt_service
        .submit_attempt(&id, &auth.0.sub, request.into_inner().answers)
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/api/attempts/{id}")]
async fn get_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempt = state.attempt_service.get_attempt(&id, &auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(attempt))
}

#[get("/api/quizzes/{id}/attempts")]
async fn list_attempts(
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<ListAttemptsQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempts = state
        .attempt_service
        .list_attempts(&id, query.student_id.as_deref(), &auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(attempts))
}
