use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{CreateQuizRequest, QuizDefinitionRequest},
};

#[post("/api/quizzes")]
async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .create_quiz(request.into_inner(), &auth.0.sub)
        .await?;
    Ok(HttpResponse::Created().json(quiz))
}

#[get("/api/quizzes/{id}")]
async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let view = state.quiz_service.get_quiz(&id, &auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[put("/api/quizzes/{id}")]
async fn update_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<QuizDefinitionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .update_quiz(&id, request.into_inner(), &auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[delete("/api/quizzes/{id}")]
async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete_quiz(&id, &auth.0.sub).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[get("/api/courses/{course_id}/quizzes")]
async fn list_course_quizzes(
    state: web::Data<AppState>,
    course_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let views = state
        .quiz_service
        .list_quizzes_for_course(&course_id, &auth.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(views))
}
