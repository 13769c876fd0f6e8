use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use acadia_server::{app_state::AppState, auth::JwtService, config::Config, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
    let state = AppState::new(config.clone())
        .await
        .expect("failed to initialize application state");

    let bind_addr = (config.web_server_host.clone(), config.web_server_port);
    log::info!("Starting server on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(handlers::health_check)
            .service(handlers::create_quiz)
            .service(handlers::get_quiz)
            .service(handlers::update_quiz)
            .service(handlers::delete_quiz)
            .service(handlers::list_course_quizzes)
            .service(handlers::start_attempt)
            .service(handlers::submit_attempt)
            .service(handlers::get_attempt)
            .service(handlers::list_attempts)
    })
    .bind(bind_addr)?
    .run()
    .await
}
