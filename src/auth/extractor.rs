use std::future::{ready, Ready};

use actix_web::{http::header::AUTHORIZATION, web, FromRequest, HttpRequest};

use crate::{
    auth::{Claims, JwtService},
    errors::{AppError, AppResult},
};

/// Extractor for the authenticated caller: validates the bearer token on
/// demand, so handlers declare authentication by taking this parameter.
pub struct AuthenticatedUser(pub Claims);

fn claims_from_request(req: &HttpRequest) -> AppResult<Claims> {
    let jwt_service = req
        .app_data::<web::Data<JwtService>>()
        .ok_or_else(|| AppError::InternalError("JWT service not configured".to_string()))?;

    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    jwt_service.validate_token(token)
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(claims_from_request(req).map(AuthenticatedUser))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, models::domain::Role};
    use actix_web::test::TestRequest;

    fn jwt() -> JwtService {
        JwtService::new(&Config::test_config().jwt_secret, 1)
    }

    #[actix_web::test]
    async fn valid_bearer_token_yields_claims() {
        let jwt_service = jwt();
        let token = jwt_service
            .create_token("user-1", "johndoe", Role::Student)
            .unwrap();

        let req = TestRequest::default()
            .app_data(web::Data::new(jwt_service))
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let claims = claims_from_request(&req).unwrap();
        assert_eq!(claims.sub, "user-1");
    }

    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(web::Data::new(jwt()))
            .to_http_request();

        assert!(matches!(
            claims_from_request(&req),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[actix_web::test]
    async fn non_bearer_header_is_unauthorized() {
        let req = TestRequest::default()
            .app_data(web::Data::new(jwt()))
            .insert_header((AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_http_request();

        assert!(matches!(
            claims_from_request(&req),
            Err(AppError::Unauthorized(_))
        ));
    }
}
