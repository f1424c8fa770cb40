use actix_web::{post, web, HttpResponse, Responder};
use actix_web::error::ResponseError;

use crate::entities::user::{GoogleAuthRequest, LoginUser, NewUser};
use crate::AppState;

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    user: web::Json<NewUser>,
) -> impl Responder {
    match state.auth_handler.register(user.into_inner()).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>,
) -> impl Responder {
    match state.auth_handler.login(user.into_inner()).await {
        Ok(auth_response) => HttpResponse::Ok().json(auth_response),
        Err(e) => e.error_response(),
    }
}

#[post("/google")]
pub async fn google_auth(
    state: web::Data<AppState>,
    request: web::Json<GoogleAuthRequest>,
) -> impl Responder {
    match state.auth_handler.google_auth(request.into_inner()).await {
        Ok(auth_response) => HttpResponse::Ok().json(auth_response),
        Err(e) => e.error_response(),
    }
}
