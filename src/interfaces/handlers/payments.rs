use actix_web::error::ResponseError;
use actix_web::{post, web, HttpResponse, Responder};
use tracing::instrument;

use crate::entities::order::VerifyPaymentRequest;
use crate::use_cases::extractors::AuthClaims;
use crate::AppState;

#[post("/order")]
#[instrument(skip(claims, state))]
pub async fn create_order(claims: AuthClaims, state: web::Data<AppState>) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return e.error_response(),
    };

    match state.payment_handler.create_order(&user_id).await {
        // the raw gateway order object feeds the checkout widget directly
        Ok(order) => HttpResponse::Ok().json(order),
        Err(e) => e.error_response(),
    }
}

#[post("/verify")]
#[instrument(skip(_claims, state, request))]
pub async fn verify_payment(
    _claims: AuthClaims,
    state: web::Data<AppState>,
    request: web::Json<VerifyPaymentRequest>,
) -> impl Responder {
    match state.payment_handler.verify_payment(&request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.error_response(),
    }
}
