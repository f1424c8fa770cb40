mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{draft, encode, entities, password, use_cases, validation};
pub use interfaces::{handlers, middlewares, repositories};
pub use infrastructure::{auth, db, payment, pdf, utils};

use auth::google::GoogleTokenClient;
use auth::jwt::JwtService;
use payment::RazorpayClient;
use repositories::sqlx_repo::{SqlxOrderRepo, SqlxResumeRepo, SqlxUserRepo};
use use_cases::auth::AuthHandler;
use use_cases::payments::PaymentHandler;
use use_cases::resumes::ResumeHandler;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub resume_handler: AppResumeHandler,
    pub payment_handler: AppPaymentHandler,
    pub upload_dir: String,
}

pub type AppAuthHandler = AuthHandler<SqlxUserRepo, JwtService, GoogleTokenClient>;
pub type AppResumeHandler = ResumeHandler<SqlxResumeRepo>;
pub type AppPaymentHandler = PaymentHandler<SqlxOrderRepo, SqlxResumeRepo, RazorpayClient>;

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let jwt_service = JwtService::new(config);
        let google_verifier = GoogleTokenClient::new(config.google_client_id.clone());

        let user_repo = SqlxUserRepo::new(pool.clone());
        let resume_repo = SqlxResumeRepo::new(pool.clone());
        let order_repo = SqlxOrderRepo::new(pool);

        let auth_handler = AuthHandler::new(user_repo, jwt_service, google_verifier);
        let resume_handler = ResumeHandler::new(resume_repo.clone());
        let payment_handler = PaymentHandler::new(
            order_repo,
            resume_repo,
            RazorpayClient::new(
                config.razorpay_key_id.clone(),
                config.razorpay_key_secret.clone(),
            ),
        );

        AppState {
            auth_handler,
            resume_handler,
            payment_handler,
            upload_dir: config.upload_dir.clone(),
        }
    }
}
