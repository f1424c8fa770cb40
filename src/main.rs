use actix_cors::Cors;
use actix_web::{http, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use cvcraft_backend::{
    db::postgres::create_pool,
    graceful_shutdown::shutdown_signal,
    handlers::{
        auth::{google_auth, login, register},
        home::home,
        payments::{create_order, verify_payment},
        resumes::{
            create_resume, delete_resume, download_resume_pdf, get_all_resumes,
            get_resume_by_id, get_shared_resume, update_resume,
        },
    },
    middlewares::auth::AuthMiddleware,
    settings::AppConfig,
    AppState,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = create_pool(&config.database_url)
        .await
        .expect("Failed to create database connection pool");

    let app_state = web::Data::new(AppState::new(&config, pool));

    let server_addr = format!("{}:{}", config.host, config.port);
    let upload_dir = config.upload_dir.clone();
    let cors_origins = config.cors_origins();

    tracing::info!(
        "Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let server = HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![http::header::AUTHORIZATION, http::header::CONTENT_TYPE])
            .max_age(3600);
        for origin in &cors_origins {
            cors = if origin == "*" {
                cors.allow_any_origin()
            } else {
                cors.allowed_origin(origin)
            };
        }

        App::new()
            .app_data(app_state.clone())
            // AuthMiddleware is fixed to BoxBody responses, so it must wrap
            // the bare app; the body-generic layers stack outside it.
            .wrap(AuthMiddleware)
            .wrap(NormalizePath::trim())
            .wrap(cors)
            .wrap(TracingLogger::default())
            .service(home)
            .service(
                web::scope("/api/auth")
                    .service(register)
                    .service(login)
                    .service(google_auth),
            )
            .service(
                web::scope("/api/resume")
                    .service(get_shared_resume)
                    .service(download_resume_pdf)
                    .service(create_resume)
                    .service(get_all_resumes)
                    .service(get_resume_by_id)
                    .service(update_resume)
                    .service(delete_resume),
            )
            .service(
                web::scope("/api/payment")
                    .service(create_order)
                    .service(verify_payment),
            )
            .service(actix_files::Files::new("/uploads/resumes", &upload_dir))
    })
    .workers(config.worker_count)
    .bind(server_addr)?
    .run();

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
