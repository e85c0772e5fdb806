use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use unichance::auth::JwtValidator;
use unichance::config::{ServerSettings, Settings};
use unichance::core::FitScorer;
use unichance::error::{handle_json_payload_error, handle_query_payload_error};
use unichance::routes::{self, AppState};
use unichance::services::{FitService, PostgresClient};

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn build_cors(server: &ServerSettings) -> Cors {
    if server.allowed_origins.is_empty() {
        return Cors::permissive();
    }

    server
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec!["Origin", "Content-Type", "Accept", "Authorization"])
}

fn io_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Configuration errors are reported before logging is configured
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Err(io_error(format!("Configuration error: {}", e)));
        }
    };

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());
    init_logging(&log_level, &log_format);

    info!("Starting UniChance catalog and scoring service...");

    let postgres = match PostgresClient::from_settings(&settings.database).await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to connect to PostgreSQL: {}", e);
            return Err(io_error(format!("PostgreSQL connection error: {}", e)));
        }
    };

    info!("PostgreSQL client initialized, migrations applied");

    let scorer = FitScorer::new(settings.scoring_weights());
    info!(
        "Fit scorer initialized with weights: {:?} (reserved: {})",
        scorer.weights(),
        scorer.weights().reserved()
    );

    let app_state = AppState {
        postgres: postgres.clone(),
        fit: Arc::new(FitService::new(postgres, scorer)),
    };
    let validator = web::Data::new(JwtValidator::new(
        &settings.auth.jwt_secret,
        settings.auth.leeway_secs,
    ));

    let server = settings.server.clone();
    let workers = server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", server.host, server.port);

    let cors_settings = server.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(validator.clone())
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(build_cors(&cors_settings))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((server.host, server.port))?
    .run()
    .await
}
