use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use bloodplus::config::{LoggingSettings, Settings};
use bloodplus::error::{handle_json_payload_error, handle_path_error, handle_query_payload_error};
use bloodplus::routes::{self, AppState};
use bloodplus::services::{
    DonorStore, Geocoder, HttpMailer, MailTransport, NotificationDispatcher, PasswordHasher,
    PostgresClient, RequestStore, TokenService,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::other(format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    init_logging(&settings.logging);

    info!("Starting BloodPlus donor service...");

    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| startup_error("Failed to connect to PostgreSQL", e))?,
    );

    info!("PostgreSQL client initialized");

    let geocoder = Arc::new(
        Geocoder::new(&settings.geocoder).map_err(|e| startup_error("Failed to build geocoder", e))?,
    );

    let mailer = HttpMailer::new(&settings.mail)
        .map_err(|e| startup_error("Failed to build mail client", e))?;
    if !mailer.is_configured() {
        warn!("Mail relay endpoint is empty, donor notifications will be skipped");
    }

    let store: Arc<dyn DonorStore> = postgres.clone();
    let requests: Arc<dyn RequestStore> = postgres.clone();
    let transport: Arc<dyn MailTransport> = Arc::new(mailer);
    let notifier = Arc::new(NotificationDispatcher::new(store, transport));

    let passwords = Arc::new(
        PasswordHasher::new(settings.auth.pbkdf2_iterations)
            .map_err(|e| startup_error("Invalid password hashing settings", e))?,
    );
    let tokens = web::Data::new(TokenService::new(
        &settings.auth.jwt_secret,
        settings.auth.token_ttl_hours,
    ));

    let app_state = AppState {
        postgres,
        requests,
        geocoder,
        notifier,
        passwords,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(tokens.clone())
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
