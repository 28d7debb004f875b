use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use recruit_match::config::{LoggingSettings, Settings};
use recruit_match::core::{Collaborators, MatchingOrchestrator};
use recruit_match::routes::{self, AppState};
use recruit_match::services::{ApiGateway, KeycloakDirectory, KeycloakSettings};
use recruit_match::TokenClaims;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use validator::Validate;

fn init_logging(logging: &LoggingSettings) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(logging.env_filter())
        .with_target(false)
        .with_level(true);

    if logging.is_pretty() {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn io_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration; logging falls back to defaults if it cannot be read
    let loaded = Settings::load();
    match &loaded {
        Ok(settings) => init_logging(&settings.logging),
        Err(_) => init_logging(&LoggingSettings::default()),
    }

    info!("Starting Recruit Match service...");

    let settings = loaded.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io_error(format!("Configuration error: {}", e))
    })?;

    if let Err(e) = settings.validate() {
        error!("Invalid configuration: {}", e);
        return Err(io_error(format!("Invalid configuration: {}", e)));
    }

    info!("Configuration loaded successfully");

    let timeout = Duration::from_secs(settings.services.timeout_secs);

    // Initialize identity provider client
    let directory = KeycloakDirectory::new(
        KeycloakSettings {
            base_url: settings.identity.base_url.clone(),
            realm: settings.identity.realm.clone(),
            admin_username: settings.identity.admin_username.clone(),
            admin_password: settings.identity.admin_password.clone(),
            client_id: settings.identity.client_id.clone(),
            page_size: settings.identity.page_size,
        },
        timeout,
    )
    .map_err(|e| io_error(format!("Failed to create identity client: {}", e)))?;

    info!(
        "Identity client initialized (realm: {}, page size: {})",
        settings.identity.realm, settings.identity.page_size
    );

    // Initialize platform services gateway
    let gateway = Arc::new(
        ApiGateway::new(
            settings.services.availability_uri.clone(),
            settings.services.offer_uri.clone(),
            settings.services.plan_uri.clone(),
            timeout,
        )
        .map_err(|e| io_error(format!("Failed to create API gateway: {}", e)))?,
    );

    info!("API gateway initialized (timeout: {}s)", settings.services.timeout_secs);

    let claims = match settings.auth.jwt_secret.as_deref() {
        Some(secret) => TokenClaims::with_secret(secret),
        None => {
            warn!("No JWT secret configured, bearer tokens are decoded without verification");
            TokenClaims::unverified()
        }
    };

    let collaborators = Collaborators {
        users: Arc::new(directory),
        availabilities: gateway.clone(),
        offers: gateway.clone(),
        plans: gateway,
    };

    let orchestrator = MatchingOrchestrator::new(collaborators, claims)
        .with_concurrency(settings.matching.availability_concurrency);

    info!(
        "Matching orchestrator initialized (availability concurrency: {})",
        settings.matching.availability_concurrency
    );

    // Build application state
    let app_state = AppState {
        orchestrator: Arc::new(orchestrator),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
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
