use std::{sync::Arc, time::Instant};

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenvy::dotenv;
use env_logger::Env;
use log::{debug, info, warn};

use crate::{
    config::{Config, Environment},
    db::Database,
    errors::AppError,
    middleware::RequestLogger,
    repositories::{KeyValueRepositoryTrait, RedisRepository},
    routes,
    services::ShortenerService,
    types::AppState,
};

pub type AppResult<T> = Result<T, AppError>;

// Setup logging with custom format and configuration
fn setup_logging(config: &Config) -> Result<(), AppError> {
    let log_level = match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info".to_string(),
        Environment::Production => "info,actix_web=warn".to_string(),
    };

    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

pub async fn server() -> AppResult<()> {
    // Nothing can be logged until the configuration picks the filter, so the
    // outcome of `.env` is reported once the logger is up
    let dotenv_result = dotenv();
    let config = Config::load()?;
    setup_logging(&config)?;

    match dotenv_result {
        Ok(path) => debug!(".env file loaded from {}", path.display()),
        Err(e) => warn!("Could not load .env file: {}", e),
    }
    info!("Configuration loaded successfully");

    let start_time = Instant::now();

    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );

    if config.app.environment == Environment::Development {
        debug!("Debug logging enabled");
        debug!("Full configuration: {:?}", config);
    }

    // One shared store connection for every worker
    let database = Database::connect(&config.store).await?;
    let repository: Arc<dyn KeyValueRepositoryTrait> =
        Arc::new(RedisRepository::new(database.clone()));
    let shortener = web::Data::new(ShortenerService::new(repository, config.shortener.clone()));
    let state = web::Data::new(AppState {
        start_time,
        version: config.app.version.clone(),
    });

    let enable_debug_logging = config.app.environment != Environment::Production;

    let log_format = if enable_debug_logging {
        "%a \"%r\" %s %b %T %{x-request-id}o"
    } else {
        "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\" %{x-request-id}o"
    };

    let result = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(shortener.clone())
            .wrap(RequestLogger::new(enable_debug_logging))
            .wrap(Logger::new(log_format))
            .configure(routes::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await;

    database.shutdown().await;
    result?;

    info!("Server stopped");
    Ok(())
}
