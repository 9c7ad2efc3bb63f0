use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hostel_backoffice::app::AppServices;
use hostel_backoffice::config::{AppConfig, Config, LogFormat, StorageConfig};
use hostel_backoffice::core::{LogNotifier, SystemClock};
use hostel_backoffice::middleware::{ErrorHandler, RequestId, REQUEST_ID_HEADER};
use hostel_backoffice::storage::Repositories;

fn init_tracing(app: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("hostel_backoffice={},actix_web=info", app.log_level).into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    match app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn cors(allowed_origin: Option<&str>) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .allowed_header(REQUEST_ID_HEADER)
        .expose_headers(vec![REQUEST_ID_HEADER])
        .max_age(3600);

    match allowed_origin {
        Some(origin) => cors.allowed_origin(origin),
        None => cors,
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    init_tracing(&config.app);

    tracing::info!("Starting hostel back office");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let repositories = match &config.storage {
        StorageConfig::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Repositories::in_memory()
        }
        StorageConfig::MySql(database) => {
            let pool = database
                .create_pool()
                .await
                .context("Failed to create database pool")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            tracing::info!(
                "Database pool initialized ({} connections)",
                database.pool_size
            );
            Repositories::mysql(pool)
        }
    };

    let clock = SystemClock::new(config.billing.utc_offset_hours)
        .context("Invalid BILLING_UTC_OFFSET_HOURS")?;
    let services = AppServices::new(
        repositories,
        config.billing,
        Arc::new(clock),
        Arc::new(LogNotifier),
    );

    let bind_address = config.server.bind_address();
    let allowed_origin = config.app.cors_allowed_origin.clone();
    let server = HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(ErrorHandler)
            .wrap(cors(allowed_origin.as_deref()))
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .configure(move |cfg| services.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await.context("Server error")
}
