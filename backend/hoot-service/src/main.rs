use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use crypto_core::jwt;
use db_pool::{create_pool, DbConfig};
use hoot_service::db::{PgPostStore, PgUserDirectory, MIGRATOR};
use hoot_service::handlers;
use hoot_service::services::PostService;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "info,actix_web=debug,sqlx=warn";

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Hoot Service
///
/// Posts and comments REST API. Every `/posts` route requires a bearer
/// access token; `/health` and `/health/live` are public.
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    let config = match hoot_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.log.json);

    tracing::info!("Starting hoot-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Environment: {} (production={})",
        config.app.env,
        config.is_production()
    );

    let public_key = jwt::load_validation_key().map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("JWT public key not configured: {e}"),
        )
    })?;
    jwt::initialize_jwt_validation_only(&public_key).map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to initialize JWT keys: {e}"),
        )
    })?;

    let db_cfg = DbConfig::from_env("hoot-service").unwrap_or_else(|e| {
        tracing::warn!("{}; using service database settings", e);
        DbConfig {
            service_name: "hoot-service".to_string(),
            database_url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            ..DbConfig::default()
        }
    });

    db_cfg.log_config();
    let db_pool = match create_pool(db_cfg).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {:#}", e);
            std::process::exit(1);
        }
    };

    MIGRATOR.run(&db_pool).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("Failed to run migrations: {e}"),
        )
    })?;
    tracing::info!("Database migrations applied");

    let service = web::Data::new(PostService::new(
        Arc::new(PgPostStore::new(db_pool.clone())),
        Arc::new(PgUserDirectory::new(db_pool)),
    ));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let cors_origins = config.cors_origins();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in &cors_origins {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(service.clone())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .shutdown_timeout(30)
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    let result = tokio::select! {
        result = &mut server_task => result,
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            server_task.await
        }
    };

    match result {
        Ok(result) => result,
        Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
    }
}
