use mimalloc::MiMalloc;
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = &dogapi::config::CONFIG;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let dataset = cfg
        .seed
        .dataset_path
        .as_ref()
        .map_or_else(|| "<bundled>".to_string(), |p| p.display().to_string());
    info!(
        database_url = %cfg.basic.database_url,
        loglevel = %cfg.basic.loglevel,
        listen_addr = %cfg.basic.listen_addr,
        listen_port = cfg.basic.listen_port,
        cors_allowed_origins = ?cfg.basic.cors_allowed_origins,
        seed_enabled = cfg.seed.enabled,
        seed_dataset = %dataset,
        "Configuration loaded"
    );

    let db = dogapi::db::spawn(&cfg.basic.database_url).await?;

    // Seeding gates serving: a failed load must never leave a half-seeded catalog online.
    if cfg.seed.enabled {
        if let Err(e) = dogapi::seed::run(&db, &cfg.seed.source()).await {
            error!(error = %e, "Startup seeding failed; refusing to serve.");
            return Err(e.into());
        }
    } else {
        info!("Startup seeding disabled by configuration.");
    }

    let state = dogapi::server::DogApiState::new(db);
    let app = dogapi::server::dogapi_router(state, &cfg.basic.cors_allowed_origins);

    let addr = SocketAddr::from((cfg.basic.listen_addr, cfg.basic.listen_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server has shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down."),
        () = terminate => info!("Received SIGTERM, shutting down."),
    }
}
