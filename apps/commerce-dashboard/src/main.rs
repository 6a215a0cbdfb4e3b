use anyhow::{Context, Result};
use clap::Parser;
use commerce_dashboard::{cli, config, openapi, routes, state};
use tokio::net::TcpListener;

async fn bind_listener(addr: &str) -> Result<TcpListener> {
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
            anyhow::bail!(
                "Failed to bind commerce-dashboard listener on {addr}: port already in use. Stop the other service using this port or re-run with --port to choose another port.",
            );
        }
        Err(err) => Err(err)
            .with_context(|| format!("failed to bind commerce-dashboard listener on {addr}")),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    if args.print_openapi {
        println!(
            "{}",
            serde_json::to_string_pretty(&openapi::openapi_json())?
        );
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = config::DashboardConfig::from_env(args.database, args.static_root)?;
    if !config.database_path.is_file() {
        tracing::warn!(
            path = %config.database_path.display(),
            "database file not found; report endpoints will fail until it exists"
        );
    }

    let http = reqwest::Client::builder()
        .user_agent(concat!("commerce-dashboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")?;
    let state = state::AppState::new(config, http);
    tracing::info!(
        database = %state.db.path().display(),
        weather_api = %state.config.weather_api_url,
        "dashboard configured"
    );

    let app = routes::router(state);
    let addr = format!("{}:{}", args.host, args.port);
    let listener = bind_listener(&addr).await?;
    tracing::info!(%addr, "commerce-dashboard listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
