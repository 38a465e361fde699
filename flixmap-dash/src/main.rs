//! flixmap-dash - catalogue origins dashboard
//!
//! Loads the catalogue CSV and the country boundary GeoJSON, aggregates
//! title counts per country and year, and serves an interactive map,
//! timeline and table.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use flixmap_common::config::{load_or_default, CliOverrides, DashboardConfig};
use flixmap_dash::{build_router, AppState, Dashboard};

/// Command-line arguments for flixmap-dash
#[derive(Parser, Debug)]
#[command(name = "flixmap-dash")]
#[command(about = "Interactive map of where catalogue titles come from")]
#[command(version)]
struct Args {
    /// TOML config file (also FLIXMAP_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalogue CSV file
    #[arg(long, env = "FLIXMAP_CATALOG")]
    catalog: Option<PathBuf>,

    /// Country boundary GeoJSON file
    #[arg(long, env = "FLIXMAP_BOUNDARIES")]
    boundaries: Option<PathBuf>,

    /// Feature property holding the country name
    #[arg(long, env = "FLIXMAP_BOUNDARY_PROPERTY")]
    boundary_property: Option<String>,

    /// Address to bind
    #[arg(long, env = "FLIXMAP_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "FLIXMAP_PORT")]
    port: Option<u16>,

    /// First year on the slider (default: earliest release year)
    #[arg(long)]
    year_min: Option<i32>,

    /// Last year on the slider (default: latest release year)
    #[arg(long)]
    year_max: Option<i32>,

    /// Color domain upper bound in fixed scale mode
    #[arg(long)]
    fixed_scale_max: Option<u32>,

    /// Country shown on the timeline before any map click
    #[arg(long)]
    fallback_country: Option<String>,

    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(long, env = "FLIXMAP_LOG")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            catalog_path: self.catalog.clone(),
            boundaries_path: self.boundaries.clone(),
            boundary_property: self.boundary_property.clone(),
            host: self.host.clone(),
            port: self.port,
            year_min: self.year_min,
            year_max: self.year_max,
            fixed_scale_max: self.fixed_scale_max,
            fallback_country: self.fallback_country.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is resolved before tracing so the configured level applies
    let loaded = load_or_default(args.config.as_deref()).context("Failed to load config file")?;
    let config = DashboardConfig::resolve(&args.overrides(), &loaded.config)
        .context("Invalid configuration")?;

    init_tracing(&config.log_level);

    info!(
        "Starting flixmap-dash v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &loaded.source {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file found, using command-line values and defaults"),
    }
    info!("Catalogue: {}", config.catalog_path.display());
    info!("Boundaries: {}", config.boundaries_path.display());

    let dashboard = Dashboard::load(&config).with_context(|| {
        format!(
            "Failed to load dashboard data from {} and {}",
            config.catalog_path.display(),
            config.boundaries_path.display()
        )
    })?;
    let app = build_router(AppState::new(dashboard));

    let ip = config
        .host
        .parse::<std::net::IpAddr>()
        .with_context(|| format!("Invalid host address: {}", config.host))?;
    let addr = SocketAddr::new(ip, config.port);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("flixmap-dash listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(level: &str) {
    let directive = if level.contains('=') {
        level.to_string()
    } else {
        format!(
            "flixmap_dash={level},flixmap_common={level},tower_http={level}",
            level = level
        )
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
