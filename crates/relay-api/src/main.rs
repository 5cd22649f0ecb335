//! # nuvei-relay
//!
//! Order-initiation relay in front of the Nuvei gateway.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export NUVEI_MERCHANT_ID=...
//! export NUVEI_MERCHANT_SITE_ID=...
//! export NUVEI_MERCHANT_SECRET_KEY=...
//!
//! # Run the server
//! nuvei-relay
//! ```

use relay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!(
        "Gateway: {} (flow={})",
        state.flow.provider_name(),
        state.flow.profile().name
    );

    let app = routes::create_router(state);

    info!("nuvei-relay listening on http://{}", addr);

    if !is_prod {
        info!("Health: http://{}/health", addr);
        info!("Orders: POST http://{}/api/v1/orders", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("nuvei-relay stopped");
    Ok(())
}

/// `LOG_FORMAT=json` switches to one JSON object per line; `RUST_LOG` filters.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn print_banner() {
    println!(
        r#"
  nuvei-relay
  -----------
  Nuvei order initiation
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
