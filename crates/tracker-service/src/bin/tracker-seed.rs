//! Database seeding entry point
//!
//! Run with:
//! ```bash
//! cargo run -p tracker-service --bin tracker-seed
//! ```
//!
//! Connects to PostgreSQL, applies migrations, then creates the default
//! roles and the configured admin. Safe to run repeatedly.

use tracing::{error, info};

use tracker_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, TracingConfig};
use tracker_db::{create_pool, run_migrations, DatabaseConfig};
use tracker_service::{seed_defaults, ServiceContext};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            if let Err(e) = try_init_tracing() {
                eprintln!("Warning: Failed to initialize tracing: {e}");
            }
            error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        error!(error = %e, "Seeding failed");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!(env = ?config.app.env, name = %config.app.name, "Seeding database");

    let pool = create_pool(&DatabaseConfig::from(&config.database)).await?;
    run_migrations(&pool).await?;
    info!("Migrations applied");

    let ctx = ServiceContext::postgres(pool, &config);
    let report = seed_defaults(&ctx, &config.seed).await?;

    info!(
        roles = ?report.roles_created,
        admin = ?report.admin_created,
        "Seeding complete"
    );

    Ok(())
}
