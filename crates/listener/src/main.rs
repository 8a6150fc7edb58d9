use std::sync::Arc;

use bloodbridge_common::config::AppConfig;
use bloodbridge_dispatch::pipeline::SosDispatcher;
use bloodbridge_listener::listener::SosListener;
use bloodbridge_push::FcmClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bloodbridge_listener=info,bloodbridge_dispatch=info".into()),
        )
        .json()
        .init();

    tracing::info!("BloodBridge SOS listener starting...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Connect to database
    let pool = config.connect_pool().await?;

    // Run migrations
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    // Wire the pipeline: push transport + dispatcher + trigger listener
    let push = Arc::new(FcmClient::new(
        config.fcm_endpoint.clone(),
        config.fcm_server_key.clone(),
    ));
    let dispatcher = SosDispatcher::new(pool.clone(), push);
    let mut listener = SosListener::connect(&config.database_url, pool, dispatcher).await?;

    // Run with graceful shutdown on Ctrl+C
    tokio::select! {
        result = listener.run() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "SOS listener exited with error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("BloodBridge SOS listener stopped.");
    Ok(())
}
