//! Episode split engine binary.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use episplit_engine::{BatchDriver, EngineConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("episplit_engine=info".parse().unwrap())
        .add_directive("episplit_media=info".parse().unwrap())
        .add_directive("episplit_catalog=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting episplit-engine at {}", chrono::Local::now());

    let config = EngineConfig::from_env();
    info!("Engine config: {:?}", config);

    // The whole pipeline rides on the external tools; fail fast when absent
    if let Err(e) = episplit_media::check_ffmpeg() {
        error!("{}", e);
        std::process::exit(1);
    }
    if let Err(e) = episplit_media::check_ffprobe() {
        error!("{}", e);
        std::process::exit(1);
    }

    let driver = BatchDriver::new(config);

    // First Ctrl-C requests a cooperative stop at the next file boundary;
    // the file in flight runs to completion
    let cancel = driver.cancellation_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal; stopping after the current file");
            cancel.request();
        }
    });

    match driver.run().await {
        Ok(summary) => {
            info!(
                "Processing completed at {}: {}/{} files processed, {} skipped{}",
                chrono::Local::now(),
                summary.completed,
                summary.total,
                summary.skipped,
                if summary.cancelled { " (cancelled)" } else { "" }
            );
        }
        Err(e) => {
            error!("Batch failed: {}", e);
            std::process::exit(1);
        }
    }
}
