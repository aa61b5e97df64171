use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bgremove::api;
use bgremove::config::Config;
use bgremove::service::reclaim::Reclaimer;
use bgremove::utils::cli::Args;
use bgremove::utils::state::AppState;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = validate_config(&args).await;

    // Started here, once, rather than from request handling.
    Reclaimer::new(&config.upload_root, &config.output_root).start(config.sweep_interval);

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down...");
}

async fn validate_config(args: &Args) -> Config {
    let mut validation_errors = Vec::new();

    if args.sweep_interval_secs == 0 {
        validation_errors
            .push("BGREMOVE_SWEEP_INTERVAL_SECS must be greater than zero".to_string());
    }

    let upload_root =
        prepare_root("BGREMOVE_UPLOAD_ROOT", &args.upload_root, &mut validation_errors).await;
    let output_root =
        prepare_root("BGREMOVE_OUTPUT_ROOT", &args.output_root, &mut validation_errors).await;

    if let (Some(upload_root), Some(output_root)) = (&upload_root, &output_root) {
        if upload_root.starts_with(output_root) || output_root.starts_with(upload_root) {
            validation_errors.push(format!(
                "BGREMOVE_UPLOAD_ROOT `{}` and BGREMOVE_OUTPUT_ROOT `{}` \
                 must not contain each other",
                upload_root.display(),
                output_root.display(),
            ));
        }
    }

    if !validation_errors.is_empty() {
        eprintln!("{}", validation_errors.join("\n"));
        std::process::exit(1);
    }

    Config {
        host: args.host.clone(),
        port: args.port,
        upload_root: upload_root.unwrap_or_default(),
        output_root: output_root.unwrap_or_default(),
        sweep_interval: Duration::from_secs(args.sweep_interval_secs),
        max_upload_bytes: args.max_upload_bytes,
        color_tolerance: args.color_tolerance,
    }
}

/// Creates a storage root if needed and returns its canonical path.
async fn prepare_root(var: &str, root: &str, errors: &mut Vec<String>) -> Option<PathBuf> {
    let path = Path::new(root);
    if let Ok(meta) = tokio::fs::metadata(path).await {
        if !meta.is_dir() {
            errors.push(format!("{var} `{root}` exists but is not a directory"));
            return None;
        }
    }
    if let Err(err) = tokio::fs::create_dir_all(path).await {
        errors.push(format!("{var} `{root}` cannot be created: {err}"));
        return None;
    }
    match tokio::fs::canonicalize(path).await {
        Ok(canonical) => Some(canonical),
        Err(err) => {
            errors.push(format!("{var} `{root}` cannot be resolved: {err}"));
            None
        }
    }
}
