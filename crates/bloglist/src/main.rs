mod bootstrap;

use std::path::{Path, PathBuf};

use anyhow::Result;
use axum::http::Request;
use bloglist_api::{router, AppState, Config};
use bloglist_core::settings::{Command, ServeArgs, Settings, StatsArgs};
use bloglist_data::aggregator::StatsAggregator;
use bloglist_data::reader::load_blog_records;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("bloglist v{} starting", env!("CARGO_PKG_VERSION"));

    let data_file = bootstrap::resolve_data_file(settings.data_file.as_ref());

    match &settings.command {
        Command::Stats(args) => run_stats(args, &data_file),
        Command::Serve(args) => run_serve(args, data_file).await,
    }
}

fn run_stats(args: &StatsArgs, data_file: &Path) -> Result<()> {
    tracing::info!(path = %data_file.display(), "computing statistics");

    let records = load_blog_records(data_file)?;
    let stats = StatsAggregator::summarize(&records);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&stats)?),
        _ => print!("{}", StatsAggregator::render_text(&stats)),
    }
    Ok(())
}

async fn run_serve(args: &ServeArgs, data_file: PathBuf) -> Result<()> {
    let config = Config {
        bind_addr: args.bind.clone(),
        secret: args.require_secret()?.to_string(),
        data_file: Some(data_file),
    };
    let bind_addr = config.bind_addr.clone();

    let state = AppState::load(config)?;

    let app = router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl+C received; shutting down");
            }
        })
        .await?;

    Ok(())
}
