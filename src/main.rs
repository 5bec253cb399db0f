//! Legend feed: binary entrypoint.
//! Starts the poller against the article API and serves the rendered panes.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use legend_feed::api::{self, AppState};
use legend_feed::config::{FeedConfig, LogFormat};
use legend_feed::feed::source::{ArticleSource, HttpArticleSource};
use legend_feed::feed::target::SharedDocument;
use legend_feed::feed::FeedScheduler;
use legend_feed::metrics::Metrics;

/// `LEGEND_FEED_LOG_FORMAT=json` switches to JSON lines; compact text otherwise.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("legend_feed=info,feed=info,warn"));

    let json = (format == LogFormat::Json).then(|| fmt::layer().json());
    let compact = (format == LogFormat::Compact).then(|| fmt::layer().compact());

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(compact)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing(LogFormat::from_env());

    let cfg = FeedConfig::load_default()?;
    let metrics = Metrics::init()?;

    let http = HttpArticleSource::new(&cfg.api_base);
    info!(endpoint = http.endpoint(), policy = ?cfg.stale_policy, "article source");
    let source: Arc<dyn ArticleSource> = Arc::new(http);

    let document = SharedDocument::new();
    let feed = Arc::new(
        FeedScheduler::new(source, Arc::new(document.clone())).with_stale_policy(cfg.stale_policy),
    );
    let _poller = Arc::clone(&feed).spawn();

    let state = AppState {
        document,
        feed,
        asset_prefix: Arc::from(cfg.asset_prefix.as_str()),
    };
    let app = api::router(state, cfg.static_dir.as_deref()).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&cfg.bind)
        .await
        .with_context(|| format!("bind {}", cfg.bind))?;
    info!(bind = %cfg.bind, "serving panes");
    axum::serve(listener, app).await.context("http server")?;
    Ok(())
}
