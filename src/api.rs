// src/api.rs
//! Host-document adapter: serves the regions the scheduler writes into.

use std::path::Path;
use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::feed::target::SharedDocument;
use crate::feed::{FeedScheduler, FeedState};
use crate::format::escape_attr;
use crate::render::Accent;

pub const TIMELINE_REGION_ID: &str = "timelineCard";
pub const TRENDING_REGION_ID: &str = "trendingList";

#[derive(Clone)]
pub struct AppState {
    pub document: SharedDocument,
    pub feed: Arc<FeedScheduler>,
    pub asset_prefix: Arc<str>,
}

pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/", get(index))
        .route("/panes", get(panes))
        .route("/panes/timeline", get(timeline_pane))
        .route("/panes/trending", get(trending_pane));

    if let Some(dir) = static_dir {
        app = app.nest_service("/static", ServeDir::new(dir));
    }

    app.layer(CorsLayer::very_permissive()).with_state(state)
}

#[derive(serde::Serialize)]
struct PanesOut {
    timeline: String,
    trending: String,
    accent: Option<Accent>,
    accent_css: Option<String>,
    state: FeedState,
    last_settled: Option<FeedState>,
    generation: u64,
}

async fn panes(State(state): State<AppState>) -> Json<PanesOut> {
    let snap = state.document.snapshot();
    let accent_css = snap.accent.as_ref().map(|a| a.css_value(&state.asset_prefix));
    Json(PanesOut {
        timeline: snap.timeline,
        trending: snap.trending,
        accent: snap.accent,
        accent_css,
        state: state.feed.state(),
        last_settled: state.feed.last_settled(),
        generation: state.feed.generation(),
    })
}

async fn timeline_pane(State(state): State<AppState>) -> Html<String> {
    Html(state.document.snapshot().timeline)
}

async fn trending_pane(State(state): State<AppState>) -> Html<String> {
    Html(state.document.snapshot().trending)
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let snap = state.document.snapshot();
    let style = snap
        .accent
        .map(|a| {
            format!(
                r#" style="--legend-bg: {}""#,
                escape_attr(&a.css_value(&state.asset_prefix))
            )
        })
        .unwrap_or_default();

    Html(format!(
        concat!(
            "<!DOCTYPE html>\n",
            r#"<html lang="zh-CN"><head><meta charset="utf-8"><title>Legend Feed</title>"#,
            r#"<link rel="stylesheet" href="/static/css/index.css"></head><body>"#,
            r#"<main class="feed">"#,
            r#"<section class="timeline-card" id="{tid}"{style}>{timeline}</section>"#,
            r#"<section class="trending-list" id="{rid}">{trending}</section>"#,
            r#"</main></body></html>"#
        ),
        tid = TIMELINE_REGION_ID,
        rid = TRENDING_REGION_ID,
        style = style,
        timeline = snap.timeline,
        trending = snap.trending,
    ))
}
