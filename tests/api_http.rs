// tests/api_http.rs
//
// HTTP-level tests for the host-document router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.

mod common;

use std::sync::Arc;

use axum::{
    body::{self, Body},
    Router,
};
use http::{Request, StatusCode};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use common::{article, ScriptedSource, Step};
use legend_feed::api::{self, AppState};
use legend_feed::metrics::Metrics;
use legend_feed::{ArticleSource, FeedScheduler, SharedDocument};

const BODY_LIMIT: usize = 1024 * 1024;

async fn rendered_app() -> Router {
    let document = SharedDocument::new();
    let source: Arc<dyn ArticleSource> = Arc::new(ScriptedSource::new(vec![Step::ok(vec![
        article("timeline-one", "cls", Some("musk")),
        article("trending-one", "toutiao", None),
    ])]));
    let feed = Arc::new(FeedScheduler::new(source, Arc::new(document.clone())));
    feed.run_cycle().await;

    let state = AppState {
        document,
        feed,
        asset_prefix: Arc::from("/static/images"),
    };
    api::router(state, None)
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    (status, String::from_utf8(bytes).expect("utf8"))
}

#[tokio::test]
async fn health_returns_ok() {
    let (status, body) = get(rendered_app().await, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn panes_json_reports_regions_accent_and_state() {
    let (status, body) = get(rendered_app().await, "/panes").await;
    assert_eq!(status, StatusCode::OK);

    let v: Json = serde_json::from_str(&body).expect("json");
    assert!(v["timeline"].as_str().unwrap().contains("timeline-one"));
    assert!(v["trending"].as_str().unwrap().contains("trending-one"));
    assert_eq!(v["accent"]["kind"], "legend");
    assert_eq!(v["accent"]["legend"], "musk");
    assert_eq!(v["accent_css"], "url('/static/images/legend/musk.png')");
    assert_eq!(v["state"], "idle");
    assert_eq!(v["last_settled"], "rendered");
    assert_eq!(v["generation"], 1);
}

#[tokio::test]
async fn fragment_routes_return_region_html() {
    let app = rendered_app().await;
    let (_, timeline) = get(app.clone(), "/panes/timeline").await;
    assert!(timeline.starts_with(r#"<div class="timeline-item">"#));
    let (_, trending) = get(app, "/panes/trending").await;
    assert!(trending.contains("今日头条"));
}

#[tokio::test]
async fn index_page_hosts_both_regions_with_accent() {
    let (status, body) = get(rendered_app().await, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"id="timelineCard" style="--legend-bg: url('/static/images/legend/musk.png')""#));
    assert!(body.contains(r#"id="trendingList""#));
}

#[tokio::test]
async fn metrics_route_renders_text() {
    let app = rendered_app().await.merge(Metrics::detached().router());
    let (status, _body) = get(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
}
