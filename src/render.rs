// src/render.rs
//! Pane renderers: timeline list items, trending cards, empty/error states
//! and the timeline background accent.

use crate::article::Article;
use crate::classify::Lanes;
use crate::format::{escape_attr, escape_text, format_time, render_tags, resolve_source_name, tag_chip};

/// Accent identifier used when the first timeline article has no usable legend.
pub const DEFAULT_ACCENT: &str = "musk";

pub const EMPTY_TIMELINE: &str = concat!(
    r#"<div class="feed-state feed-empty" style="text-align: center; padding: 40px; color: var(--maya-meta);">"#,
    r#"<div style="font-size: 48px; margin-bottom: 16px;">📭</div>"#,
    r#"<div>暂无奇点人物相关新闻</div>"#,
    r#"</div>"#
);

pub const EMPTY_TRENDING: &str = concat!(
    r#"<div class="feed-state feed-empty" style="text-align: center; padding: 40px; color: var(--maya-meta);">"#,
    r#"<div>暂无前沿资讯</div>"#,
    r#"</div>"#
);

pub const LOAD_FAILED: &str = concat!(
    r#"<div class="feed-state feed-error" style="text-align: center; padding: 40px; color: var(--maya-meta);">"#,
    r#"<div>加载失败，请刷新页面重试</div>"#,
    r#"</div>"#
);

const SEPARATOR: &str = r#"<span class="timeline-separator news-separator">│</span>"#;

/// Background accent of the timeline pane (`--legend-bg`).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "legend", rename_all = "snake_case")]
pub enum Accent {
    Legend(String),
    Cleared,
}

impl Accent {
    /// CSS value for `--legend-bg`, assets resolved under `<asset_prefix>/legend/`.
    pub fn css_value(&self, asset_prefix: &str) -> String {
        match self {
            Accent::Legend(id) => format!(
                "url('{}/legend/{}.png')",
                asset_prefix.trim_end_matches('/'),
                id
            ),
            Accent::Cleared => "none".to_string(),
        }
    }
}

/// Everything one render cycle writes to the host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPanes {
    pub timeline: String,
    pub trending: String,
    pub accent: Accent,
}

pub fn render_timeline_item(article: &Article) -> String {
    let legend_badge = article
        .legend()
        .map(|l| format!("{SEPARATOR}{}", tag_chip(l)))
        .unwrap_or_default();

    format!(
        concat!(
            r#"<div class="timeline-item">"#,
            r#"<div class="timeline-dot"></div>"#,
            r#"<div class="timeline-meta">"#,
            r#"<span class="timeline-source news-source">{source}</span>"#,
            "{sep}",
            r#"<span class="timeline-time news-time">{time}</span>"#,
            "{legend}{tags}",
            r#"</div>"#,
            r#"<h3 class="timeline-title"><a href="{url}" target="_blank" rel="noopener" style="color: inherit; text-decoration: none;">{title}</a></h3>"#,
            r#"<p class="timeline-summary news-summary">{summary}</p>"#,
            r#"</div>"#
        ),
        source = escape_text(resolve_source_name(&article.source)),
        sep = SEPARATOR,
        time = format_time(article.timestamp.as_deref()),
        legend = legend_badge,
        tags = render_tags(article.tags.as_ref()),
        url = escape_attr(&article.url),
        title = escape_text(&article.title),
        summary = escape_text(article.summary_or_title()),
    )
}

/// The card itself is the click target; the URL travels in `data-href` so it
/// never ends up inside script text.
pub fn render_trending_card(article: &Article) -> String {
    format!(
        concat!(
            r#"<article class="trending-card" data-href="{url}" onclick="window.open(this.dataset.href, '_blank')">"#,
            r#"<h3 class="trending-title">{title}</h3>"#,
            r#"<p class="trending-summary news-summary">{summary}</p>"#,
            r#"<div class="trending-meta">"#,
            r#"<span class="trending-source news-source">{source}</span>"#,
            r#"<span class="trending-separator news-separator">│</span>"#,
            r#"<span class="trending-time news-time">{time}</span>"#,
            r#"</div>"#,
            r#"</article>"#
        ),
        url = escape_attr(&article.url),
        title = escape_text(&article.title),
        summary = escape_text(article.summary_or_title()),
        source = escape_text(resolve_source_name(&article.source)),
        time = format_time(article.timestamp.as_deref()),
    )
}

pub fn render_timeline_pane(timeline: &[Article]) -> String {
    if timeline.is_empty() {
        return EMPTY_TIMELINE.to_string();
    }
    timeline.iter().map(render_timeline_item).collect()
}

pub fn render_trending_pane(trending: &[Article]) -> String {
    if trending.is_empty() {
        return EMPTY_TRENDING.to_string();
    }
    trending.iter().map(render_trending_card).collect()
}

/// Accent from the first timeline article, once per cycle.
pub fn select_accent(timeline: &[Article]) -> Accent {
    match timeline.first() {
        Some(first) => Accent::Legend(first.legend().unwrap_or(DEFAULT_ACCENT).to_string()),
        None => Accent::Cleared,
    }
}

pub fn render_panes(lanes: &Lanes) -> RenderedPanes {
    RenderedPanes {
        timeline: render_timeline_pane(&lanes.timeline),
        trending: render_trending_pane(&lanes.trending),
        accent: select_accent(&lanes.timeline),
    }
}
