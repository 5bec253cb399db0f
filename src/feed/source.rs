// src/feed/source.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::article::Envelope;

pub const LATEST_ARTICLES_PATH: &str = "/api/articles/latest";

/// Read-only article API.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetch the latest `limit` articles as one envelope.
    async fn fetch_latest(&self, limit: usize) -> Result<Envelope>;
    fn name(&self) -> &str;
}

/// `GET <api_base>/api/articles/latest?limit=N` over reqwest. No timeout is
/// set; an in-flight request always runs to completion.
pub struct HttpArticleSource {
    endpoint: String,
    client: Client,
}

impl HttpArticleSource {
    pub fn new(api_base: &str) -> Self {
        Self {
            endpoint: format!("{}{}", api_base.trim_end_matches('/'), LATEST_ARTICLES_PATH),
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ArticleSource for HttpArticleSource {
    async fn fetch_latest(&self, limit: usize) -> Result<Envelope> {
        let url = format!("{}?limit={limit}", self.endpoint);
        let body = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .context("article api non-2xx")?
            .text()
            .await
            .context("read article api body")?;

        let envelope: Envelope = serde_json::from_str(body.trim())
            .with_context(|| format!("parse article envelope, body: {}", preview(&body)))?;
        Ok(envelope)
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn preview(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let head: String = body.chars().take(MAX).collect();
        format!("{head}…")
    } else {
        body.to_string()
    }
}
