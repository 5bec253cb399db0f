// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use legend_feed::{Article, ArticleSource, Envelope};
use tokio::time::Instant;

pub fn article(title: &str, source: &str, legend: Option<&str>) -> Article {
    Article {
        title: title.to_string(),
        url: format!("https://news.test/{title}"),
        summary: Some(format!("{title} summary")),
        timestamp: Some("2024-03-05T08:07:00Z".to_string()),
        source: source.to_string(),
        tags: None,
        legend: legend.map(str::to_string),
    }
}

/// One scripted reply: wait `delay`, then hand back `reply`.
pub struct Step {
    pub delay: Duration,
    pub reply: Result<Envelope>,
}

impl Step {
    pub fn ok(articles: Vec<Article>) -> Self {
        Self {
            delay: Duration::ZERO,
            reply: Ok(Envelope::ok(articles)),
        }
    }

    pub fn network_error() -> Self {
        Self {
            delay: Duration::ZERO,
            reply: Err(anyhow!("connection refused")),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Replays steps in order; once exhausted it keeps failing.
pub struct ScriptedSource {
    steps: Mutex<VecDeque<Step>>,
    pub calls: Mutex<Vec<(Instant, usize)>>,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn call_instants(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }
}

#[async_trait]
impl ArticleSource for ScriptedSource {
    async fn fetch_latest(&self, limit: usize) -> Result<Envelope> {
        self.calls.lock().unwrap().push((Instant::now(), limit));
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step { delay, reply }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                reply
            }
            None => Err(anyhow!("script exhausted")),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
