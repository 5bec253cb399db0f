// src/feed/mod.rs
//! Polling loop: fetch one batch, split it into lanes, render both panes and
//! replace the document regions. Runs forever; no cycle outcome ever escapes
//! the loop.
//!
//! Cycles are spawned independently of each other, so a slow fetch and the
//! next tick can overlap. With [`StalePolicy::LastWriteWins`] whichever
//! response resolves last owns the regions; [`StalePolicy::DiscardStale`]
//! drops responses older than the last applied one.

pub mod source;
pub mod target;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::article::{Article, Envelope};
use crate::classify::classify;
use crate::render::{render_panes, RenderedPanes, LOAD_FAILED};
use source::ArticleSource;
use target::RenderTarget;

/// Articles requested per fetch.
pub const BATCH_SIZE: usize = 50;
/// Time between fetches; the first one fires immediately.
pub const POLL_INTERVAL: Duration = Duration::from_secs(300);

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_cycles_total", "Poll cycles started.");
        describe_counter!(
            "feed_cycle_failures_total",
            "Cycles that ended in the error state."
        );
        describe_counter!(
            "feed_stale_discards_total",
            "Responses dropped because a newer one was already applied."
        );
        describe_counter!("feed_articles_total", "Articles rendered across all cycles.");
        describe_histogram!("feed_fetch_ms", "Article API round trip in milliseconds.");
        describe_gauge!("feed_last_render_ts", "Unix ts of the last successful render.");
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedState {
    Idle,
    Fetching,
    Rendered,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    #[default]
    LastWriteWins,
    DiscardStale,
}

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("article fetch failed: {0:#}")]
    Transport(#[from] anyhow::Error),
    #[error("article api returned code {code}: {message}")]
    Rejected { code: i64, message: String },
    #[error("render panicked: {0}")]
    Render(String),
}

#[derive(Debug)]
pub enum CycleOutcome {
    Rendered {
        generation: u64,
        timeline: usize,
        trending: usize,
    },
    Failed {
        generation: u64,
        error: CycleError,
    },
    /// Resolved after a newer cycle had already been applied.
    Discarded { generation: u64 },
}

impl CycleOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            CycleOutcome::Rendered { generation, .. }
            | CycleOutcome::Failed { generation, .. }
            | CycleOutcome::Discarded { generation } => *generation,
        }
    }
}

pub struct FeedScheduler {
    source: Arc<dyn ArticleSource>,
    target: Arc<dyn RenderTarget>,
    policy: StalePolicy,
    issued: AtomicU64,
    in_flight: AtomicUsize,
    /// Highest applied generation; held while writing to the target.
    applied: Mutex<u64>,
    last_settled: Mutex<Option<FeedState>>,
}

impl FeedScheduler {
    pub fn new(source: Arc<dyn ArticleSource>, target: Arc<dyn RenderTarget>) -> Self {
        Self {
            source,
            target,
            policy: StalePolicy::default(),
            issued: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
            applied: Mutex::new(0),
            last_settled: Mutex::new(None),
        }
    }

    pub fn with_stale_policy(mut self, policy: StalePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// `Fetching` while any request is in flight, otherwise `Idle`.
    pub fn state(&self) -> FeedState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            FeedState::Fetching
        } else {
            FeedState::Idle
        }
    }

    /// `Rendered` or `Failed` for the most recently applied cycle.
    pub fn last_settled(&self) -> Option<FeedState> {
        *self.last_settled.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Number of cycles started so far.
    pub fn generation(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Fire one cycle now, then one per [`POLL_INTERVAL`]. Each cycle runs in
    /// its own task so ticks never wait on a slow fetch.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(POLL_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let feed = Arc::clone(&self);
                tokio::spawn(async move {
                    feed.run_cycle().await;
                });
            }
        })
    }

    /// One fetch → classify → render → replace pass.
    pub async fn run_cycle(&self) -> CycleOutcome {
        ensure_metrics_described();
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _in_flight = InFlight::enter(&self.in_flight);
        counter!("feed_cycles_total").increment(1);
        tracing::debug!(target: "feed", generation, source = self.source.name(), "fetching");

        let t0 = std::time::Instant::now();
        let fetched = self.source.fetch_latest(BATCH_SIZE).await;
        histogram!("feed_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        let outcome = match fetched.map_err(CycleError::from).and_then(accept) {
            Ok(articles) => self.apply_batch(generation, articles),
            Err(error) => self.apply_failure(generation, error),
        };

        outcome
    }

    fn apply_batch(&self, generation: u64, articles: Vec<Article>) -> CycleOutcome {
        let lanes = classify(articles);
        let rendered = panic::catch_unwind(AssertUnwindSafe(|| render_panes(&lanes)));
        let RenderedPanes {
            timeline,
            trending,
            accent,
        } = match rendered {
            Ok(panes) => panes,
            Err(payload) => {
                return self.apply_failure(generation, CycleError::Render(panic_message(&*payload)))
            }
        };

        let mut applied = self.applied.lock().unwrap_or_else(|p| p.into_inner());
        if self.is_stale(generation, *applied) {
            return discard(generation);
        }
        self.target.replace_timeline(timeline);
        self.target.replace_trending(trending);
        self.target.set_accent(accent);
        *applied = (*applied).max(generation);
        drop(applied);

        self.settle(FeedState::Rendered);
        let (n_timeline, n_trending) = (lanes.timeline.len(), lanes.trending.len());
        counter!("feed_articles_total").increment((n_timeline + n_trending) as u64);
        gauge!("feed_last_render_ts").set(chrono::Utc::now().timestamp() as f64);
        tracing::info!(
            target: "feed",
            generation,
            timeline = n_timeline,
            trending = n_trending,
            "panes rendered"
        );
        CycleOutcome::Rendered {
            generation,
            timeline: n_timeline,
            trending: n_trending,
        }
    }

    /// Timeline region gets the error fragment; trending and the accent keep
    /// whatever the last good cycle left there.
    fn apply_failure(&self, generation: u64, error: CycleError) -> CycleOutcome {
        let mut applied = self.applied.lock().unwrap_or_else(|p| p.into_inner());
        if self.is_stale(generation, *applied) {
            tracing::debug!(target: "feed", generation, error = %error, "stale failure ignored");
            return discard(generation);
        }
        self.target.replace_timeline(LOAD_FAILED.to_string());
        *applied = (*applied).max(generation);
        drop(applied);

        self.settle(FeedState::Failed);
        counter!("feed_cycle_failures_total").increment(1);
        tracing::warn!(target: "feed", generation, error = %error, "failed to load articles");
        CycleOutcome::Failed { generation, error }
    }

    fn is_stale(&self, generation: u64, applied: u64) -> bool {
        self.policy == StalePolicy::DiscardStale && generation < applied
    }

    fn settle(&self, state: FeedState) {
        *self.last_settled.lock().unwrap_or_else(|p| p.into_inner()) = Some(state);
    }
}

/// Counts one in-flight cycle; released on every exit path, unwinding included.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn accept(envelope: Envelope) -> Result<Vec<Article>, CycleError> {
    if !envelope.is_success() {
        return Err(CycleError::Rejected {
            code: envelope.code,
            message: envelope.message.unwrap_or_default(),
        });
    }
    Ok(envelope.data.unwrap_or_default())
}

fn discard(generation: u64) -> CycleOutcome {
    counter!("feed_stale_discards_total").increment(1);
    tracing::debug!(target: "feed", generation, "stale response discarded");
    CycleOutcome::Discarded { generation }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
